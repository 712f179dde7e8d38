use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File};
use proctor_common::atlas;
use proctor_common::controller::DEFAULT_TEMPLATE;
use serde::Deserialize;

use crate::config::GlobalOpts;

#[derive(Debug, Deserialize)]
pub struct Settings {
  pub region: String,
  pub bucket: String,
  pub box_name: String,
  pub atlas_url: String,
  pub template: Option<String>,
}

impl Settings {
  pub fn new(overrides: &GlobalOpts) -> Result<Self, ConfigError> {
    let config = Config::builder()
      // Start with default values
      .set_default("region", "us-east-1")?
      .set_default("bucket", "bosh101-proctor")?
      .set_default("box_name", "cloudfoundry/bosh-lite")?
      .set_default("atlas_url", atlas::DEFAULT_BASE_URL)?
      // Will look for proctor.yaml, proctor.json, proctor.toml, etc.
      .add_source(File::with_name("proctor").required(false))
      .add_source(Environment::with_prefix("PROCTOR"))
      // Command line flags win over everything else
      .set_override_option("region", overrides.region.clone())?
      .set_override_option("bucket", overrides.bucket.clone())?
      .set_override_option("box_name", overrides.box_name.clone())?
      .set_override_option("template", overrides.template.clone())?
      .build()?;

    config.try_deserialize()
  }

  /// The CloudFormation template body, read from `template` if one is configured.
  pub fn template_body(&self) -> Result<String> {
    match &self.template {
      Some(path) => std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CloudFormation template '{}'", path)),
      None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
  }
}
