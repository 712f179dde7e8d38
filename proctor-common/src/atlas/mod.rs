use std::collections::HashMap;
use std::io::Read;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ProctorError;
use crate::provider::ImageCatalog;

pub const DEFAULT_BASE_URL: &str = "https://app.vagrantup.com";

static REGION_CONFIG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"region_config\s+"([^"]+)",\s*ami:\s*"([^"]+)""#)
    .expect("region_config pattern is valid")
});

#[derive(Debug, Deserialize)]
struct BoxMetadata {
  current_version: Option<BoxVersion>,
}

#[derive(Debug, Deserialize)]
struct BoxVersion {
  #[serde(default)]
  version: String,
  #[serde(default)]
  providers: Vec<BoxProvider>,
}

#[derive(Debug, Deserialize)]
struct BoxProvider {
  name: String,
  download_url: String,
}

/// Looks up machine images from the AWS flavour of a Vagrant box.
///
/// The box archive carries a Vagrantfile with one `region_config` line per region,
/// which is the only place the AMI ids are published.
pub struct AtlasClient {
  base_url: String,
  http: reqwest::Client,
}

impl AtlasClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      http: reqwest::Client::new(),
    }
  }

  async fn aws_download_url(&self, box_name: &str) -> Result<String> {
    let url = format!("{}/api/v1/box/{}", self.base_url, box_name);

    info!(url = %url, "Fetching box metadata");

    let metadata: BoxMetadata = self
      .http
      .get(&url)
      .send()
      .await
      .and_then(|resp| resp.error_for_status())
      .with_context(|| format!("Failed to fetch metadata for box '{}'", box_name))?
      .json()
      .await
      .with_context(|| format!("Failed to parse metadata for box '{}'", box_name))?;

    select_aws_download_url(box_name, metadata)
  }
}

impl Default for AtlasClient {
  fn default() -> Self {
    Self::new(DEFAULT_BASE_URL)
  }
}

#[async_trait]
impl ImageCatalog for AtlasClient {
  async fn get_latest_amis(&self, box_name: &str) -> Result<HashMap<String, String>> {
    let download_url = self.aws_download_url(box_name).await?;

    debug!(url = %download_url, "Downloading box");

    let archive = self
      .http
      .get(&download_url)
      .send()
      .await
      .and_then(|resp| resp.error_for_status())
      .with_context(|| format!("Failed to download box '{}'", box_name))?
      .bytes()
      .await
      .with_context(|| format!("Failed to download box '{}'", box_name))?;

    amis_from_box(box_name, &archive)
  }
}

/// Reads the region to AMI map out of a downloaded `.box` archive.
fn amis_from_box(box_name: &str, archive: &[u8]) -> Result<HashMap<String, String>> {
  let vagrantfile = read_vagrantfile(archive)
    .with_context(|| format!("Failed to read Vagrantfile from box '{}'", box_name))?;

  let amis = parse_region_amis(&vagrantfile);
  if amis.is_empty() {
    return Err(ProctorError::NoAmisFound(box_name.to_string()).into());
  }

  Ok(amis)
}

fn select_aws_download_url(box_name: &str, metadata: BoxMetadata) -> Result<String> {
  let version = metadata
    .current_version
    .ok_or_else(|| ProctorError::NoAwsProvider(box_name.to_string()))?;

  let provider = version
    .providers
    .into_iter()
    .find(|provider| provider.name == "aws")
    .ok_or_else(|| ProctorError::NoAwsProvider(box_name.to_string()))?;

  debug!(box_name, version = %version.version, "Found aws provider");

  Ok(provider.download_url)
}

/// Extracts the Vagrantfile from a gzipped `.box` tarball.
fn read_vagrantfile(archive: &[u8]) -> Result<String> {
  let mut tarball = tar::Archive::new(GzDecoder::new(archive));

  for entry in tarball.entries()? {
    let mut entry = entry?;
    let is_vagrantfile = entry
      .path()?
      .file_name()
      .is_some_and(|name| name == "Vagrantfile");

    if is_vagrantfile {
      let mut contents = String::new();
      entry.read_to_string(&mut contents)?;
      return Ok(contents);
    }
  }

  anyhow::bail!("box archive has no Vagrantfile")
}

fn parse_region_amis(vagrantfile: &str) -> HashMap<String, String> {
  REGION_CONFIG
    .captures_iter(vagrantfile)
    .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    .collect()
}
