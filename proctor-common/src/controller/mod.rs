use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::classroom::{self, PREFIX};
use crate::error::ProctorError;
use crate::progress::ProgressLog;
use crate::provider::{ImageCatalog, Provider};


/// The CloudFormation template shipped with proctor.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/classroom.json");

const KEY_DOWNLOAD_FILE_NAME: &str = "bosh101_ssh_key.pem";
const KEY_CONTENT_TYPE: &str = "application/x-pem-file";
const INSTANCE_COUNT: &str = "InstanceCount";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Json,
  Plain,
}

impl FromStr for Format {
  type Err = ProctorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "json" => Ok(Format::Json),
      "plain" => Ok(Format::Plain),
      other => Err(ProctorError::UnsupportedFormat(other.to_string())),
    }
  }
}

/// Snapshot of a running classroom, rebuilt from AWS on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassroomDescription {
  pub status: String,
  pub number: i64,
  pub ssh_key: String,
  pub hosts: BTreeMap<String, String>,
}

impl ClassroomDescription {
  fn to_plain(&self) -> String {
    let mut out = format!(
      "status: {}\nnumber: {}\nssh_key: {}\nhosts:\n",
      self.status, self.number, self.ssh_key
    );
    let hosts: Vec<String> = self
      .hosts
      .iter()
      .map(|(label, address)| format!("{label}\t{address}"))
      .collect();
    out.push_str(&hosts.join("\n"));
    out
  }
}

/// Serializes with four-space indentation.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
  let mut buf = Vec::new();
  let mut serializer =
    serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
  value.serialize(&mut serializer)?;
  Ok(String::from_utf8(buf)?)
}

/// Runs the classroom workflows against a provider.
///
/// Every workflow is a fixed sequence of provider calls that stops at the first
/// error. Nothing already created is cleaned up when a later step fails.
pub struct Controller {
  atlas: Arc<dyn ImageCatalog>,
  aws: Arc<dyn Provider>,
  log: Arc<dyn ProgressLog>,

  box_name: String,
  region: String,
}

impl Controller {
  pub fn new(
    atlas: Arc<dyn ImageCatalog>,
    aws: Arc<dyn Provider>,
    log: Arc<dyn ProgressLog>,
    box_name: String,
    region: String,
  ) -> Self {
    Controller {
      atlas,
      aws,
      log,
      box_name,
      region,
    }
  }

  /// Launches `number` hosts from `template` under the classroom's name.
  pub async fn create_classroom(&self, name: &str, number: u32, template: &str) -> Result<()> {
    classroom::validate_name(name)?;

    let log = &self.log;

    log.println(
      0,
      &format!("Looking up latest AMI for {}", log.green(&self.box_name)),
    );
    let amis = self.atlas.get_latest_amis(&self.box_name).await?;

    let ami = amis
      .get(&self.region)
      .ok_or_else(|| ProctorError::ImageNotFound {
        region: self.region.clone(),
      })?;
    log.println(0, &format!("Found {}", log.green(ami)));

    let prefixed_name = classroom::prefixed(name);
    log.println(
      0,
      &format!("Creating SSH Keypair {}", log.green(&prefixed_name)),
    );
    let private_key = self
      .aws
      .create_key(&prefixed_name)
      .await?
      .verify(&prefixed_name)?;

    let object_name = classroom::key_object_name(name);
    let object_url = self.aws.url_for_object(&object_name);
    log.println(
      0,
      &format!("Uploading private key to {}", log.green(&object_url)),
    );
    self
      .aws
      .store_object(
        &object_name,
        private_key.into_bytes(),
        KEY_DOWNLOAD_FILE_NAME,
        KEY_CONTENT_TYPE,
      )
      .await?;

    log.println(
      0,
      &format!("Creating CloudFormation stack {}", log.green(&prefixed_name)),
    );
    let parameters = HashMap::from([
      ("AMI".to_string(), ami.clone()),
      ("KeyName".to_string(), prefixed_name.clone()),
      (INSTANCE_COUNT.to_string(), number.to_string()),
    ]);
    let stack_id = self
      .aws
      .create_stack(&prefixed_name, template, parameters)
      .await?;

    info!(classroom = name, stack_id = %stack_id, number, "Classroom creation started");

    Ok(())
  }

  pub async fn destroy_classroom(&self, name: &str) -> Result<()> {
    classroom::validate_name(name)?;

    let log = &self.log;
    let prefixed_name = classroom::prefixed(name);

    log.println(
      0,
      &format!("Deleting CloudFormation stack {}", log.green(&prefixed_name)),
    );
    self.aws.delete_stack(&prefixed_name).await?;

    log.println(0, "Deleting classroom keypair...");
    self.aws.delete_key(&prefixed_name).await?;

    log.println(0, "Deleting private key from S3...");
    self
      .aws
      .delete_object(&classroom::key_object_name(name))
      .await?;

    info!(classroom = name, "Classroom destroyed");

    Ok(())
  }

  pub async fn list_classrooms(&self, format: Format) -> Result<String> {
    let keys = self.aws.list_keys(PREFIX).await?;
    let names: Vec<&str> = keys
      .iter()
      .map(|key| classroom::strip_prefix(key))
      .collect();

    match format {
      Format::Json => to_json(&names),
      Format::Plain => Ok(names.join("\n")),
    }
  }

  pub async fn describe_classroom(&self, name: &str, format: Format) -> Result<String> {
    classroom::validate_name(name)?;

    let prefixed_name = classroom::prefixed(name);
    let stack = self.aws.describe_stack(&prefixed_name).await?;

    let ssh_key = self
      .aws
      .url_for_object(&classroom::key_object_name(name));

    let number = stack
      .parameters
      .get(INSTANCE_COUNT)
      .and_then(|count| count.parse::<i64>().ok())
      .ok_or(ProctorError::MalformedStack {
        parameter: INSTANCE_COUNT,
      })?;

    let hosts = self
      .aws
      .get_hosts_from_stack_id(&stack.stack_id)
      .await
      .context("error fetching hosts for stack")?;

    let description = ClassroomDescription {
      status: stack.status,
      number,
      ssh_key,
      hosts,
    };

    match format {
      Format::Json => to_json(&description),
      Format::Plain => Ok(description.to_plain()),
    }
  }
}
