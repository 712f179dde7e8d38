use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{self, BehaviorVersion};
use aws_sdk_cloudformation::types::Parameter;
use aws_sdk_ec2::{
  config::Region,
  types::{Filter, Reservation},
};
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl};
use tracing::{debug, info};

use crate::error::ProctorError;
use crate::provider::{CreatedKeyPair, Provider, StackDescription};

/// Tag CloudFormation puts on every resource it launches.
const STACK_ID_TAG: &str = "aws:cloudformation:stack-id";

#[derive(Debug, Clone)]
pub struct AwsProvider {
  pub bucket: String,
  ec2: aws_sdk_ec2::Client,
  s3: aws_sdk_s3::Client,
  cloudformation: aws_sdk_cloudformation::Client,
}

impl AwsProvider {
  pub async fn new(region: String, bucket: String) -> AwsProvider {
    let shared_config = aws_config::defaults(BehaviorVersion::latest())
      .region(Region::new(region))
      .load()
      .await;

    AwsProvider {
      bucket,
      ec2: aws_sdk_ec2::Client::new(&shared_config),
      s3: aws_sdk_s3::Client::new(&shared_config),
      cloudformation: aws_sdk_cloudformation::Client::new(&shared_config),
    }
  }
}

/// Maps instance id to public address for every reachable instance.
///
/// Instances without a public address can't be reached by students and are skipped.
fn hosts_from_reservations(reservations: &[Reservation]) -> BTreeMap<String, String> {
  reservations
    .iter()
    .flat_map(|reservation| reservation.instances())
    .filter_map(|instance| {
      Some((
        instance.instance_id()?.to_string(),
        instance.public_ip_address()?.to_string(),
      ))
    })
    .collect()
}

/// Builds the S3 URL of an object without any network access.
pub(crate) fn object_url(bucket: &str, name: &str) -> String {
  format!("https://s3.amazonaws.com/{bucket}/{name}")
}

#[async_trait]
impl Provider for AwsProvider {
  async fn create_key(&self, name: &str) -> Result<CreatedKeyPair> {
    let resp = self
      .ec2
      .create_key_pair()
      .key_name(name)
      .send()
      .await
      .with_context(|| format!("Failed to create key pair '{}'", name))?;

    debug!(key_name = ?resp.key_name(), "Created key pair");

    Ok(CreatedKeyPair {
      name: resp.key_name().map(String::from),
      material: resp.key_material().map(String::from),
    })
  }

  async fn delete_key(&self, name: &str) -> Result<()> {
    self
      .ec2
      .delete_key_pair()
      .key_name(name)
      .send()
      .await
      .with_context(|| format!("Failed to delete key pair '{}'", name))?;

    Ok(())
  }

  async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
    let resp = self
      .ec2
      .describe_key_pairs()
      .filters(
        Filter::builder()
          .name("key-name")
          .values(format!("{prefix}*"))
          .build(),
      )
      .send()
      .await
      .context("Failed to list key pairs")?;

    let names: Vec<String> = resp
      .key_pairs()
      .iter()
      .filter_map(|key_pair| key_pair.key_name())
      .map(String::from)
      .collect();

    debug!(prefix, count = names.len(), "Listed key pairs");

    Ok(names)
  }

  async fn store_object(
    &self,
    name: &str,
    bytes: Vec<u8>,
    download_file_name: &str,
    content_type: &str,
  ) -> Result<()> {
    self
      .s3
      .put_object()
      .bucket(&self.bucket)
      .key(name)
      .body(ByteStream::from(bytes))
      .content_type(content_type)
      .content_disposition(format!("attachment; filename=\"{download_file_name}\""))
      .acl(ObjectCannedAcl::PublicRead)
      .send()
      .await
      .with_context(|| format!("Failed to upload '{}' to bucket '{}'", name, self.bucket))?;

    info!(bucket = %self.bucket, key = name, "Stored object");

    Ok(())
  }

  async fn delete_object(&self, name: &str) -> Result<()> {
    self
      .s3
      .delete_object()
      .bucket(&self.bucket)
      .key(name)
      .send()
      .await
      .with_context(|| format!("Failed to delete '{}' from bucket '{}'", name, self.bucket))?;

    Ok(())
  }

  fn url_for_object(&self, name: &str) -> String {
    object_url(&self.bucket, name)
  }

  async fn create_stack(
    &self,
    name: &str,
    template: &str,
    parameters: HashMap<String, String>,
  ) -> Result<String> {
    let parameters: Vec<Parameter> = parameters
      .into_iter()
      .map(|(key, value)| {
        Parameter::builder()
          .parameter_key(key)
          .parameter_value(value)
          .build()
      })
      .collect();

    let resp = self
      .cloudformation
      .create_stack()
      .stack_name(name)
      .template_body(template)
      .set_parameters(Some(parameters))
      .send()
      .await
      .with_context(|| format!("Failed to create CloudFormation stack '{}'", name))?;

    let stack_id = resp
      .stack_id()
      .ok_or_else(|| anyhow::anyhow!("CreateStack returned no stack ID for '{}'", name))?
      .to_string();

    info!(stack = name, stack_id = %stack_id, "Created stack");

    Ok(stack_id)
  }

  async fn delete_stack(&self, name: &str) -> Result<()> {
    self
      .cloudformation
      .delete_stack()
      .stack_name(name)
      .send()
      .await
      .with_context(|| format!("Failed to delete CloudFormation stack '{}'", name))?;

    Ok(())
  }

  async fn describe_stack(&self, name: &str) -> Result<StackDescription> {
    let resp = self
      .cloudformation
      .describe_stacks()
      .stack_name(name)
      .send()
      .await
      .with_context(|| format!("Failed to describe CloudFormation stack '{}'", name))?;

    let stack = resp
      .stacks()
      .first()
      .ok_or_else(|| ProctorError::StackNotFound(name.to_string()))?;

    let parameters = stack
      .parameters()
      .iter()
      .filter_map(|parameter| {
        Some((
          parameter.parameter_key()?.to_string(),
          parameter.parameter_value().unwrap_or_default().to_string(),
        ))
      })
      .collect();

    Ok(StackDescription {
      status: stack
        .stack_status()
        .map(|status| status.as_str().to_string())
        .unwrap_or_default(),
      stack_id: stack.stack_id().unwrap_or_default().to_string(),
      parameters,
    })
  }

  async fn get_hosts_from_stack_id(&self, stack_id: &str) -> Result<BTreeMap<String, String>> {
    let resp = self
      .ec2
      .describe_instances()
      .filters(
        Filter::builder()
          .name(format!("tag:{STACK_ID_TAG}"))
          .values(stack_id)
          .build(),
      )
      .filters(
        Filter::builder()
          .name("instance-state-name")
          .values("pending")
          .values("running")
          .build(),
      )
      .send()
      .await
      .with_context(|| format!("Failed to describe instances of stack '{}'", stack_id))?;

    let hosts = hosts_from_reservations(resp.reservations());

    debug!(stack_id, count = hosts.len(), "Resolved stack hosts");

    Ok(hosts)
  }
}
