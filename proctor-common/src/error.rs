use thiserror::Error;

/// Failures that proctor detects itself, as opposed to errors reported by AWS or
/// the box catalog which are passed through with context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProctorError {
  #[error("invalid name: must match pattern {pattern}")]
  InvalidName { pattern: &'static str },

  #[error("expected format to be either 'json' or 'plain', got '{0}'")]
  UnsupportedFormat(String),

  #[error("couldn't find AMI in region {region}")]
  ImageNotFound { region: String },

  #[error("CreateKeyPair returned invalid data")]
  MissingKeyName,

  #[error("tried to create key named '{requested}' but generated key was called '{returned}'")]
  KeyNameMismatch { requested: String, returned: String },

  #[error("CreateKeyPair returned an empty key")]
  EmptyKeyMaterial,

  #[error("no CloudFormation stack named '{0}'")]
  StackNotFound(String),

  #[error("malformed CloudFormation stack: missing or invalid parameter '{parameter}'")]
  MalformedStack { parameter: &'static str },

  #[error("box '{0}' has no current version with an aws provider")]
  NoAwsProvider(String),

  #[error("no AMIs found in Vagrantfile of box '{0}'")]
  NoAmisFound(String),
}
