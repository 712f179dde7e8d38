use std::sync::LazyLock;

use regex::Regex;

use crate::error::ProctorError;

/// Every AWS resource that belongs to a classroom is named with this prefix.
pub const PREFIX: &str = "classroom-";

pub const NAME_PATTERN: &str = r"^[a-zA-Z][-a-zA-Z0-9]*$";

static NAME_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(NAME_PATTERN).expect("classroom name pattern is valid"));

/// Rejects names that can't be used for key pairs, stacks and S3 keys alike.
pub fn validate_name(name: &str) -> Result<(), ProctorError> {
  if NAME_REGEX.is_match(name) {
    Ok(())
  } else {
    Err(ProctorError::InvalidName {
      pattern: NAME_PATTERN,
    })
  }
}

pub fn prefixed(name: &str) -> String {
  format!("{PREFIX}{name}")
}

/// S3 key under which the classroom's private SSH key is stored.
pub fn key_object_name(name: &str) -> String {
  format!("keys/{}", prefixed(name))
}

pub fn strip_prefix(key_name: &str) -> &str {
  key_name.strip_prefix(PREFIX).unwrap_or(key_name)
}
