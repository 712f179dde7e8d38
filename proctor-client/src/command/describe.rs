use anyhow::Result;
use async_trait::async_trait;
use proctor_common::controller::{Controller, Format};

use super::Command;

pub struct Describe {
  name: String,
  format: Format,
}

impl Describe {
  pub fn new(name: String, format: Format) -> Self {
    Self { name, format }
  }
}

#[async_trait]
impl Command for Describe {
  async fn run(&self, controller: &Controller) -> Result<()> {
    let output = controller.describe_classroom(&self.name, self.format).await?;
    println!("{}", output);

    Ok(())
  }
}
