use anyhow::Result;
use async_trait::async_trait;
use proctor_common::controller::Controller;
use tracing::info;

use super::Command;

pub struct Destroy {
  name: String,
}

impl Destroy {
  pub fn new(name: String) -> Self {
    Self { name }
  }
}

#[async_trait]
impl Command for Destroy {
  async fn run(&self, controller: &Controller) -> Result<()> {
    info!("Destroying classroom {}", self.name);

    controller.destroy_classroom(&self.name).await
  }
}
