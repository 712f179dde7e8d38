use anyhow::Result;
use async_trait::async_trait;
use proctor_common::controller::Controller;
use tracing::info;

use super::Command;

pub struct Create {
  name: String,
  number: u32,
  template: String,
}

impl Create {
  pub fn new(name: String, number: u32, template: String) -> Self {
    Self {
      name,
      number,
      template,
    }
  }
}

#[async_trait]
impl Command for Create {
  async fn run(&self, controller: &Controller) -> Result<()> {
    info!("Creating classroom {} with {} hosts", self.name, self.number);

    controller
      .create_classroom(&self.name, self.number, &self.template)
      .await
  }
}
