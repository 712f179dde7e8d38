use anyhow::Result;
use async_trait::async_trait;
use proctor_common::controller::{Controller, Format};

use super::Command;

pub struct List {
  format: Format,
}

impl List {
  pub fn new(format: Format) -> Self {
    Self { format }
  }
}

#[async_trait]
impl Command for List {
  async fn run(&self, controller: &Controller) -> Result<()> {
    let output = controller.list_classrooms(self.format).await?;
    println!("{}", output);

    Ok(())
  }
}
