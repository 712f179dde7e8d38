use anyhow::Result;
use async_trait::async_trait;
use proctor_common::controller::Controller;

mod create;
mod describe;
mod destroy;
mod list;

pub use create::*;
pub use describe::*;
pub use destroy::*;
pub use list::*;

// A Command trait that ensures we have a run() method on each struct:
#[async_trait]
pub trait Command: Send + Sync {
  async fn run(&self, controller: &Controller) -> Result<()>;
}
