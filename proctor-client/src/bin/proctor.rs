#![allow(clippy::uninlined_format_args)]

use std::io::IsTerminal;
use std::sync::Arc;

use clap::Parser;
use proctor_client::command::{Command, Create, Describe, Destroy, List};
use proctor_client::config::{Opt, SubCommand};
use proctor_client::logger::ConsoleLog;
use proctor_client::settings::Settings;
use proctor_common::atlas::AtlasClient;
use proctor_common::controller::Controller;
use proctor_common::provider::AwsProvider;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing first, before any logging happens
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("PROCTOR_LOG")
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .init();

  colored::control::set_override(std::io::stderr().is_terminal());

  // Parse the parameters passed by arguments.
  let options = Opt::parse();

  let settings = Settings::new(&options.global)?;

  let aws = AwsProvider::new(settings.region.clone(), settings.bucket.clone()).await;

  let controller = Controller::new(
    Arc::new(AtlasClient::new(settings.atlas_url.clone())),
    Arc::new(aws),
    Arc::new(ConsoleLog),
    settings.box_name.clone(),
    settings.region.clone(),
  );

  let command: Box<dyn Command> = match options.command {
    SubCommand::Create { name, number } => {
      Box::new(Create::new(name, number, settings.template_body()?))
    }
    SubCommand::Destroy { name } => Box::new(Destroy::new(name)),
    SubCommand::List { format } => Box::new(List::new(format)),
    SubCommand::Describe { name, format } => Box::new(Describe::new(name, format)),
  };

  command.run(&controller).await
}
