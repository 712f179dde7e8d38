use clap::{Args, Parser, Subcommand};
use proctor_common::controller::Format;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Opt {
  #[clap(flatten)]
  pub global: GlobalOpts,

  #[clap(subcommand)]
  pub command: SubCommand,
}

/// Overrides for values that otherwise come from settings files or `PROCTOR_*` variables.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalOpts {
  /// AWS region to create classrooms in (e.g., "us-east-1")
  #[clap(long, global = true)]
  pub region: Option<String>,

  /// S3 bucket holding the classroom SSH keys
  #[clap(long, global = true)]
  pub bucket: Option<String>,

  /// Vagrant box whose AWS images the hosts boot from
  #[clap(long, global = true)]
  pub box_name: Option<String>,

  /// Path to a CloudFormation template to use instead of the bundled one
  #[clap(long, global = true)]
  pub template: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SubCommand {
  /// Create a new classroom
  Create {
    /// Name of the classroom
    #[clap(long, short)]
    name: String,

    /// Number of hosts to launch
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    number: u32,
  },
  /// Destroy a classroom and everything it owns
  Destroy {
    /// Name of the classroom
    #[clap(long, short)]
    name: String,
  },
  /// List all classrooms
  List {
    /// Output format, either "json" or "plain"
    #[clap(long, short, default_value = "plain")]
    format: Format,
  },
  /// Show the status, SSH key and hosts of a classroom
  Describe {
    /// Name of the classroom
    #[clap(long, short)]
    name: String,

    /// Output format, either "json" or "plain"
    #[clap(long, short, default_value = "plain")]
    format: Format,
  },
}
