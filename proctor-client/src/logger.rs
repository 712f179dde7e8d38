use colored::Colorize;
use proctor_common::progress::ProgressLog;
use tracing::debug;

/// Prints workflow progress to stderr so stdout only carries command output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLog;

impl ProgressLog for ConsoleLog {
  fn println(&self, indentation: usize, message: &str) {
    debug!(indentation, "{}", message);
    eprintln!("{:width$}{}", "", message, width = indentation * 2);
  }

  fn green(&self, text: &str) -> String {
    text.green().to_string()
  }
}
