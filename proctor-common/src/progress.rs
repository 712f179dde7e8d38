/// Step-by-step reporting for the classroom workflows.
///
/// Output is for the operator's benefit only; nothing depends on it.
pub trait ProgressLog: Send + Sync {
  fn println(&self, indentation: usize, message: &str);

  /// Highlights a value inside a progress message.
  fn green(&self, text: &str) -> String;
}
