//! Status reporting to the host CI environment.
//!
//! The Actions runner reads workflow commands from the step's stdout:
//! `::warning::` and `::error::` lines become annotations, anything else is
//! plain log output. A run marked failed must end with a non-zero exit status.

use std::io::Write;

/// Sink for the status trail of a sweep run.
pub trait Reporter {
    /// Informational status line.
    fn info(&mut self, message: &str);

    /// Non-fatal problem.
    fn warning(&mut self, message: &str);

    /// Fatal problem. Marks the run as failed.
    fn set_failed(&mut self, message: &str);

    /// Plain console output, used for `debug` chatter.
    fn log(&mut self, message: &str);

    /// Whether [`Reporter::set_failed`] has been called.
    fn failed(&self) -> bool;
}

/// Escape command data the same way the Actions toolkit does.
pub fn escape_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Writes workflow commands to any writer, normally stdout.
#[derive(Debug)]
pub struct WorkflowReporter<W: Write> {
    out: W,
    failed: bool,
}

impl WorkflowReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WorkflowReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write workflow output");
        }
    }
}

impl<W: Write> Reporter for WorkflowReporter<W> {
    fn info(&mut self, message: &str) {
        self.emit(message);
    }

    fn warning(&mut self, message: &str) {
        self.emit(&format!("::warning::{}", escape_data(message)));
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        self.emit(&format!("::error::{}", escape_data(message)));
    }

    fn log(&mut self, message: &str) {
        self.emit(message);
    }

    fn failed(&self) -> bool {
        self.failed
    }
}
