//! Terminal output for streamed turns.

use std::io::Write;

use crate::error::StreamError;
use crate::models::ChatResponse;
use crate::session::{StreamObserver, StreamingChunk};
use crate::state::AgentTaskStatus;

/// Observer that writes tokens to `out` as they arrive and task/error
/// notices to `err`.
pub struct PrintingObserver<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
    printed: bool,
}

impl PrintingObserver<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> PrintingObserver<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            printed: false,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> StreamObserver for PrintingObserver<O, E> {
    fn on_chunk(&mut self, chunk: &StreamingChunk) {
        if chunk.text.is_empty() {
            return;
        }
        let _ = write!(self.out, "{}", chunk.text);
        let _ = self.out.flush();
        self.printed = true;
    }

    fn on_complete(&mut self, response: &ChatResponse) {
        // Nothing streamed, or a fallback replaced the stream
        if !self.printed || (response.is_fallback() && !response.metadata.partial) {
            let _ = write!(self.out, "{}", response.response);
        }
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        if let Some(reason) = &response.metadata.fallback_reason {
            let _ = writeln!(self.err, "[degraded: {}]", reason);
        }
    }

    fn on_error(&mut self, error: &StreamError) {
        if self.printed {
            let _ = writeln!(self.out);
        }
        let _ = writeln!(self.err, "error [{}]: {}", error.error_code(), error.user_message());
    }

    fn on_agent_task(&mut self, task_id: &str, status: &AgentTaskStatus, progress: f64) {
        let label = match status {
            AgentTaskStatus::Started => "started".to_string(),
            AgentTaskStatus::Running { status } => status.clone(),
            AgentTaskStatus::Completed { success: true } => "done".to_string(),
            AgentTaskStatus::Completed { success: false } => "failed".to_string(),
        };
        let _ = writeln!(
            self.err,
            "[task {}] {} ({:.0}%)",
            task_id,
            label,
            progress * 100.0
        );
    }
}
