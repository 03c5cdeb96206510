//! Agent task tracking
//!
//! AgentTaskEntry is one remote subtask in flight.
//! AgentTaskTracker folds task lifecycle frames into a map of those entries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::protocol::EventFrame;

/// Lifecycle status reported with each task update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AgentTaskStatus {
    Started,
    /// Still working; carries the backend's status text
    Running { status: String },
    Completed { success: bool },
}

impl AgentTaskStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, AgentTaskStatus::Completed { .. })
    }
}

/// State of a single in-flight task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTaskEntry {
    pub task_id: String,
    pub agent_type: String,
    pub description: String,
    /// Last reported progress, 0.0 to 1.0
    pub progress: f64,
    /// Last reported status text
    pub status: Option<String>,
}

impl AgentTaskEntry {
    pub fn new(task_id: String, agent_type: String, description: String) -> Self {
        Self {
            task_id,
            agent_type,
            description,
            progress: 0.0,
            status: None,
        }
    }
}

/// Result of applying one task frame
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTaskUpdate {
    pub task_id: String,
    pub status: AgentTaskStatus,
    pub progress: f64,
}

/// Tracks in-flight agent tasks for one session
///
/// Start inserts at progress 0, progress overwrites (last write wins) and
/// complete removes the entry whatever its outcome. Tasks are independent.
#[derive(Debug, Clone, Default)]
pub struct AgentTaskTracker {
    tasks: HashMap<String, AgentTaskEntry>,
}

impl AgentTaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a frame. Returns the update to report, or `None` for frames
    /// that are not task lifecycle frames.
    pub fn apply(&mut self, frame: &EventFrame) -> Option<AgentTaskUpdate> {
        match frame {
            EventFrame::AgentTaskStart {
                task_id,
                agent_type,
                description,
            } => Some(self.start(task_id, agent_type, description)),
            EventFrame::AgentTaskProgress {
                task_id,
                progress,
                status,
            } => Some(self.progress(task_id, *progress, status)),
            EventFrame::AgentTaskComplete {
                task_id, success, ..
            } => Some(self.complete(task_id, *success)),
            _ => None,
        }
    }

    /// Register a task at progress 0. Restarting a known id resets it.
    pub fn start(&mut self, task_id: &str, agent_type: &str, description: &str) -> AgentTaskUpdate {
        debug!(task_id, agent_type, "Agent task started");
        self.tasks.insert(
            task_id.to_string(),
            AgentTaskEntry::new(
                task_id.to_string(),
                agent_type.to_string(),
                description.to_string(),
            ),
        );
        AgentTaskUpdate {
            task_id: task_id.to_string(),
            status: AgentTaskStatus::Started,
            progress: 0.0,
        }
    }

    /// Overwrite a task's progress.
    ///
    /// Progress for an id that was never started creates the entry, since
    /// the start frame may have been lost to a parse failure.
    pub fn progress(&mut self, task_id: &str, progress: f64, status: &str) -> AgentTaskUpdate {
        let entry = self.tasks.entry(task_id.to_string()).or_insert_with(|| {
            debug!(task_id, "Progress for unknown agent task, tracking it");
            AgentTaskEntry::new(task_id.to_string(), String::new(), String::new())
        });
        entry.progress = progress.clamp(0.0, 1.0);
        entry.status = Some(status.to_string());

        AgentTaskUpdate {
            task_id: task_id.to_string(),
            status: AgentTaskStatus::Running {
                status: status.to_string(),
            },
            progress: entry.progress,
        }
    }

    /// Remove a task. Unknown ids are a no-op apart from the update.
    pub fn complete(&mut self, task_id: &str, success: bool) -> AgentTaskUpdate {
        let last = self.tasks.remove(task_id).map(|entry| entry.progress);
        debug!(task_id, success, "Agent task completed");
        AgentTaskUpdate {
            task_id: task_id.to_string(),
            status: AgentTaskStatus::Completed { success },
            progress: if success { 1.0 } else { last.unwrap_or(0.0) },
        }
    }

    pub fn get(&self, task_id: &str) -> Option<&AgentTaskEntry> {
        self.tasks.get(task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    /// Progress by task id, ordered by id
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.tasks
            .iter()
            .map(|(id, entry)| (id.clone(), entry.progress))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
