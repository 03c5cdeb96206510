//! Per-session state containers
//!
//! - AgentTaskTracker: in-flight remote subtasks and their progress

pub mod agent_tasks;

pub use agent_tasks::{AgentTaskEntry, AgentTaskStatus, AgentTaskTracker, AgentTaskUpdate};
