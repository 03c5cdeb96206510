//! Agent task lifecycle parsers

use serde_json::Value;

use super::{decode, FrameParseError};
use crate::protocol::events::EventFrame;
use crate::protocol::payloads::{
    AgentTaskCompletePayload, AgentTaskProgressPayload, AgentTaskStartPayload,
};

/// Parse `agent_task_start`
pub(super) fn parse_agent_task_start_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: AgentTaskStartPayload = decode(event_type, data)?;
    Ok(EventFrame::AgentTaskStart {
        task_id: payload.task_id,
        agent_type: payload.agent_type,
        description: payload.description,
    })
}

/// Parse `agent_task_progress`. Progress is clamped into `0.0..=1.0`;
/// NaN is treated as no progress.
pub(super) fn parse_agent_task_progress_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: AgentTaskProgressPayload = decode(event_type, data)?;
    let progress = if payload.progress.is_nan() {
        0.0
    } else {
        payload.progress.clamp(0.0, 1.0)
    };
    Ok(EventFrame::AgentTaskProgress {
        task_id: payload.task_id,
        progress,
        status: payload.status,
    })
}

/// Parse `agent_task_complete`
pub(super) fn parse_agent_task_complete_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: AgentTaskCompletePayload = decode(event_type, data)?;
    Ok(EventFrame::AgentTaskComplete {
        task_id: payload.task_id,
        result: payload.result,
        success: payload.success,
    })
}
