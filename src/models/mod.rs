mod request;
mod response;

pub use request::{AgentOverride, StreamRequest};
pub use response::{ChatResponse, ResponseMetadata, FALLBACK_AGENT_TYPE};
