//! Errors raised while translating scheduler events into thread transitions

use crate::types::EventIndex;
use thiserror::Error;

/// Errors that can occur while building or running an [`EventLoader`](crate::loader::EventLoader)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// The registry was constructed without any tracepoint interpreters
    #[error("an empty event loader cannot generate thread transitions")]
    EmptyRegistry,

    /// A field required by the event's tracepoint was absent
    #[error("field '{field}' not found for event {event_index}")]
    MissingField {
        field: &'static str,
        event_index: EventIndex,
    },
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;
