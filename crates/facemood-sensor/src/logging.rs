//! Structured session logging utilities.
//!
//! Provides consistent, structured logging for sensor lifecycle events with
//! tracing spans carrying the session ID.

use tracing::{error, info, warn, Span};

use facemood_models::{LifecycleState, SessionId};

/// Session logger for lifecycle events of one sensor instance.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    engine: String,
}

impl SessionLogger {
    /// Create a logger for a session driving the given engine.
    pub fn new(session_id: &SessionId, engine: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            engine: engine.to_string(),
        }
    }

    /// Log a lifecycle transition.
    pub fn log_transition(&self, from: LifecycleState, to: LifecycleState) {
        info!(
            session_id = %self.session_id,
            engine = %self.engine,
            from = %from,
            to = %to,
            "Sensor state changed"
        );
    }

    /// Log a lifecycle milestone.
    pub fn log_progress(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            engine = %self.engine,
            "Sensor: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            engine = %self.engine,
            "Sensor warning: {}", message
        );
    }

    /// Log a fatal activation error.
    pub fn log_error(&self, message: &str) {
        error!(
            session_id = %self.session_id,
            engine = %self.engine,
            "Sensor error: {}", message
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create a tracing span for this session.
    ///
    /// The detection loop task runs inside it.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "sensor",
            session_id = %self.session_id,
            engine = %self.engine
        )
    }
}
