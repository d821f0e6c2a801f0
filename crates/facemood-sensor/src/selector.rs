//! Emotion selection policy.
//!
//! Picks the highest-confidence label of a frame and reports it only when it
//! clears [`EMOTION_THRESHOLD`] and differs from the label last reported.
//! This gives implicit hysteresis: weak frames never overwrite a confirmed
//! emotion, and a steady expression fires exactly once.
//!
//! Ties between equal confidences go to the first label iterated. That order
//! is not part of the contract.

use facemood_models::{Emotion, EmotionState, ExpressionScores};

/// Confidence a label must strictly exceed to be reported.
pub const EMOTION_THRESHOLD: f64 = 0.4;

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Highest-confidence label of the frame (neutral if none)
    pub emotion: Emotion,
    /// Its confidence (0 if none)
    pub confidence: f64,
    /// Whether the label should be reported to the host
    pub changed: bool,
}

/// Select the emotion to report for one frame.
///
/// # Arguments
/// * `expressions` - Per-label confidences of the frame
/// * `previous` - Last reported emotion, if any
pub fn select(expressions: &ExpressionScores, previous: Option<&EmotionState>) -> Selection {
    let mut emotion = Emotion::Neutral;
    let mut confidence = 0.0;

    for (label, score) in expressions.iter() {
        if score > confidence {
            emotion = label;
            confidence = score;
        }
    }

    let differs = previous.map_or(true, |prev| prev.emotion != emotion);

    Selection {
        emotion,
        confidence,
        changed: confidence > EMOTION_THRESHOLD && differs,
    }
}

/// Holds the reported [`EmotionState`] and applies selections to it.
#[derive(Debug, Clone, Default)]
pub struct EmotionTracker {
    state: Option<EmotionState>,
}

impl EmotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported emotion.
    pub fn current(&self) -> Option<EmotionState> {
        self.state
    }

    /// Run selection on a frame, updating the state on a confirmed change.
    ///
    /// # Returns
    /// The new state when the host must be notified.
    pub fn apply(&mut self, expressions: &ExpressionScores) -> Option<EmotionState> {
        let selection = select(expressions, self.state.as_ref());
        if !selection.changed {
            return None;
        }

        let state = EmotionState::new(selection.emotion, selection.confidence);
        self.state = Some(state);
        Some(state)
    }
}
