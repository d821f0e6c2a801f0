//! Emotion labels and expression confidence scores.
//!
//! The label set is closed and matches what the expression classifier emits:
//! neutral, happy, sad, surprised, angry, disgusted, fearful.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Facial emotion reported to the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Resting face; also the fallback when no expression scores exist.
    #[default]
    Neutral,
    Happy,
    Sad,
    Surprised,
    Angry,
    Disgusted,
    Fearful,
}

impl Emotion {
    /// All labels in classifier order.
    pub const ALL: &'static [Emotion] = &[
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprised,
        Emotion::Angry,
        Emotion::Disgusted,
        Emotion::Fearful,
    ];

    /// Returns the label as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprised => "surprised",
            Emotion::Angry => "angry",
            Emotion::Disgusted => "disgusted",
            Emotion::Fearful => "fearful",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = EmotionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Emotion::Neutral),
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "surprised" => Ok(Emotion::Surprised),
            "angry" => Ok(Emotion::Angry),
            "disgusted" => Ok(Emotion::Disgusted),
            "fearful" => Ok(Emotion::Fearful),
            _ => Err(EmotionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown emotion label: {0}")]
pub struct EmotionParseError(String);

/// Per-frame mapping from emotion label to confidence in `[0, 1]`.
///
/// Serializes as a plain JSON object (`{"happy": 0.6, "neutral": 0.3}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ExpressionScores(BTreeMap<Emotion, f64>);

impl ExpressionScores {
    /// Create an empty score mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the confidence for a label, replacing any previous value.
    pub fn insert(&mut self, emotion: Emotion, confidence: f64) {
        self.0.insert(emotion, confidence);
    }

    /// Confidence for a label, if the classifier reported one.
    pub fn get(&self, emotion: Emotion) -> Option<f64> {
        self.0.get(&emotion).copied()
    }

    /// Iterate `(label, confidence)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        self.0.iter().map(|(e, c)| (*e, *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Emotion, f64)> for ExpressionScores {
    fn from_iter<I: IntoIterator<Item = (Emotion, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(Emotion, f64); N]> for ExpressionScores {
    fn from(pairs: [(Emotion, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// The emotion most recently confirmed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmotionState {
    /// Confirmed label
    pub emotion: Emotion,
    /// Confidence the label was confirmed with
    pub confidence: f64,
}

impl EmotionState {
    pub fn new(emotion: Emotion, confidence: f64) -> Self {
        Self { emotion, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_parse() {
        assert_eq!("happy".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!("Surprised".parse::<Emotion>().unwrap(), Emotion::Surprised);
        assert_eq!("fearful".parse::<Emotion>().unwrap(), Emotion::Fearful);
        assert!("bored".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_emotion_display_matches_serde() {
        for emotion in Emotion::ALL {
            let json = serde_json::to_string(emotion).unwrap();
            assert_eq!(json, format!("\"{}\"", emotion));
        }
    }

    #[test]
    fn test_scores_serialize_as_object() {
        let scores = ExpressionScores::from([(Emotion::Happy, 0.6), (Emotion::Neutral, 0.3)]);
        let value = serde_json::to_value(&scores).unwrap();

        assert_eq!(value["happy"], 0.6);
        assert_eq!(value["neutral"], 0.3);

        let parsed: ExpressionScores =
            serde_json::from_str(r#"{"sad": 0.7, "angry": 0.1}"#).unwrap();
        assert_eq!(parsed.get(Emotion::Sad), Some(0.7));
        assert_eq!(parsed.get(Emotion::Happy), None);
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let result: Result<ExpressionScores, _> = serde_json::from_str(r#"{"bored": 0.9}"#);
        assert!(result.is_err());
    }
}
