//! Sensor lifecycle and detection loop states.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one sensor instance.
///
/// Forward transitions follow declaration order. `Unmounted` is terminal and
/// reachable from every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Instance created, camera not yet acquired or models not requested
    #[default]
    MountedIdle,
    /// Model bundle is being loaded
    ModelsLoading,
    /// Model bundle available, loop not started
    ModelsReady,
    /// Detection loop has been started
    LoopRunning,
    /// Deactivated; the instance cannot be reused
    Unmounted,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::MountedIdle => "mounted_idle",
            LifecycleState::ModelsLoading => "models_loading",
            LifecycleState::ModelsReady => "models_ready",
            LifecycleState::LoopRunning => "loop_running",
            LifecycleState::Unmounted => "unmounted",
        }
    }

    /// Ordering rank of the mounted states.
    fn rank(&self) -> u8 {
        match self {
            LifecycleState::MountedIdle => 0,
            LifecycleState::ModelsLoading => 1,
            LifecycleState::ModelsReady => 2,
            LifecycleState::LoopRunning => 3,
            LifecycleState::Unmounted => 4,
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// A failed model load may fall back from `ModelsLoading` to
    /// `MountedIdle`; every other move must go forward.
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        match (self, next) {
            (LifecycleState::Unmounted, _) => false,
            (_, LifecycleState::Unmounted) => true,
            (LifecycleState::ModelsLoading, LifecycleState::MountedIdle) => true,
            (current, next) => next.rank() > current.rank(),
        }
    }

    /// Models are loaded (or the loop already runs on them).
    pub fn models_ready(&self) -> bool {
        matches!(self, LifecycleState::ModelsReady | LifecycleState::LoopRunning)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Unmounted)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detection loop state: `Running` once the first face has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    Idle,
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(LifecycleState::MountedIdle.can_transition_to(LifecycleState::ModelsLoading));
        assert!(LifecycleState::ModelsLoading.can_transition_to(LifecycleState::ModelsReady));
        assert!(LifecycleState::ModelsReady.can_transition_to(LifecycleState::LoopRunning));
        assert!(LifecycleState::MountedIdle.can_transition_to(LifecycleState::LoopRunning));
        assert!(!LifecycleState::LoopRunning.can_transition_to(LifecycleState::ModelsReady));
        assert!(!LifecycleState::ModelsReady.can_transition_to(LifecycleState::ModelsReady));
    }

    #[test]
    fn test_failed_load_falls_back() {
        assert!(LifecycleState::ModelsLoading.can_transition_to(LifecycleState::MountedIdle));
        assert!(!LifecycleState::ModelsReady.can_transition_to(LifecycleState::MountedIdle));
    }

    #[test]
    fn test_unmounted_is_terminal() {
        for state in [
            LifecycleState::MountedIdle,
            LifecycleState::ModelsLoading,
            LifecycleState::ModelsReady,
            LifecycleState::LoopRunning,
        ] {
            assert!(state.can_transition_to(LifecycleState::Unmounted));
            assert!(!LifecycleState::Unmounted.can_transition_to(state));
        }
        assert!(LifecycleState::Unmounted.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::ModelsReady.to_string(), "models_ready");
        assert!(LifecycleState::LoopRunning.models_ready());
        assert!(!LifecycleState::ModelsLoading.models_ready());
    }
}
