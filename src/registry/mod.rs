//! In-memory rollout registry.
//!
//! One record per rollout id, held for the life of the process. Records are
//! never evicted, so long-running deployments grow without bound; this mirrors
//! the reference behavior and is a caveat, not a feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rollout.
///
/// Only `running -> terminal` transitions occur. `Timeout` and `Cancelled`
/// exist in the wire contract but no code path in this server produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloutStatus {
    Running,
    Completed,
    Failed,
    Timeout,
    Cancelled,
}

impl RolloutStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RolloutStatus::Running)
    }
}

/// A tracked rollout: one unit of LLM-interaction work.
#[derive(Debug, Clone, Serialize)]
pub struct Rollout {
    pub rollout_id: String,
    pub status: RolloutStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed_turns: u32,
    pub error: Option<String>,
}

/// Terminal outcome handed to [`RolloutRegistry::complete`].
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed { turns: u32 },
    Failed { error: String },
}

/// Shared map of rollout id to record.
///
/// Cloning is cheap (`Arc`); the inner map is mutex-guarded because handlers
/// and dispatch tasks run on different tokio worker threads.
#[derive(Clone, Default)]
pub struct RolloutRegistry {
    inner: Arc<Mutex<HashMap<String, Rollout>>>,
}

impl RolloutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rollout as running.
    ///
    /// An existing record under the same id is silently overwritten; there is
    /// no duplicate guard, so a second init for an id resets its slot while
    /// the first dispatch may still be in flight (last writer wins).
    pub fn create(&self, rollout_id: &str) {
        let rollout = Rollout {
            rollout_id: rollout_id.to_string(),
            status: RolloutStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
            completed_turns: 0,
            error: None,
        };
        let mut map = self.inner.lock().expect("registry lock poisoned");
        if map.insert(rollout_id.to_string(), rollout).is_some() {
            tracing::warn!(%rollout_id, "re-registered an existing rollout id");
        }
    }

    pub fn get(&self, rollout_id: &str) -> Option<Rollout> {
        let map = self.inner.lock().expect("registry lock poisoned");
        map.get(rollout_id).cloned()
    }

    /// Transition a rollout to a terminal status and stamp its end time.
    ///
    /// Writes unconditionally: if racing dispatches target one slot, the last
    /// completion determines the final record.
    pub fn complete(&self, rollout_id: &str, outcome: Outcome) {
        let mut map = self.inner.lock().expect("registry lock poisoned");
        let Some(rollout) = map.get_mut(rollout_id) else {
            tracing::warn!(%rollout_id, "completion for unknown rollout id");
            return;
        };
        rollout.ended_at = Some(Utc::now());
        match outcome {
            Outcome::Completed { turns } => {
                rollout.status = RolloutStatus::Completed;
                rollout.completed_turns = turns;
                rollout.error = None;
            }
            Outcome::Failed { error } => {
                rollout.status = RolloutStatus::Failed;
                rollout.error = Some(error);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_is_running() {
        let registry = RolloutRegistry::new();
        registry.create("rll_1");

        let rollout = registry.get("rll_1").expect("record missing");
        assert_eq!(rollout.status, RolloutStatus::Running);
        assert!(rollout.ended_at.is_none());
        assert_eq!(rollout.completed_turns, 0);
        assert!(rollout.error.is_none());
    }

    #[test]
    fn get_unknown_id_is_none() {
        let registry = RolloutRegistry::new();
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn complete_success_stamps_end_and_turns() {
        let registry = RolloutRegistry::new();
        registry.create("rll_1");
        registry.complete("rll_1", Outcome::Completed { turns: 1 });

        let rollout = registry.get("rll_1").unwrap();
        assert_eq!(rollout.status, RolloutStatus::Completed);
        assert!(rollout.status.is_terminal());
        assert!(rollout.ended_at.is_some());
        assert_eq!(rollout.completed_turns, 1);
    }

    #[test]
    fn complete_failure_records_error_text() {
        let registry = RolloutRegistry::new();
        registry.create("rll_1");
        registry.complete(
            "rll_1",
            Outcome::Failed {
                error: "connection refused".into(),
            },
        );

        let rollout = registry.get("rll_1").unwrap();
        assert_eq!(rollout.status, RolloutStatus::Failed);
        assert_eq!(rollout.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn create_overwrites_existing_slot() {
        let registry = RolloutRegistry::new();
        registry.create("rll_1");
        registry.complete("rll_1", Outcome::Completed { turns: 1 });

        // Second init resets the slot to running; nothing guards against it.
        registry.create("rll_1");
        let rollout = registry.get("rll_1").unwrap();
        assert_eq!(rollout.status, RolloutStatus::Running);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_completion_wins() {
        let registry = RolloutRegistry::new();
        registry.create("rll_1");
        registry.complete("rll_1", Outcome::Completed { turns: 1 });
        registry.complete(
            "rll_1",
            Outcome::Failed {
                error: "late failure".into(),
            },
        );

        let rollout = registry.get("rll_1").unwrap();
        assert_eq!(rollout.status, RolloutStatus::Failed);
        assert_eq!(rollout.error.as_deref(), Some("late failure"));
    }

    #[test]
    fn completion_for_unknown_id_is_a_noop() {
        let registry = RolloutRegistry::new();
        registry.complete("ghost", Outcome::Completed { turns: 1 });
        assert!(registry.get("ghost").is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&RolloutStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
