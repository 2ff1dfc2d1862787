//! Phase timing.
//!
//! Phases nest: a sub-phase is attached to its parent when it ends, in
//! end order. Phases abandoned by a cancelled task simply never reach
//! the completed map.

use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseId(Uuid);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub name: String,
    pub duration_nanos: u64,
    pub sub_phases: Vec<PhaseMetrics>,
}

impl PhaseMetrics {
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_nanos)
    }
}

/// Human-readable duration in milliseconds or seconds.
pub fn format_duration(nanos: u64) -> String {
    let millis = nanos / 1_000_000;
    if millis >= 1_000 {
        format!("{:.2}s", millis as f64 / 1_000.0)
    } else {
        format!("{}ms", millis)
    }
}

#[derive(Debug)]
struct ActivePhase {
    name: String,
    parent: Option<PhaseId>,
    started: Instant,
    children: Vec<PhaseMetrics>,
}

#[derive(Debug, Default)]
struct TrackerState {
    active: IndexMap<PhaseId, ActivePhase>,
    completed: IndexMap<String, PhaseMetrics>,
}

#[derive(Debug, Default)]
pub struct PhaseTracker {
    state: Mutex<TrackerState>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_phase(&self, name: impl Into<String>, parent: Option<PhaseId>) -> PhaseId {
        let id = PhaseId(Uuid::new_v4());
        let mut state = self.state.lock();
        state.active.insert(
            id,
            ActivePhase {
                name: name.into(),
                parent,
                started: Instant::now(),
                children: Vec::new(),
            },
        );
        id
    }

    /// End a phase and return its metrics. Ending an unknown id returns
    /// `None` (the phase was abandoned or already ended).
    pub fn end_phase(&self, id: PhaseId) -> Option<PhaseMetrics> {
        let mut state = self.state.lock();
        let phase = state.active.shift_remove(&id)?;
        let metrics = PhaseMetrics {
            name: phase.name.clone(),
            duration_nanos: phase.started.elapsed().as_nanos() as u64,
            sub_phases: phase.children,
        };
        match phase.parent.and_then(|p| state.active.get_mut(&p)) {
            Some(parent) => parent.children.push(metrics.clone()),
            None => {
                state
                    .completed
                    .insert(metrics.name.clone(), metrics.clone());
            }
        }
        Some(metrics)
    }

    pub fn active_phase_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Completed top-level phases, keyed by name, in completion order.
    pub fn all_completed(&self) -> IndexMap<String, PhaseMetrics> {
        self.state.lock().completed.clone()
    }

    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.active.clear();
        state.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_sub_phases_in_end_order() {
        let tracker = PhaseTracker::new();
        let parent = tracker.start_phase("frontend", None);
        let second = tracker.start_phase("extract", Some(parent));
        let first = tracker.start_phase("resolve", Some(parent));
        tracker.end_phase(first).unwrap();
        tracker.end_phase(second).unwrap();
        let metrics = tracker.end_phase(parent).unwrap();
        let names: Vec<&str> = metrics.sub_phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["resolve", "extract"]);
        assert_eq!(tracker.active_phase_count(), 0);
        assert!(tracker.all_completed().contains_key("frontend"));
    }

    #[test]
    fn child_durations_do_not_exceed_parent() {
        let tracker = PhaseTracker::new();
        let parent = tracker.start_phase("outer", None);
        let child = tracker.start_phase("inner", Some(parent));
        std::thread::sleep(std::time::Duration::from_millis(2));
        tracker.end_phase(child).unwrap();
        let metrics = tracker.end_phase(parent).unwrap();
        let child_sum: u64 = metrics.sub_phases.iter().map(|p| p.duration_nanos).sum();
        assert!(child_sum <= metrics.duration_nanos);
    }

    #[test]
    fn abandoned_phases_never_complete() {
        let tracker = PhaseTracker::new();
        let _abandoned = tracker.start_phase("never-ended", None);
        assert_eq!(tracker.active_phase_count(), 1);
        assert!(tracker.all_completed().is_empty());
        tracker.reset();
        assert_eq!(tracker.active_phase_count(), 0);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(44_000_000), "44ms");
        assert_eq!(format_duration(1_230_000_000), "1.23s");
        assert_eq!(format_duration(10_000), "0ms");
    }
}
