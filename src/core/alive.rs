//! # Tracker of runners currently executing.
//!
//! Each runner task holds an [`AliveGuard`] for the duration of its `run`; the
//! guard unregisters on drop, including when the task is aborted or panics.
//! Used to name stuck runners when the grace period expires.
//!
//! Names are counted, so duplicate registrations are tracked independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe multiset of running runner names.
#[derive(Debug, Default)]
pub struct AliveTracker {
    state: Mutex<HashMap<String, usize>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as running until the returned guard is dropped.
    pub fn enter(self: &Arc<Self>, name: &str) -> AliveGuard {
        *self.lock().entry(name.to_string()).or_insert(0) += 1;
        AliveGuard {
            tracker: Arc::clone(self),
            name: name.to_string(),
        }
    }

    /// Returns sorted names of running runners (duplicates repeated).
    pub fn snapshot(&self) -> Vec<String> {
        let state = self.lock();
        let mut alive: Vec<String> = state
            .iter()
            .flat_map(|(name, n)| std::iter::repeat(name.clone()).take(*n))
            .collect();
        alive.sort_unstable();
        alive
    }

    fn leave(&self, name: &str) {
        let mut state = self.lock();
        if let Some(n) = state.get_mut(name) {
            *n -= 1;
            if *n == 0 {
                state.remove(name);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registration handle returned by [`AliveTracker::enter`].
#[derive(Debug)]
pub struct AliveGuard {
    tracker: Arc<AliveTracker>,
    name: String,
}

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.tracker.leave(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_lifetime() {
        let tracker = Arc::new(AliveTracker::new());
        let a = tracker.enter("a");
        let b1 = tracker.enter("b");
        let b2 = tracker.enter("b");
        assert_eq!(tracker.snapshot(), vec!["a", "b", "b"]);

        drop(b1);
        assert_eq!(tracker.snapshot(), vec!["a", "b"]);
        drop(b2);
        assert_eq!(tracker.snapshot(), vec!["a"]);

        drop(a);
        assert!(tracker.snapshot().is_empty());
    }
}
