use std::{collections::HashSet, hash::Hash};

pub const REVEAL_SELECTOR: &str = ".reveal";
pub const VISIBLE_CLASS: &str = "visible";
pub const REVEAL_THRESHOLD: f64 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealChange {
    Revealed,
    Unchanged,
}

/// Hidden -> visible bookkeeping for observed elements. An id reveals at most
/// once and is never watched again afterwards.
pub struct RevealTracker<K> {
    threshold: f64,
    watched: HashSet<K>,
    revealed: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RevealTracker<K> {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            watched: HashSet::new(),
            revealed: HashSet::new(),
        }
    }

    /// Returns `true` when the id starts being watched.
    pub fn observe(&mut self, id: K) -> bool {
        if self.revealed.contains(&id) {
            return false;
        }

        self.watched.insert(id)
    }

    pub fn record(&mut self, id: &K, intersection_ratio: f64) -> RevealChange {
        if intersection_ratio < self.threshold || !self.watched.remove(id) {
            return RevealChange::Unchanged;
        }

        self.revealed.insert(id.clone());
        RevealChange::Revealed
    }

    pub fn is_revealed(&self, id: &K) -> bool {
        self.revealed.contains(id)
    }

    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    pub fn clear(&mut self) {
        self.watched.clear();
    }
}

impl<K: Eq + Hash + Clone> Default for RevealTracker<K> {
    fn default() -> Self {
        Self::new(REVEAL_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_only_once_threshold_is_reached() {
        let mut tracker = RevealTracker::default();
        assert!(tracker.observe(1_u32));

        assert_eq!(tracker.record(&1, 0.0), RevealChange::Unchanged);
        assert_eq!(tracker.record(&1, 0.149), RevealChange::Unchanged);
        assert!(!tracker.is_revealed(&1));

        assert_eq!(tracker.record(&1, 0.15), RevealChange::Revealed);
        assert!(tracker.is_revealed(&1));
        assert_eq!(tracker.watched_len(), 0);
    }

    #[test]
    fn revealed_element_never_transitions_again() {
        let mut tracker = RevealTracker::default();
        tracker.observe(7_u32);
        assert_eq!(tracker.record(&7, 0.9), RevealChange::Revealed);

        assert!(!tracker.observe(7));
        assert_eq!(tracker.record(&7, 1.0), RevealChange::Unchanged);
        assert_eq!(tracker.record(&7, 0.0), RevealChange::Unchanged);
        assert!(tracker.is_revealed(&7));
    }

    #[test]
    fn unobserved_ids_are_ignored() {
        let mut tracker = RevealTracker::<u32>::default();
        assert_eq!(tracker.record(&3, 1.0), RevealChange::Unchanged);
        assert!(!tracker.is_revealed(&3));
    }

    #[test]
    fn observing_twice_keeps_single_watch() {
        let mut tracker = RevealTracker::default();
        assert!(tracker.observe("card"));
        assert!(!tracker.observe("card"));
        assert_eq!(tracker.watched_len(), 1);
    }

    #[test]
    fn each_element_reveals_independently() {
        let mut tracker = RevealTracker::default();
        for id in 0..4_u32 {
            tracker.observe(id);
        }

        let ratios = [0.2, 0.1, 0.5, 0.0];
        let revealed: Vec<u32> = (0..4_u32)
            .filter(|id| tracker.record(id, ratios[*id as usize]) == RevealChange::Revealed)
            .collect();

        assert_eq!(revealed, vec![0, 2]);
        assert_eq!(tracker.watched_len(), 2);
    }
}
