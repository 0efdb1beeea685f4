//! Event Window Implementation

use crate::DEFAULT_RETENTION_MS;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

/// Ordered event timestamps (ms) with prefix eviction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWindow {
    /// Retained timestamps, oldest first
    events: VecDeque<u64>,
    /// Maximum age of a retained event (ms)
    retention_ms: u64,
    /// Total events ever recorded (for statistics)
    total_recorded: usize,
}

impl EventWindow {
    /// Create a new window with the given retention
    pub fn new(retention_ms: u64) -> Self {
        Self {
            events: VecDeque::new(),
            retention_ms,
            total_recorded: 0,
        }
    }

    /// Create a window with the default one-minute retention
    pub fn per_minute() -> Self {
        Self::new(DEFAULT_RETENTION_MS)
    }

    /// Record an event.
    ///
    /// Timestamps must not go backwards; an earlier timestamp is stored as
    /// the newest one so the window stays ordered.
    pub fn push(&mut self, timestamp_ms: u64) {
        let timestamp_ms = match self.events.back() {
            Some(&newest) if timestamp_ms < newest => newest,
            _ => timestamp_ms,
        };
        self.events.push_back(timestamp_ms);
        self.total_recorded += 1;
    }

    /// Evict every event older than the retention relative to `now_ms`.
    /// Returns the number of evicted events.
    pub fn prune(&mut self, now_ms: u64) -> usize {
        let mut evicted = 0;
        while let Some(&oldest) = self.events.front() {
            if now_ms.saturating_sub(oldest) > self.retention_ms {
                self.events.pop_front();
                evicted += 1;
            } else {
                break;
            }
        }
        if evicted > 0 {
            trace!("Evicted {} events older than {}ms", evicted, self.retention_ms);
        }
        evicted
    }

    /// Number of events no older than the retention at `now_ms`, without
    /// evicting anything
    pub fn count_at(&self, now_ms: u64) -> usize {
        self.events
            .iter()
            .filter(|&&ts| now_ms.saturating_sub(ts) <= self.retention_ms)
            .count()
    }

    /// Number of events currently retained
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the window holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate retained timestamps, oldest first
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.events.iter().copied()
    }

    /// Total events recorded since creation or the last clear
    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    /// Drop all events
    pub fn clear(&mut self) {
        self.events.clear();
        self.total_recorded = 0;
    }
}

impl Default for EventWindow {
    fn default() -> Self {
        Self::per_minute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_count() {
        let mut window = EventWindow::per_minute();

        for i in 0..5 {
            window.push(i * 1000);
        }

        assert_eq!(window.len(), 5);
        assert_eq!(window.iter().next(), Some(0));
        assert_eq!(window.iter().last(), Some(4000));
        assert_eq!(window.total_recorded(), 5);
    }

    #[test]
    fn test_prune_keeps_events_at_retention_edge() {
        let mut window = EventWindow::new(60_000);
        window.push(1_000);
        window.push(2_000);

        // Exactly 60s old is still retained
        assert_eq!(window.prune(61_000), 0);
        assert_eq!(window.len(), 2);

        // 60.001s old is evicted
        assert_eq!(window.prune(61_001), 1);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![2_000]);
    }

    #[test]
    fn test_count_at_ignores_stale_events_without_pruning() {
        let mut window = EventWindow::new(60_000);
        window.push(0);
        window.push(30_000);

        assert_eq!(window.count_at(60_000), 2);
        assert_eq!(window.count_at(60_001), 1);
        assert_eq!(window.count_at(200_000), 0);
        // Nothing evicted
        assert_eq!(window.len(), 2);

        // A query time before the events counts them all
        assert_eq!(window.count_at(10), 2);
    }

    #[test]
    fn test_regressed_timestamp_keeps_order() {
        let mut window = EventWindow::per_minute();
        window.push(5_000);
        window.push(4_000);

        let stamps: Vec<u64> = window.iter().collect();
        assert_eq!(stamps, vec![5_000, 5_000]);
    }

    #[test]
    fn test_clear() {
        let mut window = EventWindow::per_minute();
        window.push(10);
        window.clear();

        assert!(window.is_empty());
        assert_eq!(window.total_recorded(), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut window = EventWindow::new(1_000);
        window.push(42);

        let json = serde_json::to_string(&window).unwrap();
        let restored: EventWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.iter().collect::<Vec<_>>(), vec![42]);
        assert_eq!(restored.count_at(1_042), 1);
        assert_eq!(restored.count_at(1_043), 0);
    }

    proptest! {
        #[test]
        fn prop_no_event_older_than_retention(
            gaps in prop::collection::vec(0u64..20_000, 1..200),
            emit in prop::collection::vec(any::<bool>(), 200),
        ) {
            let mut window = EventWindow::per_minute();
            let mut now = 0u64;

            for (i, gap) in gaps.iter().enumerate() {
                now += gap;
                if emit[i] {
                    window.push(now);
                }
                window.prune(now);

                for stamp in window.iter() {
                    prop_assert!(now - stamp <= DEFAULT_RETENTION_MS);
                }
            }
        }

        #[test]
        fn prop_length_never_grows_without_events(
            stamps in prop::collection::vec(0u64..120_000, 0..50),
            queries in prop::collection::vec(0u64..5_000, 1..50),
        ) {
            let mut sorted = stamps.clone();
            sorted.sort_unstable();

            let mut window = EventWindow::per_minute();
            for stamp in &sorted {
                window.push(*stamp);
            }

            let mut now = sorted.last().copied().unwrap_or(0);
            window.prune(now);
            let mut previous = window.len();
            for step in queries {
                now += step;
                let current = window.count_at(now);
                window.prune(now);
                prop_assert_eq!(current, window.len());
                prop_assert!(current <= previous);
                previous = current;
            }
        }
    }
}
