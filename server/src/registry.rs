//! Entity identity allocation.
//!
//! Identifiers are hierarchical strings: a container path plus a
//! locally-unique numeric suffix (`"/3/12"` = suffix `12` inside container
//! `"/3/"`).
//!
//! # Invariants
//! - One counter per container, starting at 0, monotonic for the lifetime of
//!   the world. An identifier is never reused after its entity is destroyed.
//! - Externally supplied identifiers (entity restore) must be reserved through
//!   [`IdAllocator::reserve`] so the counter can never later collide with
//!   them.

use shared::ShapeId;
use std::collections::HashMap;

/// Allocates collision-free identifiers scoped to a container path.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: HashMap<String, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `container + counter`, then advance the container's counter.
    /// Never fails; an unseen container starts at 0.
    pub fn allocate(&mut self, container: &str) -> ShapeId {
        let counter = self.counters.entry(container.to_string()).or_insert(0);
        let id = format!("{container}{counter}");
        *counter += 1;
        id
    }

    /// Reserve an externally supplied identifier against future allocation.
    ///
    /// When `id` parses as `container + numeric suffix`, the container's
    /// counter is bumped past the suffix, so a later [`allocate`] in the same
    /// container cannot produce a colliding identifier. Identifiers with
    /// non-numeric suffixes occupy a namespace `allocate` never emits and need
    /// no reservation.
    ///
    /// [`allocate`]: IdAllocator::allocate
    pub fn reserve(&mut self, id: &str) {
        // Digits are single-byte, so byte arithmetic on the suffix is safe
        // regardless of what the container path contains.
        let digits = id.chars().rev().take_while(char::is_ascii_digit).count();
        let split = id.len() - digits;
        let suffix = &id[split..];
        if suffix.is_empty() {
            return;
        }
        let Ok(value) = suffix.parse::<u64>() else {
            // Suffix longer than u64: out of the allocator's range entirely.
            return;
        };

        let container = &id[..split];
        let counter = self.counters.entry(container.to_string()).or_insert(0);
        *counter = (*counter).max(value + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_monotonic_within_a_container() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("/"), "/0");
        assert_eq!(ids.allocate("/"), "/1");
        assert_eq!(ids.allocate("/"), "/2");
    }

    #[test]
    fn containers_count_independently() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("/3/"), "/3/0");
        assert_eq!(ids.allocate("/7/"), "/7/0");
        assert_eq!(ids.allocate("/3/"), "/3/1");
    }

    #[test]
    fn identifiers_are_never_reused() {
        // Counters never reset: a long-lived world with churn keeps producing
        // fresh identifiers even after every entity is destroyed.
        let mut ids = IdAllocator::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(ids.allocate("/")));
        }
    }

    #[test]
    fn reserve_bumps_counter_past_external_id() {
        let mut ids = IdAllocator::new();
        ids.reserve("/12");
        assert_eq!(ids.allocate("/"), "/13");

        // Reserving below the current counter changes nothing.
        ids.reserve("/4");
        assert_eq!(ids.allocate("/"), "/14");
    }

    #[test]
    fn reserve_scopes_to_the_id_container() {
        let mut ids = IdAllocator::new();
        ids.reserve("/3/12");
        assert_eq!(ids.allocate("/3/"), "/3/13");
        assert_eq!(ids.allocate("/"), "/0");
    }

    #[test]
    fn non_numeric_suffixes_do_not_disturb_counters() {
        let mut ids = IdAllocator::new();
        ids.reserve("/ground");
        assert_eq!(ids.allocate("/"), "/0");
    }
}
