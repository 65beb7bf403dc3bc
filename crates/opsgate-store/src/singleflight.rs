//! Singleflight for coalescing concurrent grant fetches.
//!
//! A store has exactly one fetch to deduplicate (the grant load for its
//! principal), so this is the single-slot form: one in-flight sender instead
//! of a keyed map. Multiple components mounting before data is ready share
//! one network call instead of issuing N redundant ones.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

/// What a caller got when it asked for the slot.
pub(crate) enum FlightSlot<T> {
    /// The slot was free: this caller runs the fetch and broadcasts the
    /// outcome through the sender.
    Leader(broadcast::Sender<T>),
    /// A fetch is already in flight: the receiver yields its outcome.
    Follower(broadcast::Receiver<T>),
}

/// Single-slot singleflight over a broadcast channel.
pub(crate) struct Singleflight<T> {
    in_flight: Mutex<Option<broadcast::Sender<T>>>,
}

impl<T: Clone> Singleflight<T> {
    pub(crate) fn new() -> Self {
        Self {
            in_flight: Mutex::new(None),
        }
    }

    /// Takes or joins the slot in one locked step, so no two callers can
    /// both end up leading.
    pub(crate) fn acquire(&self) -> FlightSlot<T> {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(tx) => FlightSlot::Follower(tx.subscribe()),
            None => {
                let (tx, _rx) = broadcast::channel(1);
                *slot = Some(tx.clone());
                FlightSlot::Leader(tx)
            }
        }
    }

    /// Clears the in-flight slot once the fetch has completed.
    pub(crate) fn complete(&self) {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

/// RAII guard that clears the slot on drop.
///
/// This prevents a leaked slot (and permanently-waiting followers) if the
/// leader's fetch panics.
pub(crate) struct FlightGuard<'a, T: Clone> {
    singleflight: &'a Singleflight<T>,
    completed: bool,
}

impl<'a, T: Clone> FlightGuard<'a, T> {
    pub(crate) fn new(singleflight: &'a Singleflight<T>) -> Self {
        Self {
            singleflight,
            completed: false,
        }
    }

    /// Clears the slot on the ordinary completion path, consuming the
    /// guard.
    pub(crate) fn complete(mut self) {
        self.singleflight.complete();
        self.completed = true;
    }
}

impl<T: Clone> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        if !self.completed {
            self.singleflight.complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_caller_is_leader_then_followers() {
        let sf: Singleflight<u32> = Singleflight::new();
        let leader = sf.acquire();
        assert!(matches!(leader, FlightSlot::Leader(_)));
        assert!(matches!(sf.acquire(), FlightSlot::Follower(_)));
        assert!(matches!(sf.acquire(), FlightSlot::Follower(_)));
    }

    #[test]
    fn test_slot_reopens_after_completion() {
        let sf: Singleflight<u32> = Singleflight::new();
        let _ = sf.acquire();
        sf.complete();
        assert!(matches!(sf.acquire(), FlightSlot::Leader(_)));
    }

    #[tokio::test]
    async fn test_followers_receive_the_leader_result() {
        let sf: Singleflight<u32> = Singleflight::new();
        let FlightSlot::Leader(tx) = sf.acquire() else {
            panic!("first caller must lead");
        };
        let FlightSlot::Follower(mut rx) = sf.acquire() else {
            panic!("second caller must follow");
        };

        tx.send(42).unwrap();
        assert_eq!(rx.recv().await.unwrap(), 42);
    }

    #[test]
    fn test_guard_clears_slot_on_drop() {
        let sf: Singleflight<u32> = Singleflight::new();
        let _leader = sf.acquire();
        {
            let _guard = FlightGuard::new(&sf);
            // Dropped without complete(), simulating a panicking leader.
        }
        assert!(matches!(sf.acquire(), FlightSlot::Leader(_)));
    }
}
