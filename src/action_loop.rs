//! Deadline-bounded per-agent action collection.
//!
//! Each tick, [`DeadlineActionLoop::collect`] asks every registered policy
//! for one action, timing the call with a monotonic clock. A policy that
//! overruns its deadline, or returns an id outside the action table, gets the
//! safe no-op action substituted for that tick; the match is never crashed
//! over a misbehaving policy, and one agent's overrun never blocks or
//! penalizes another.
//!
//! The deadline is soft: the policy call is synchronous, so a pathological
//! policy still returns before the tick proceeds. The measured duration
//! decides whether its result is trusted.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::action_space::{ActionId, NOOP_ACTION};
use crate::snapshot::Snapshot;

/// An opaque decision function: snapshot in, action id out.
///
/// This is the only contract the environment has with agent code; how a
/// policy was resolved or configured is a loader concern.
pub trait Policy {
    /// Pick an action for the current snapshot.
    fn act(&mut self, snapshot: &Snapshot) -> ActionId;
}

impl<F: FnMut(&Snapshot) -> ActionId> Policy for F {
    fn act(&mut self, snapshot: &Snapshot) -> ActionId {
        self(snapshot)
    }
}

impl std::fmt::Debug for dyn Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Policy")
    }
}

struct Entry {
    /// Index into the roster (0-based slot order).
    index: usize,
    policy: Box<dyn Policy>,
}

/// Collects one resolved action per roster slot under a per-agent deadline.
pub struct DeadlineActionLoop {
    entries: Vec<Entry>,
    roster_len: usize,
    deadline: Duration,
    space_size: usize,
}

impl DeadlineActionLoop {
    /// A loop over a roster of `roster_len` slots with the given per-agent
    /// deadline, validating ids against an action table of `space_size`.
    pub fn new(roster_len: usize, deadline: Duration, space_size: usize) -> Self {
        DeadlineActionLoop {
            entries: Vec::new(),
            roster_len,
            deadline,
            space_size,
        }
    }

    /// Register a policy for the slot at `index` (0-based roster order).
    ///
    /// Slots without a policy (humans, CPUs) resolve to the no-op action.
    pub fn register(&mut self, index: usize, policy: Box<dyn Policy>) {
        debug_assert!(index < self.roster_len);
        self.entries.push(Entry { index, policy });
        // fixed invocation order, regardless of registration order
        self.entries.sort_by_key(|e| e.index);
    }

    /// Collect one action per roster slot for this tick.
    ///
    /// Policies are invoked in slot order. Overruns and out-of-range ids are
    /// substituted with [`NOOP_ACTION`] and logged; the returned vector always
    /// has exactly one entry per roster slot and is meant to be passed
    /// atomically to the environment's `step`.
    pub fn collect(&mut self, snapshot: &Snapshot) -> Vec<ActionId> {
        let mut actions = vec![NOOP_ACTION; self.roster_len];

        for entry in &mut self.entries {
            let started = Instant::now();
            let action = entry.policy.act(snapshot);
            let elapsed = started.elapsed();

            let resolved = if elapsed > self.deadline {
                warn!(
                    slot = entry.index + 1,
                    ?elapsed,
                    deadline = ?self.deadline,
                    "action deadline exceeded, substituting no-op"
                );
                NOOP_ACTION
            } else if action >= self.space_size {
                warn!(
                    slot = entry.index + 1,
                    action,
                    size = self.space_size,
                    "action id out of range, substituting no-op"
                );
                NOOP_ACTION
            } else {
                action
            };
            actions[entry.index] = resolved;
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MenuPhase, Snapshot};
    use std::thread;

    fn snapshot() -> Snapshot {
        Snapshot {
            phase: MenuPhase::InGame,
            entities: vec![],
        }
    }

    #[test]
    fn fast_policies_keep_their_actions() {
        let mut action_loop = DeadlineActionLoop::new(2, Duration::from_secs(1), 45);
        action_loop.register(0, Box::new(|_: &Snapshot| 7));
        action_loop.register(1, Box::new(|_: &Snapshot| 13));
        assert_eq!(action_loop.collect(&snapshot()), vec![7, 13]);
    }

    #[test]
    fn slow_policy_is_substituted_without_touching_others() {
        let mut action_loop = DeadlineActionLoop::new(2, Duration::from_millis(5), 45);
        action_loop.register(
            0,
            Box::new(|_: &Snapshot| {
                thread::sleep(Duration::from_millis(30));
                7
            }),
        );
        action_loop.register(1, Box::new(|_: &Snapshot| 13));
        assert_eq!(action_loop.collect(&snapshot()), vec![NOOP_ACTION, 13]);
    }

    #[test]
    fn out_of_range_action_is_substituted() {
        let mut action_loop = DeadlineActionLoop::new(1, Duration::from_secs(1), 45);
        action_loop.register(0, Box::new(|_: &Snapshot| 45));
        assert_eq!(action_loop.collect(&snapshot()), vec![NOOP_ACTION]);
    }

    #[test]
    fn unregistered_slots_resolve_to_noop() {
        let mut action_loop = DeadlineActionLoop::new(3, Duration::from_secs(1), 45);
        action_loop.register(1, Box::new(|_: &Snapshot| 4));
        assert_eq!(
            action_loop.collect(&snapshot()),
            vec![NOOP_ACTION, 4, NOOP_ACTION]
        );
    }

    #[test]
    fn invocation_follows_slot_order_not_registration_order() {
        use std::sync::{Arc, Mutex};
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut action_loop = DeadlineActionLoop::new(2, Duration::from_secs(1), 45);

        let o = order.clone();
        action_loop.register(
            1,
            Box::new(move |_: &Snapshot| {
                o.lock().unwrap().push(1);
                0
            }),
        );
        let o = order.clone();
        action_loop.register(
            0,
            Box::new(move |_: &Snapshot| {
                o.lock().unwrap().push(0);
                0
            }),
        );

        action_loop.collect(&snapshot());
        assert_eq!(*order.lock().unwrap(), vec![0, 1]);
    }
}
