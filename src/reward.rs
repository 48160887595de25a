//! Reward and termination signal derived from consecutive snapshots.
//!
//! [`RewardModel`] keeps exactly one piece of state: the previous snapshot.
//! Each call to [`evaluate`](RewardModel::evaluate) compares the new snapshot
//! against it, producing a zero-sum scalar reward for the two primary slots
//! and a last-agent-standing done flag, then retains the new snapshot for the
//! next delta. A reset clears the retained snapshot; without that, the first
//! delta of a new match would be computed against the tail of the old one.
//!
//! The external process is not always self-consistent across respawn
//! transitions, so anomalies (negative damage deltas, multi-stock drops in a
//! single tick) are clamped here rather than raised.

use tracing::trace;

use crate::snapshot::Snapshot;

/// Damage-delta weight.
pub const W_DMG: f32 = 0.1;
/// Shield-delta weight.
pub const W_SHIELD: f32 = 0.3;
/// Stock-loss weight.
pub const W_STOCK: f32 = 8.0;

/// Damage ceiling used to dampen stock-loss weight near high percents.
///
/// Tunable constant, not a structural invariant: the `abs(200 - pct)/200`
/// scaling and the spurious double-stock-loss clamp are empirically tuned.
pub const STOCK_PERCENT_REFERENCE: f32 = 200.0;

/// Per-tick reward and termination signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardSample {
    /// Zero-sum rewards for slots 1 and 2.
    pub rewards: (f32, f32),
    /// True when at most one agent still has stocks left.
    pub done: bool,
}

/// Stateful reward model over a stream of snapshots.
#[derive(Debug, Default)]
pub struct RewardModel {
    previous: Option<Snapshot>,
}

impl RewardModel {
    /// A model with no retained snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the retained snapshot.
    ///
    /// Must be called between matches so no cross-match delta is computed.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Compute reward and done for the given snapshot, then retain it.
    ///
    /// The first call after construction or [`reset`](Self::reset) yields a
    /// zero reward: there is nothing to delta against.
    pub fn evaluate(&mut self, snapshot: &Snapshot) -> RewardSample {
        let rewards = match &self.previous {
            Some(previous) if previous.entities.len() >= 2 && snapshot.entities.len() >= 2 => {
                let loss_1 = Self::loss(previous, snapshot, 0);
                let loss_2 = Self::loss(previous, snapshot, 1);
                (loss_2 - loss_1, loss_1 - loss_2)
            }
            _ => (0.0, 0.0),
        };

        let done = Self::at_most_one_standing(snapshot);
        trace!(?rewards, done);

        self.previous = Some(snapshot.clone());
        RewardSample { rewards, done }
    }

    /// Weighted loss suffered by the entity at `index` between two snapshots.
    fn loss(previous: &Snapshot, current: &Snapshot, index: usize) -> f32 {
        let prev = &previous.entities[index];
        let now = &current.entities[index];

        let damage_delta = (now.percent - prev.percent).max(0.0);

        // `+ 1` keeps the denominator away from zero and dampens the signal
        // as the shield runs out.
        let shield_delta = ((prev.shield - now.shield) / (now.shield + 1.0)).max(0.0);

        // Integer stock delta, floored at zero. A drop of more than one stock
        // in a single tick is a respawn-transition misreport, not a real
        // double KO, and counts as zero.
        let raw_loss = (prev.stock as i64 - now.stock as i64).max(0);
        let stock_loss = if raw_loss > 1 {
            trace!(slot = index + 1, raw_loss, "spurious multi-stock drop");
            0.0
        } else {
            raw_loss as f32
                * (STOCK_PERCENT_REFERENCE - now.percent).abs()
                / STOCK_PERCENT_REFERENCE
        };

        W_DMG * damage_delta + W_SHIELD * shield_delta + W_STOCK * stock_loss
    }

    /// True when every agent but the leader is out of stocks.
    fn at_most_one_standing(snapshot: &Snapshot) -> bool {
        let mut stocks: Vec<u32> = snapshot.entities.iter().map(|e| e.stock).collect();
        stocks.sort_unstable_by(|a, b| b.cmp(a));
        stocks.iter().skip(1).sum::<u32>() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{EntityState, MenuPhase};

    fn snapshot(entries: &[(u32, f32, f32)]) -> Snapshot {
        Snapshot {
            phase: MenuPhase::InGame,
            entities: entries
                .iter()
                .map(|&(stock, percent, shield)| EntityState {
                    stock,
                    percent,
                    shield,
                    ..EntityState::default()
                })
                .collect(),
        }
    }

    #[test]
    fn first_evaluation_is_zero() {
        let mut model = RewardModel::new();
        let sample = model.evaluate(&snapshot(&[(4, 0.0, 60.0), (4, 0.0, 60.0)]));
        assert_eq!(sample.rewards, (0.0, 0.0));
        assert!(!sample.done);
    }

    #[test]
    fn reset_clears_the_retained_snapshot() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(4, 0.0, 60.0), (4, 0.0, 60.0)]));
        model.reset();
        // Would be a large cross-match delta without the reset.
        let sample = model.evaluate(&snapshot(&[(3, 120.0, 10.0), (4, 90.0, 55.0)]));
        assert_eq!(sample.rewards, (0.0, 0.0));
    }

    #[test]
    fn identical_snapshots_yield_zero_and_not_done() {
        let mut model = RewardModel::new();
        let snap = snapshot(&[(4, 40.0, 50.0), (4, 25.0, 60.0)]);
        model.evaluate(&snap);
        let sample = model.evaluate(&snap);
        assert_eq!(sample.rewards, (0.0, 0.0));
        assert!(!sample.done);
    }

    #[test]
    fn stock_loss_is_negative_for_the_loser() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(4, 0.0, 60.0), (4, 0.0, 60.0)]));
        let sample = model.evaluate(&snapshot(&[(3, 0.0, 60.0), (4, 50.0, 60.0)]));
        assert!(sample.rewards.0 < 0.0, "p1 lost a stock: {:?}", sample);
        assert!(sample.rewards.1 > 0.0);
        assert!(!sample.done);
    }

    #[test]
    fn rewards_are_zero_sum() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(4, 10.0, 60.0), (4, 20.0, 55.0)]));
        let sample = model.evaluate(&snapshot(&[(4, 35.0, 48.0), (3, 28.0, 60.0)]));
        assert!((sample.rewards.0 + sample.rewards.1).abs() < 1e-6);
    }

    #[test]
    fn damage_heal_does_not_reward_the_healer() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(4, 80.0, 60.0), (4, 0.0, 60.0)]));
        // p1's percent drops (heal); clamped to zero, so no signal either way
        let sample = model.evaluate(&snapshot(&[(4, 30.0, 60.0), (4, 0.0, 60.0)]));
        assert_eq!(sample.rewards, (0.0, 0.0));
    }

    #[test]
    fn multi_stock_drop_counts_as_zero() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(4, 0.0, 60.0), (4, 0.0, 60.0)]));
        let sample = model.evaluate(&snapshot(&[(2, 0.0, 60.0), (4, 0.0, 60.0)]));
        assert_eq!(sample.rewards, (0.0, 0.0));
    }

    #[test]
    fn stock_loss_weight_shrinks_near_the_damage_ceiling() {
        let mut low = RewardModel::new();
        low.evaluate(&snapshot(&[(4, 0.0, 60.0), (4, 0.0, 60.0)]));
        let at_low = low.evaluate(&snapshot(&[(3, 0.0, 60.0), (4, 0.0, 60.0)]));

        let mut high = RewardModel::new();
        high.evaluate(&snapshot(&[(4, 190.0, 60.0), (4, 0.0, 60.0)]));
        let at_high = high.evaluate(&snapshot(&[(3, 190.0, 60.0), (4, 0.0, 60.0)]));

        assert!(at_low.rewards.0 < at_high.rewards.0);
    }

    #[test]
    fn done_when_one_side_is_out_of_stocks() {
        let mut model = RewardModel::new();
        model.evaluate(&snapshot(&[(1, 150.0, 60.0), (2, 80.0, 60.0)]));
        let sample = model.evaluate(&snapshot(&[(0, 150.0, 60.0), (2, 80.0, 60.0)]));
        assert!(sample.done);
    }

    #[test]
    fn done_generalizes_beyond_two_agents() {
        // two agents still standing -> not done
        let alive = snapshot(&[(1, 0.0, 60.0), (0, 0.0, 60.0), (2, 0.0, 60.0)]);
        assert!(!RewardModel::at_most_one_standing(&alive));
        // only one left -> done
        let last = snapshot(&[(0, 0.0, 60.0), (0, 0.0, 60.0), (2, 0.0, 60.0)]);
        assert!(RewardModel::at_most_one_standing(&last));
    }
}
