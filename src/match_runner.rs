//! The outer match loop: reset, warm up, tick until done, report a winner.

use anyhow::Context;
use tracing::{info, instrument};

use crate::action_loop::DeadlineActionLoop;
use crate::action_space::NOOP_ACTION;
use crate::configuration::Configuration;
use crate::driver::ProcessDriver;
use crate::env::MatchEnv;
use crate::slot::Stage;
use crate::snapshot::Snapshot;

/// Per-match parameters for [`run_match`].
#[derive(Debug, Clone, Copy)]
pub struct MatchSettings {
    /// Stage to select during reset.
    pub stage: Stage,
    /// Pre-match countdown ticks stepped with no-ops before policies act.
    pub warmup_ticks: usize,
    /// Decision-tick budget; the match is cut off when it runs out.
    pub max_ticks: usize,
}

impl MatchSettings {
    /// Settings for a stage, taking tick counts from a [`Configuration`].
    pub fn from_config(stage: Stage, config: &Configuration) -> Self {
        MatchSettings {
            stage,
            warmup_ticks: config.warmup_ticks,
            max_ticks: config.max_ticks,
        }
    }
}

/// What decided the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decider {
    /// More stocks remaining.
    Stocks,
    /// Equal stocks, less accumulated damage.
    Percent,
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// One slot came out ahead.
    Winner {
        /// 1-based slot number of the winner.
        slot: u8,
        /// Which comparison decided it.
        decided_by: Decider,
    },
    /// Identical stocks and percents.
    Draw,
}

/// Summary of one finished match.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Decision ticks consumed (warm-up excluded).
    pub ticks: usize,
    /// True when the match ended by the game rule rather than the budget.
    pub ended_by_rule: bool,
    /// Winner determination over the final snapshot.
    pub outcome: MatchOutcome,
    /// The snapshot the outcome was judged on.
    pub final_snapshot: Snapshot,
}

/// Run one match to completion.
///
/// Resets the environment onto the requested stage, steps through the
/// pre-match countdown with no-ops, then ticks the deadline loop against the
/// environment until the reward model reports done or the budget runs out.
/// The caller keeps ownership of the environment and decides when to
/// `close()` it, including on error paths.
#[instrument(skip_all, fields(stage = ?settings.stage))]
pub fn run_match<D: ProcessDriver>(
    env: &mut MatchEnv<D>,
    action_loop: &mut DeadlineActionLoop,
    settings: &MatchSettings,
) -> anyhow::Result<MatchReport> {
    let (mut snapshot, _) = env.reset(settings.stage).context("reset failed")?;

    let noops = vec![NOOP_ACTION; env.slots().len()];
    for _ in 0..settings.warmup_ticks {
        snapshot = env.step(&noops).context("warm-up step failed")?;
    }

    let mut ticks = 0;
    let mut ended_by_rule = false;
    while ticks < settings.max_ticks {
        let actions = action_loop.collect(&snapshot);
        snapshot = env.step(&actions).context("match step failed")?;
        ticks += 1;

        let sample = env.evaluate(&snapshot);
        if sample.done {
            ended_by_rule = true;
            break;
        }
    }

    if ended_by_rule {
        info!(ticks, "match ended by the game rule");
    } else {
        info!(ticks, "match ended by the tick budget");
    }

    let outcome = judge(&snapshot);
    info!(?outcome);
    if env.config().verbose() {
        println!("match over after {ticks} ticks: {outcome:?}");
    }

    Ok(MatchReport {
        ticks,
        ended_by_rule,
        outcome,
        final_snapshot: snapshot,
    })
}

/// Winner determination: most stocks, then least percent, else a draw.
fn judge(snapshot: &Snapshot) -> MatchOutcome {
    let Some((best_index, best)) = snapshot
        .entities
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.stock
                .cmp(&b.stock)
                .then(b.percent.total_cmp(&a.percent))
        })
    else {
        return MatchOutcome::Draw;
    };

    let tied = snapshot
        .entities
        .iter()
        .enumerate()
        .any(|(i, e)| i != best_index && e.stock == best.stock && e.percent == best.percent);
    if tied {
        return MatchOutcome::Draw;
    }

    let decided_by = if snapshot
        .entities
        .iter()
        .enumerate()
        .any(|(i, e)| i != best_index && e.stock == best.stock)
    {
        Decider::Percent
    } else {
        Decider::Stocks
    };

    MatchOutcome::Winner {
        slot: best_index as u8 + 1,
        decided_by,
    }
}
