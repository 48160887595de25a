//! One frame's worth of simulation state.
//!
//! A [`Snapshot`] is produced once per simulation step by the process driver
//! and owned by the environment; every other component reads it and nobody
//! mutates it. Each tick supersedes the previous snapshot rather than editing
//! it in place.

use serde::{Deserialize, Serialize};

/// Menu or match phase reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuPhase {
    /// Any versus-mode submenu not otherwise recognized.
    MainMenu,
    /// Character-select screen.
    CharacterSelect,
    /// Stage-select screen.
    StageSelect,
    /// Active match.
    InGame,
    /// Active tie-break match.
    SuddenDeath,
}

impl MenuPhase {
    /// True for the phases in which match data is meaningful.
    pub fn is_active(self) -> bool {
        matches!(self, MenuPhase::InGame | MenuPhase::SuddenDeath)
    }
}

/// Per-slot entity state within a snapshot.
///
/// During menu phases `position` carries the slot's menu cursor instead of a
/// fighter position; the remaining fields are only meaningful in-game.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    /// Remaining lives.
    pub stock: u32,
    /// Accumulated damage percent, `>= 0`.
    pub percent: f32,
    /// Remaining shield strength.
    pub shield: f32,
    /// Position, or menu cursor while in a select screen.
    pub position: (f32, f32),
    /// Simulation-internal id of the current animation/action.
    pub action: i32,
    /// Frame counter within the current action.
    pub action_frame: i32,
    /// Frames of hitstun remaining.
    pub hitstun_frames_left: i32,
}

/// Immutable-per-tick record of simulation state across all agent slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current menu or match phase.
    pub phase: MenuPhase,
    /// Entity state per slot; index 0 is slot 1.
    pub entities: Vec<EntityState>,
}

impl Snapshot {
    /// Entity record for a 1-based slot number, if that slot is populated.
    pub fn entity(&self, slot: u8) -> Option<&EntityState> {
        self.entities.get(slot as usize - 1)
    }
}
