//! Agent slots and the fixed match roster.
//!
//! A slot binds a 1-based controller port to a role, a declared character and
//! an exclusively owned controller channel. The roster is an explicit ordered
//! sequence fixed at match setup; the environment never infers slot order from
//! anything else. Roles are immutable for the duration of a match.

use serde::{Deserialize, Serialize};

use crate::controller::ControllerChannel;

/// Who drives a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A person on a physical controller.
    Human,
    /// An external policy driven through the action loop.
    Ai,
    /// A simulation-internal opponent; the environment never sends it input.
    Cpu,
    /// Unplugged port.
    Empty,
}

/// Selectable fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Character {
    Mario,
    Fox,
    CaptainFalcon,
    DonkeyKong,
    Kirby,
    Bowser,
    Link,
    Sheik,
    Ness,
    Peach,
    Popo,
    Pikachu,
    Samus,
    Yoshi,
    Jigglypuff,
    Mewtwo,
    Luigi,
    Marth,
    Zelda,
    YoungLink,
    DrMario,
    Falco,
    Pichu,
    GameAndWatch,
    Ganondorf,
    Roy,
}

/// Selectable stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Stage {
    FinalDestination,
    Battlefield,
    PokemonStadium,
    Dreamland,
    FountainOfDreams,
    YoshisStory,
}

/// One controller port of the match roster.
pub struct AgentSlot {
    /// 1-based slot number.
    pub slot: u8,
    /// Immutable for the match.
    pub role: Role,
    /// Declared character; `None` for empty slots and humans who pick live.
    pub character: Option<Character>,
    /// Difficulty level in `1..=9`; only meaningful for CPU slots.
    pub cpu_level: Option<u8>,
    /// Exclusively owned controller channel; `None` for empty slots.
    pub controller: Option<Box<dyn ControllerChannel>>,
    /// Whether this slot is authorized to press start on shared menus.
    pub press_start: bool,
    /// Set once the slot runs out of stocks.
    pub defeated: bool,
}

impl std::fmt::Debug for AgentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSlot")
            .field("slot", &self.slot)
            .field("role", &self.role)
            .field("character", &self.character)
            .field("cpu_level", &self.cpu_level)
            .field("press_start", &self.press_start)
            .field("defeated", &self.defeated)
            .finish_non_exhaustive()
    }
}

impl AgentSlot {
    /// A policy-driven slot.
    pub fn ai(slot: u8, character: Character, controller: Box<dyn ControllerChannel>) -> Self {
        AgentSlot {
            slot,
            role: Role::Ai,
            character: Some(character),
            cpu_level: None,
            controller: Some(controller),
            press_start: false,
            defeated: false,
        }
    }

    /// A simulation-internal opponent at the given difficulty level.
    pub fn cpu(
        slot: u8,
        character: Character,
        level: u8,
        controller: Box<dyn ControllerChannel>,
    ) -> Self {
        AgentSlot {
            slot,
            role: Role::Cpu,
            character: Some(character),
            cpu_level: Some(level),
            controller: Some(controller),
            press_start: false,
            defeated: false,
        }
    }

    /// A human on a physical adapter channel.
    pub fn human(slot: u8, controller: Box<dyn ControllerChannel>) -> Self {
        AgentSlot {
            slot,
            role: Role::Human,
            character: None,
            cpu_level: None,
            controller: Some(controller),
            press_start: false,
            defeated: false,
        }
    }

    /// An unplugged port.
    pub fn empty(slot: u8) -> Self {
        AgentSlot {
            slot,
            role: Role::Empty,
            character: None,
            cpu_level: None,
            controller: None,
            press_start: false,
            defeated: false,
        }
    }
}
