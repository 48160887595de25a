//! Per-tick menu navigation.
//!
//! Menu screens are driven the same way the match is: one controller input
//! per simulation frame. Each helper here emits the input for exactly one
//! tick and is called again on the next poll until the process reports the
//! next phase. Button presses are pulsed on even ticks (with a release on odd
//! ticks) so consecutive presses register as distinct.
//!
//! During select screens the slot's entity position carries its menu cursor,
//! so navigation is plain cursor steering toward a fixed coordinate table,
//! then confirm / costume / difficulty / start presses tracked by
//! [`SelectProgress`].

use tracing::trace;

use crate::controller::{Button, ControllerChannel, Stick};
use crate::slot::{Character, Stage};

/// Cursor distance under which a target counts as reached.
const DEADZONE: f32 = 1.5;

/// Character-select grid: 9 columns, left-to-right, top-to-bottom.
const CSS_ORIGIN: (f32, f32) = (-30.4, 11.8);
const CSS_STEP: (f32, f32) = (7.6, -7.6);
const CSS_COLUMNS: usize = 9;

/// Per-slot progress through the character-select screen.
///
/// Local to one `reset`; a new reset starts from scratch.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SelectProgress {
    costume_presses: u8,
    locked: bool,
    level_presses: u8,
}

/// Cursor target for a character portrait.
fn character_target(character: Character) -> (f32, f32) {
    let ordinal = character as usize;
    let col = (ordinal % CSS_COLUMNS) as f32;
    let row = (ordinal / CSS_COLUMNS) as f32;
    (
        CSS_ORIGIN.0 + col * CSS_STEP.0,
        CSS_ORIGIN.1 + row * CSS_STEP.1,
    )
}

/// Cursor target for a stage tile.
fn stage_target(stage: Stage) -> (f32, f32) {
    match stage {
        Stage::Battlefield => (-15.5, 1.0),
        Stage::FinalDestination => (-7.7, 1.0),
        Stage::PokemonStadium => (0.0, 1.0),
        Stage::Dreamland => (-11.6, -8.6),
        Stage::FountainOfDreams => (-3.9, -8.6),
        Stage::YoshisStory => (3.9, -8.6),
    }
}

/// Steer the cursor one tick toward `target`; true once within the deadzone.
fn steer(cursor: (f32, f32), target: (f32, f32), controller: &mut dyn ControllerChannel) -> bool {
    let dx = target.0 - cursor.0;
    let dy = target.1 - cursor.1;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= DEADZONE {
        return true;
    }
    controller.release_all();
    controller.tilt_stick(Stick::Main, dx / distance, dy / distance);
    false
}

/// One tick of character selection for an AI or CPU slot.
///
/// Steers to the declared character, cycles the costume `costume` times,
/// locks in with A, sets the CPU difficulty when `cpu_level` is given, and
/// finally presses start when this slot is the authorized menu controller.
#[allow(clippy::too_many_arguments)]
pub(crate) fn choose_character(
    character: Character,
    cursor: (f32, f32),
    costume: u8,
    cpu_level: Option<u8>,
    press_start: bool,
    tick: usize,
    progress: &mut SelectProgress,
    controller: &mut dyn ControllerChannel,
) {
    if tick % 2 == 1 {
        controller.release_all();
        return;
    }

    if !progress.locked {
        if !steer(cursor, character_target(character), controller) {
            return;
        }
        if progress.costume_presses < costume {
            controller.release_all();
            controller.press(Button::X);
            progress.costume_presses += 1;
            return;
        }
        trace!(?character, costume, "locking character");
        controller.release_all();
        controller.press(Button::A);
        progress.locked = true;
        return;
    }

    if let Some(level) = cpu_level {
        if progress.level_presses < level {
            // one notch of the difficulty slider per pulse
            controller.release_all();
            controller.tilt_stick(Stick::Main, 0.0, -1.0);
            controller.press(Button::A);
            progress.level_presses += 1;
            return;
        }
    }

    if press_start {
        controller.release_all();
        controller.press(Button::Start);
    } else {
        controller.release_all();
    }
}

/// One tick of stage selection for the menu-controlling slot.
pub(crate) fn choose_stage(
    stage: Stage,
    cursor: (f32, f32),
    tick: usize,
    controller: &mut dyn ControllerChannel,
) {
    if tick % 2 == 1 {
        controller.release_all();
        return;
    }
    if steer(cursor, stage_target(stage), controller) {
        trace!(?stage, "confirming stage");
        controller.release_all();
        controller.press(Button::A);
    }
}

/// One tick of advancing through unrecognized submenus toward versus mode.
pub(crate) fn advance_to_versus(tick: usize, controller: &mut dyn ControllerChannel) {
    controller.release_all();
    if tick % 2 == 0 {
        controller.press(Button::A);
    }
}
