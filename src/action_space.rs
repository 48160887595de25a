//! The reduced discrete action table and its encoder.
//!
//! A stock controller has billions of reachable input states; driving a policy
//! over that space is hopeless. The table here reduces it to the product of a
//! small set of main-stick positions and a small set of single-button states.
//! The reference layout is 9 stick positions (center plus the 8 compass
//! directions, diagonals at magnitude √2/2) times 5 button states (none, A, B,
//! Z, R) for 45 actions. Every major in-game function is reachable with these.
//!
//! The table is built once at startup. Rows are grouped by button, 9 stick
//! rows per group, so `id = button_index * sticks + stick_index`. Action id 0
//! is always the neutral no-op frame; the match loop relies on that when it
//! substitutes for a late or misbehaving policy.

use rand::Rng;

use crate::controller::ControllerFrame;
use crate::error::EnvError;

/// Index into the precomputed controller-frame table.
pub type ActionId = usize;

/// The designated safe no-op action: centered stick, no button.
pub const NOOP_ACTION: ActionId = 0;

/// Button choices available to the reduced action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonChoice {
    /// No button held.
    None,
    /// Attack.
    A,
    /// Special.
    B,
    /// Grab.
    Z,
    /// Shield (digital right shoulder).
    R,
}

/// √2/2, the diagonal unit-circle coordinate.
const MID: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Center plus the 8 compass directions, clockwise from up.
const STICK_POSITIONS: [(f32, f32); 9] = [
    (0.0, 0.0), // no-op
    (0.0, 1.0),
    (MID, MID),
    (1.0, 0.0),
    (MID, -MID),
    (0.0, -1.0),
    (-MID, -MID),
    (-1.0, 0.0),
    (-MID, MID),
];

const BUTTON_CHOICES: [ButtonChoice; 5] = [
    ButtonChoice::None,
    ButtonChoice::A,
    ButtonChoice::B,
    ButtonChoice::Z,
    ButtonChoice::R,
];

/// Fixed table of legal controller frames, indexed by [`ActionId`].
#[derive(Debug, Clone)]
pub struct ActionSpace {
    table: Vec<ControllerFrame>,
}

impl ActionSpace {
    /// Build the reference 9 × 5 = 45 action table.
    pub fn new() -> Self {
        Self::with_layout(&STICK_POSITIONS, &BUTTON_CHOICES)
    }

    /// Build a table from explicit stick positions and button choices.
    ///
    /// Row `button_index * sticks.len() + stick_index` holds the frame for
    /// that combination. The first stick position should be the center and the
    /// first button choice `None`, so that action id 0 is the no-op.
    pub fn with_layout(sticks: &[(f32, f32)], buttons: &[ButtonChoice]) -> Self {
        let mut table = Vec::with_capacity(sticks.len() * buttons.len());
        for &button in buttons {
            for &stick in sticks {
                table.push(Self::frame_for(stick, button));
            }
        }
        ActionSpace { table }
    }

    fn frame_for((x, y): (f32, f32), button: ButtonChoice) -> ControllerFrame {
        let mut frame = ControllerFrame::neutral();
        frame.main_stick = (x, y);
        match button {
            ButtonChoice::None => {}
            ButtonChoice::A => frame.button_a = true,
            ButtonChoice::B => frame.button_b = true,
            ButtonChoice::Z => frame.button_z = true,
            ButtonChoice::R => frame.digital_r = true,
        }
        frame
    }

    /// Number of legal actions.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// True if `id` indexes a row of the table.
    pub fn contains(&self, id: ActionId) -> bool {
        id < self.table.len()
    }

    /// Look up the controller frame for an action id.
    ///
    /// Pure and deterministic: the same id always yields the identical frame.
    ///
    /// # Errors
    /// [`EnvError::ActionOutOfRange`] when `id >= size()`.
    pub fn encode(&self, id: ActionId) -> Result<ControllerFrame, EnvError> {
        self.table
            .get(id)
            .copied()
            .ok_or(EnvError::ActionOutOfRange {
                id,
                size: self.table.len(),
            })
    }

    /// Draw a uniformly random valid action id from the caller's RNG.
    ///
    /// Reproducibility is the caller's concern: pass a seeded RNG to get a
    /// deterministic sequence.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionId {
        rng.gen_range(0..self.table.len())
    }
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn reference_table_has_45_rows() {
        let space = ActionSpace::new();
        assert_eq!(space.size(), 45);
    }

    #[test]
    fn action_zero_is_neutral() {
        let space = ActionSpace::new();
        assert_eq!(
            space.encode(NOOP_ACTION).unwrap(),
            ControllerFrame::neutral()
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let space = ActionSpace::new();
        for id in 0..space.size() {
            assert_eq!(space.encode(id).unwrap(), space.encode(id).unwrap());
        }
    }

    #[test]
    fn encode_rejects_out_of_range() {
        let space = ActionSpace::new();
        let err = space.encode(space.size()).unwrap_err();
        assert!(matches!(
            err,
            EnvError::ActionOutOfRange { id: 45, size: 45 }
        ));
    }

    #[test]
    fn rows_follow_button_times_stick_layout() {
        let space = ActionSpace::new();
        // id 9..18 is the A group, same stick sweep as 0..9
        for stick in 0..9 {
            let plain = space.encode(stick).unwrap();
            let with_a = space.encode(9 + stick).unwrap();
            assert_eq!(plain.main_stick, with_a.main_stick);
            assert!(!plain.button_a);
            assert!(with_a.button_a);
        }
        // last group is the digital shield
        let shield = space.encode(36).unwrap();
        assert!(shield.digital_r);
        assert!(!shield.button_a && !shield.button_b && !shield.button_z);
    }

    #[test]
    fn diagonals_sit_on_the_unit_circle() {
        let space = ActionSpace::new();
        for id in 1..9 {
            let (x, y) = space.encode(id).unwrap().main_stick;
            let norm = (x * x + y * y).sqrt();
            assert!((norm - 1.0).abs() < 1e-6, "id {id} has norm {norm}");
        }
    }

    #[test]
    fn sample_stays_in_range_and_is_seedable() {
        let space = ActionSpace::new();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let id = space.sample(&mut a);
            assert!(space.contains(id));
            assert_eq!(id, space.sample(&mut b));
        }
    }

    #[test]
    fn custom_layout_is_honored() {
        let space = ActionSpace::with_layout(
            &[(0.0, 0.0), (0.0, 1.0)],
            &[ButtonChoice::None, ButtonChoice::B],
        );
        assert_eq!(space.size(), 4);
        assert!(space.encode(3).unwrap().button_b);
        assert_eq!(space.encode(3).unwrap().main_stick, (0.0, 1.0));
    }
}
