//! Controller wire protocol: buttons, sticks, shoulders, and the
//! [`ControllerFrame`] value applied to a [`ControllerChannel`].
//!
//! A frame is a full description of one controller input state. Applying it
//! always starts with `release_all`, then sets exactly the fields the frame
//! carries. The shoulder triggers have two mutually exclusive representations
//! on the wire: a digital full press or an analog value in `[0, 1]`. A frame
//! with the digital flag set presses the button; otherwise the analog value is
//! sent, even when it is zero.

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Digital controller buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    /// Primary attack.
    A,
    /// Special.
    B,
    /// Jump.
    X,
    /// Jump (alternate).
    Y,
    /// Grab.
    Z,
    /// Left shoulder, digital full press.
    L,
    /// Right shoulder, digital full press.
    R,
    /// Start/pause. Only used for menu navigation, never part of a frame.
    Start,
}

/// The two analog sticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stick {
    /// Main control stick.
    Main,
    /// C-stick.
    C,
}

/// Shoulder trigger sides for analog presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shoulder {
    /// Left trigger.
    Left,
    /// Right trigger.
    Right,
}

/// One controller input state, as produced by the action table.
///
/// Value type with no identity: two frames with equal fields are the same
/// input. Stick axes are in `[-1, 1]`, analog shoulders in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerFrame {
    /// A held.
    pub button_a: bool,
    /// B held.
    pub button_b: bool,
    /// X held.
    pub button_x: bool,
    /// Y held.
    pub button_y: bool,
    /// Z held.
    pub button_z: bool,
    /// Left shoulder as a digital full press.
    pub digital_l: bool,
    /// Right shoulder as a digital full press.
    pub digital_r: bool,
    /// Main stick position.
    pub main_stick: (f32, f32),
    /// C-stick position.
    pub c_stick: (f32, f32),
    /// Left shoulder analog value, ignored when `digital_l` is set.
    pub analog_l: f32,
    /// Right shoulder analog value, ignored when `digital_r` is set.
    pub analog_r: f32,
}

impl ControllerFrame {
    /// The neutral frame: nothing held, sticks centered, triggers released.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Apply this frame to a controller channel.
    ///
    /// Releases all prior inputs first, then issues exactly the presses and
    /// tilts this frame carries. Digital shoulder flags press the button;
    /// otherwise the analog value is sent.
    pub fn apply(&self, controller: &mut dyn ControllerChannel) {
        controller.release_all();

        for (held, button) in [
            (self.button_a, Button::A),
            (self.button_b, Button::B),
            (self.button_x, Button::X),
            (self.button_y, Button::Y),
            (self.button_z, Button::Z),
        ] {
            if held {
                controller.press(button);
            }
        }

        controller.tilt_stick(Stick::Main, self.main_stick.0, self.main_stick.1);
        controller.tilt_stick(Stick::C, self.c_stick.0, self.c_stick.1);

        if self.digital_l {
            controller.press(Button::L);
        } else {
            controller.press_shoulder(Shoulder::Left, self.analog_l);
        }
        if self.digital_r {
            controller.press(Button::R);
        } else {
            controller.press_shoulder(Shoulder::Right, self.analog_r);
        }
    }
}

/// One virtual controller port on the external simulation.
///
/// Exclusively owned, one per agent slot. The environment is the only caller;
/// implementations translate these calls onto whatever local channel the
/// simulation process exposes.
pub trait ControllerChannel {
    /// Attach the controller to the running simulation.
    fn connect(&mut self) -> Result<(), EnvError>;

    /// Detach the controller. Must be safe to call more than once.
    fn disconnect(&mut self);

    /// Release every held button, center both sticks, release both triggers.
    fn release_all(&mut self);

    /// Hold a digital button.
    fn press(&mut self, button: Button);

    /// Tilt a stick to `(x, y)`, each axis in `[-1, 1]`.
    fn tilt_stick(&mut self, stick: Stick, x: f32, y: f32);

    /// Press a shoulder trigger to an analog value in `[0, 1]`.
    fn press_shoulder(&mut self, side: Shoulder, value: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        ReleaseAll,
        Press(Button),
        Tilt(Stick, f32, f32),
        Trigger(Shoulder, f32),
    }

    #[derive(Default)]
    struct RecordingChannel {
        calls: Vec<Call>,
    }

    impl ControllerChannel for RecordingChannel {
        fn connect(&mut self) -> Result<(), EnvError> {
            Ok(())
        }
        fn disconnect(&mut self) {}
        fn release_all(&mut self) {
            self.calls.push(Call::ReleaseAll);
        }
        fn press(&mut self, button: Button) {
            self.calls.push(Call::Press(button));
        }
        fn tilt_stick(&mut self, stick: Stick, x: f32, y: f32) {
            self.calls.push(Call::Tilt(stick, x, y));
        }
        fn press_shoulder(&mut self, side: Shoulder, value: f32) {
            self.calls.push(Call::Trigger(side, value));
        }
    }

    #[test]
    fn neutral_frame_releases_then_centers() {
        let mut channel = RecordingChannel::default();
        ControllerFrame::neutral().apply(&mut channel);
        assert_eq!(
            channel.calls,
            vec![
                Call::ReleaseAll,
                Call::Tilt(Stick::Main, 0.0, 0.0),
                Call::Tilt(Stick::C, 0.0, 0.0),
                Call::Trigger(Shoulder::Left, 0.0),
                Call::Trigger(Shoulder::Right, 0.0),
            ]
        );
    }

    #[test]
    fn digital_shoulder_suppresses_analog() {
        let frame = ControllerFrame {
            digital_r: true,
            analog_r: 0.5, // must not reach the wire
            ..ControllerFrame::neutral()
        };
        let mut channel = RecordingChannel::default();
        frame.apply(&mut channel);

        assert!(channel.calls.contains(&Call::Press(Button::R)));
        assert!(!channel
            .calls
            .iter()
            .any(|c| matches!(c, Call::Trigger(Shoulder::Right, _))));
        // left side stays analog
        assert!(channel.calls.contains(&Call::Trigger(Shoulder::Left, 0.0)));
    }

    #[test]
    fn release_all_always_comes_first() {
        let frame = ControllerFrame {
            button_a: true,
            button_z: true,
            main_stick: (1.0, 0.0),
            ..ControllerFrame::neutral()
        };
        let mut channel = RecordingChannel::default();
        frame.apply(&mut channel);
        assert_eq!(channel.calls[0], Call::ReleaseAll);
        assert_eq!(
            channel.calls.iter().filter(|c| **c == Call::ReleaseAll).count(),
            1
        );
        assert!(channel.calls.contains(&Call::Press(Button::A)));
        assert!(channel.calls.contains(&Call::Press(Button::Z)));
    }
}
