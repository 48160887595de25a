//! The match state machine.
//!
//! [`MatchEnv`] owns the external simulation process (through a
//! [`ProcessDriver`]), the roster of agent slots with their controller
//! channels, the action table and the reward model. It walks the process
//! through menu navigation into an active match (`reset`), advances it one
//! frame per tick while applying controller input (`step`), scores the
//! resulting snapshots (`evaluate`) and tears everything down (`close`).
//!
//! Phase transitions are driven by polling: every `reset` iteration reads one
//! snapshot and dispatches on its menu phase. In character select every AI
//! slot picks its declared character (costume = slot index, so two copies of
//! the same fighter never clash) and CPU slots additionally set a difficulty
//! level; exactly one menu-controlling slot may press start, and only when
//! pre-authorized. In stage select the menu-controlling slot picks the
//! requested stage. Any other submenu is advanced toward versus mode.
//! `reset` returns only from an active phase, never mid-menu.

use tracing::{debug, info, instrument, warn};

use crate::action_space::{ActionId, ActionSpace};
use crate::configuration::Configuration;
use crate::driver::ProcessDriver;
use crate::error::EnvError;
use crate::menu::{self, SelectProgress};
use crate::recorder::ActionRecorder;
use crate::reward::{RewardModel, RewardSample};
use crate::slot::{AgentSlot, Role, Stage};
use crate::snapshot::Snapshot;

/// Drives one match against an external simulated game process.
pub struct MatchEnv<D: ProcessDriver> {
    driver: D,
    slots: Vec<AgentSlot>,
    action_space: ActionSpace,
    reward: RewardModel,
    config: Configuration,
    recorder: Option<Box<dyn ActionRecorder>>,
    snapshot: Option<Snapshot>,
    menu_control: usize,
    closed: bool,
}

impl<D: ProcessDriver> std::fmt::Debug for MatchEnv<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEnv")
            .field("menu_control", &self.menu_control)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<D: ProcessDriver> MatchEnv<D> {
    /// Build an environment over a process driver and a fixed roster.
    ///
    /// The roster order is the slot order for the whole match. The
    /// menu-controlling slot is the last AI or CPU slot; it is authorized to
    /// press start only when the configuration allows AI starts and no human
    /// is present in the roster.
    ///
    /// # Errors
    /// [`EnvError::Configuration`] when the roster is unusable: no AI or CPU
    /// slot to drive the menus, a CPU level outside `1..=9`, or a non-empty
    /// slot without a controller channel.
    #[instrument(skip_all, fields(slots = slots.len()))]
    pub fn new(
        driver: D,
        mut slots: Vec<AgentSlot>,
        config: Configuration,
    ) -> Result<Self, EnvError> {
        if config.log {
            crate::logger::init_logger();
        }

        let mut menu_control = None;
        let mut human_detected = false;

        for (index, slot) in slots.iter().enumerate() {
            match slot.role {
                Role::Human => human_detected = true,
                Role::Ai | Role::Cpu => menu_control = Some(index),
                Role::Empty => continue,
            }
            if slot.controller.is_none() {
                return Err(EnvError::Configuration(format!(
                    "slot {} has no controller channel",
                    slot.slot
                )));
            }
            if slot.role != Role::Human && slot.character.is_none() {
                return Err(EnvError::Configuration(format!(
                    "slot {} has no declared character",
                    slot.slot
                )));
            }
            if slot.role == Role::Cpu && !matches!(slot.cpu_level, Some(1..=9)) {
                return Err(EnvError::Configuration(format!(
                    "slot {} cpu level must be in 1..=9",
                    slot.slot
                )));
            }
        }

        let menu_control = menu_control.ok_or_else(|| {
            EnvError::Configuration("roster needs at least one AI or CPU slot".into())
        })?;

        // a human-present match must not start before the human has joined
        let ai_press_start = config.ai_starts_game && !human_detected;
        slots[menu_control].press_start = ai_press_start;
        debug!(menu_control, ai_press_start, human_detected);

        Ok(MatchEnv {
            driver,
            slots,
            action_space: ActionSpace::new(),
            reward: RewardModel::new(),
            config,
            recorder: None,
            snapshot: None,
            menu_control,
            closed: false,
        })
    }

    /// Attach an action recorder. Frames are recorded only while
    /// `save_actions` is enabled in the configuration.
    pub fn attach_recorder(&mut self, recorder: Box<dyn ActionRecorder>) {
        self.recorder = Some(recorder);
    }

    /// The fixed roster, in slot order.
    pub fn slots(&self) -> &[AgentSlot] {
        &self.slots
    }

    /// The action table used to encode policy actions.
    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    /// The configuration this environment was built with.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The most recent snapshot, if the process has produced one.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Launch the simulation, attach all channels, poll the first snapshot.
    #[instrument(skip_all)]
    pub fn start(&mut self) -> Result<(), EnvError> {
        self.driver.run()?;
        self.driver.connect()?;
        for slot in &mut self.slots {
            if let Some(controller) = slot.controller.as_deref_mut() {
                controller.connect()?;
            }
        }
        self.snapshot = Some(self.driver.step()?);
        info!("simulation started");
        Ok(())
    }

    /// Drive the menus until the match is live on the requested stage.
    ///
    /// Returns the first in-game snapshot and `done = false`. Clears the
    /// reward model first, so no cross-match delta can leak into the new
    /// match, and resets every slot's defeated flag.
    #[instrument(skip_all, fields(?stage))]
    pub fn reset(&mut self, stage: Stage) -> Result<(Snapshot, bool), EnvError> {
        self.reward.reset();
        for slot in &mut self.slots {
            slot.defeated = false;
        }

        let mut progress = vec![SelectProgress::default(); self.slots.len()];
        let mut tick = 0usize;

        loop {
            let snapshot = self.driver.step()?;
            self.snapshot = Some(snapshot.clone());

            if snapshot.phase.is_active() {
                info!(tick, "match is live");
                return Ok((snapshot, false));
            }

            match snapshot.phase {
                crate::snapshot::MenuPhase::CharacterSelect => {
                    for (index, slot) in self.slots.iter_mut().enumerate() {
                        if !matches!(slot.role, Role::Ai | Role::Cpu) {
                            continue;
                        }
                        let cursor = snapshot
                            .entities
                            .get(index)
                            .map(|e| e.position)
                            .unwrap_or_default();
                        // validated in `new`: AI/CPU slots carry both
                        let (Some(character), Some(controller)) =
                            (slot.character, slot.controller.as_deref_mut())
                        else {
                            continue;
                        };
                        menu::choose_character(
                            character,
                            cursor,
                            index as u8,
                            slot.cpu_level,
                            slot.press_start,
                            tick,
                            &mut progress[index],
                            controller,
                        );
                    }
                }
                crate::snapshot::MenuPhase::StageSelect => {
                    let index = self.menu_control;
                    let cursor = snapshot
                        .entities
                        .get(index)
                        .map(|e| e.position)
                        .unwrap_or_default();
                    if let Some(controller) = self.slots[index].controller.as_deref_mut() {
                        menu::choose_stage(stage, cursor, tick, controller);
                    }
                }
                _ => {
                    if let Some(controller) =
                        self.slots[self.menu_control].controller.as_deref_mut()
                    {
                        menu::advance_to_versus(tick, controller);
                    }
                }
            }
            tick += 1;
        }
    }

    /// Apply one action per slot and advance the simulation by one frame.
    ///
    /// CPU slots are skipped — their behavior is internal to the process —
    /// and empty slots have nothing to drive. Everything else gets its action
    /// encoded and applied to its controller. The process is advanced even
    /// outside active phases (the pre-match countdown window); callers must
    /// not treat those early snapshots as meaningful game data.
    ///
    /// # Errors
    /// [`EnvError::ActionOutOfRange`] for an invalid id (the deadline loop
    /// filters these before they get here), [`EnvError::ProcessDisconnected`]
    /// when the simulation has vanished or the environment is closed.
    pub fn step(&mut self, actions: &[ActionId]) -> Result<Snapshot, EnvError> {
        if self.closed {
            return Err(EnvError::ProcessDisconnected(
                "environment is closed".into(),
            ));
        }
        if actions.len() != self.slots.len() {
            return Err(EnvError::Configuration(format!(
                "expected {} actions, got {}",
                self.slots.len(),
                actions.len()
            )));
        }

        for (slot, &action) in self.slots.iter_mut().zip(actions) {
            if !matches!(slot.role, Role::Human | Role::Ai) {
                continue;
            }
            let frame = self.action_space.encode(action)?;
            let Some(controller) = slot.controller.as_deref_mut() else {
                continue;
            };
            frame.apply(controller);
            if self.config.save_actions {
                if let Some(recorder) = self.recorder.as_deref_mut() {
                    recorder.record(slot.slot, &frame);
                }
            }
        }

        let snapshot = self.driver.step()?;
        self.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Score a snapshot and update defeated flags.
    pub fn evaluate(&mut self, snapshot: &Snapshot) -> RewardSample {
        for (slot, entity) in self.slots.iter_mut().zip(&snapshot.entities) {
            if slot.role != Role::Empty && entity.stock == 0 && !slot.defeated {
                info!(slot = slot.slot, "agent defeated");
                slot.defeated = true;
            }
        }
        self.reward.evaluate(snapshot)
    }

    /// Disconnect every controller, clear reward state, flush the recorder
    /// and terminate the simulation process.
    ///
    /// Idempotent: a second call does nothing and reports success. Safe to
    /// call from any error-handling path, in any state.
    #[instrument(skip_all)]
    pub fn close(&mut self) -> anyhow::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        for slot in &mut self.slots {
            if let Some(controller) = slot.controller.as_deref_mut() {
                controller.disconnect();
            }
        }
        self.reward.reset();
        self.snapshot = None;

        let flushed = match self.recorder.as_deref_mut() {
            Some(recorder) => recorder.flush(),
            None => Ok(()),
        };
        if let Err(ref e) = flushed {
            warn!("action history flush failed: {e:#}");
        }

        self.driver.stop();
        info!("environment closed");
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Button, ControllerChannel, Shoulder, Stick};
    use crate::slot::Character;
    use crate::snapshot::MenuPhase;

    struct NullChannel;
    impl ControllerChannel for NullChannel {
        fn connect(&mut self) -> Result<(), EnvError> {
            Ok(())
        }
        fn disconnect(&mut self) {}
        fn release_all(&mut self) {}
        fn press(&mut self, _button: Button) {}
        fn tilt_stick(&mut self, _stick: Stick, _x: f32, _y: f32) {}
        fn press_shoulder(&mut self, _side: Shoulder, _value: f32) {}
    }

    struct IdleDriver;
    impl ProcessDriver for IdleDriver {
        fn run(&mut self) -> Result<(), EnvError> {
            Ok(())
        }
        fn connect(&mut self) -> Result<(), EnvError> {
            Ok(())
        }
        fn step(&mut self) -> Result<Snapshot, EnvError> {
            Ok(Snapshot {
                phase: MenuPhase::InGame,
                entities: vec![],
            })
        }
        fn stop(&mut self) {}
    }

    fn ai_slot(slot: u8) -> AgentSlot {
        AgentSlot::ai(slot, Character::Fox, Box::new(NullChannel))
    }

    #[test]
    fn roster_without_ai_or_cpu_is_rejected() {
        let slots = vec![
            AgentSlot::human(1, Box::new(NullChannel)),
            AgentSlot::empty(2),
        ];
        let err = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap_err();
        assert!(matches!(err, EnvError::Configuration(_)));
    }

    #[test]
    fn cpu_level_is_validated() {
        let slots = vec![
            ai_slot(1),
            AgentSlot::cpu(2, Character::Marth, 12, Box::new(NullChannel)),
        ];
        let err = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap_err();
        assert!(matches!(err, EnvError::Configuration(_)));
    }

    #[test]
    fn last_ai_slot_controls_the_menus_and_may_start() {
        let slots = vec![ai_slot(1), ai_slot(2)];
        let env = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap();
        assert!(!env.slots()[0].press_start);
        assert!(env.slots()[1].press_start);
    }

    #[test]
    fn human_presence_disables_ai_start() {
        let slots = vec![AgentSlot::human(1, Box::new(NullChannel)), ai_slot(2)];
        let env = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap();
        assert!(!env.slots()[1].press_start);
    }

    #[test]
    fn explicit_opt_out_disables_ai_start() {
        let slots = vec![ai_slot(1), ai_slot(2)];
        let config = Configuration::new().with_ai_starts_game(false);
        let env = MatchEnv::new(IdleDriver, slots, config).unwrap();
        assert!(!env.slots()[1].press_start);
    }

    #[test]
    fn step_rejects_mismatched_action_count() {
        let slots = vec![ai_slot(1), ai_slot(2)];
        let mut env = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap();
        let err = env.step(&[0]).unwrap_err();
        assert!(matches!(err, EnvError::Configuration(_)));
    }

    #[test]
    fn step_after_close_is_an_error() {
        let slots = vec![ai_slot(1)];
        let mut env = MatchEnv::new(IdleDriver, slots, Configuration::new()).unwrap();
        env.close().unwrap();
        assert!(env.step(&[0]).is_err());
        // but closing again is fine
        env.close().unwrap();
    }
}
