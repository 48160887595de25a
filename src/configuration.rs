//! Config for the environment behaviors.
//!
//! Configuration can be created programmatically using
//! [`Configuration::new()`] or by reading environment variables using
//! [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Boolean flags are case-insensitive; set the value
//! to `"true"` to enable one.
//!
//! - `VS_VERBOSE` — Print match progress to stdout (default: `true`)
//! - `VS_LOG` — Enable logging to a file (default: `false`)
//! - `VS_FAST_FORWARD` — Run the simulation above real-time speed (default: `false`)
//! - `VS_SAVE_REPLAYS` — Ask the process driver to keep replays (default: `false`)
//! - `VS_SAVE_ACTIONS` — Record applied controller frames (default: `false`)
//! - `VS_AI_STARTS_GAME` — Authorize the menu-controlling AI to press start (default: `true`)
//! - `VS_PORT` (u16) — Explicit control port; scanned when unset
//! - `VS_ACTION_TIMEOUT_MS` (u64) — Per-agent action deadline (default: 100 ms)
//! - `VS_WARMUP_TICKS` (usize) — Pre-match countdown ticks stepped with no-ops (default: 100)
//! - `VS_MAX_TICKS` (usize) — Tick budget per match (default: 28800, eight minutes at 60 fps)
//! - `VS_ZOMBIE_LIFETIME_SECS` (u64) — Advisory sweep age for stale sim processes (default: 1200)

use std::env;
use std::time::Duration;

/// Configuration for environment behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) fast_forward: bool,
    pub(crate) save_replays: bool,
    pub(crate) save_actions: bool,
    pub(crate) ai_starts_game: bool,
    pub(crate) port: Option<u16>,
    pub(crate) action_timeout: Duration,
    pub(crate) warmup_ticks: usize,
    pub(crate) max_ticks: usize,
    pub(crate) zombie_lifetime: Duration,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Match progress is printed to stdout.
    /// - Logging to file is disabled.
    /// - The simulation runs at real-time speed and keeps no replays.
    /// - Applied controller frames are not recorded.
    /// - The menu-controlling AI is authorized to press start.
    /// - The control port is scanned at startup.
    /// - Agents get 100 ms per action, matches 28800 ticks, with a 100-tick
    ///   pre-match countdown window.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            fast_forward: false,
            save_replays: false,
            save_actions: false,
            ai_starts_game: true,
            port: None,
            action_timeout: Duration::from_millis(100),
            warmup_ticks: 100,
            max_ticks: 28_800,
            zombie_lifetime: Duration::from_secs(1200),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables. Any other
    /// value (including unset) falls back to the default for that field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn parse_env<T: std::str::FromStr>(var: &str) -> Option<T> {
            env::var(var).ok()?.parse().ok()
        }

        let defaults = Self::new();
        Self {
            verbose: get_env_flag("VS_VERBOSE", defaults.verbose),
            log: get_env_flag("VS_LOG", defaults.log),
            fast_forward: get_env_flag("VS_FAST_FORWARD", defaults.fast_forward),
            save_replays: get_env_flag("VS_SAVE_REPLAYS", defaults.save_replays),
            save_actions: get_env_flag("VS_SAVE_ACTIONS", defaults.save_actions),
            ai_starts_game: get_env_flag("VS_AI_STARTS_GAME", defaults.ai_starts_game),
            port: parse_env("VS_PORT"),
            action_timeout: parse_env("VS_ACTION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.action_timeout),
            warmup_ticks: parse_env("VS_WARMUP_TICKS").unwrap_or(defaults.warmup_ticks),
            max_ticks: parse_env("VS_MAX_TICKS").unwrap_or(defaults.max_ticks),
            zombie_lifetime: parse_env("VS_ZOMBIE_LIFETIME_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.zombie_lifetime),
        }
    }

    /// Enable or disable printing match progress.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable running the simulation above real-time speed.
    pub fn with_fast_forward(mut self, value: bool) -> Self {
        self.fast_forward = value;
        self
    }

    /// Enable or disable replay persistence in the process driver.
    pub fn with_save_replays(mut self, value: bool) -> Self {
        self.save_replays = value;
        self
    }

    /// Enable or disable recording of applied controller frames.
    ///
    /// Recording also requires a recorder to be attached to the environment.
    pub fn with_save_actions(mut self, value: bool) -> Self {
        self.save_actions = value;
        self
    }

    /// Authorize or forbid the menu-controlling AI to press start.
    ///
    /// Even when authorized, a human player present in the roster disables
    /// auto-start so the match cannot begin before the human has joined.
    pub fn with_ai_starts_game(mut self, value: bool) -> Self {
        self.ai_starts_game = value;
        self
    }

    /// Use an explicit control port instead of scanning for one.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the per-agent wall-clock deadline for one action.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Set the number of pre-match countdown ticks stepped with no-ops.
    pub fn with_warmup_ticks(mut self, ticks: usize) -> Self {
        self.warmup_ticks = ticks;
        self
    }

    /// Set the tick budget per match.
    pub fn with_max_ticks(mut self, ticks: usize) -> Self {
        self.max_ticks = ticks;
        self
    }

    /// Set the age above which the advisory sweep kills stale sim processes.
    pub fn with_zombie_lifetime(mut self, lifetime: Duration) -> Self {
        self.zombie_lifetime = lifetime;
        self
    }

    /// Per-agent wall-clock deadline for one action.
    pub fn action_timeout(&self) -> Duration {
        self.action_timeout
    }

    /// Explicit control port, when configured.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Whether match progress is printed to stdout.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the process driver should run above real-time speed.
    pub fn fast_forward(&self) -> bool {
        self.fast_forward
    }

    /// Whether the process driver should keep replays.
    pub fn save_replays(&self) -> bool {
        self.save_replays
    }

    /// Age above which [`kill_zombies`](crate::kill_zombies) should reap a
    /// stale simulation process.
    pub fn zombie_lifetime(&self) -> Duration {
        self.zombie_lifetime
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
