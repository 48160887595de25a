//! Error taxonomy for the environment.
//!
//! Only truly exceptional conditions are surfaced as errors: bad configuration
//! before a match starts, no bindable port at startup, and the external
//! simulation vanishing mid-match. Expected control flow (menu transitions,
//! timed-out agents, invalid action ids from a policy) is recovered locally
//! and never raised past the match loop.

use thiserror::Error;

/// Errors reported by the environment to its caller.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Bad agent descriptor, missing resource, or inconsistent match setup.
    /// Fatal: surfaced before a match starts, no partial match is entered.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No bindable port was found in the scanned range. Fatal at startup;
    /// the caller may retry with a different range, the environment does not.
    #[error("no available port in {start}..={end}")]
    PortUnavailable {
        /// First port probed (inclusive).
        start: u16,
        /// Last port probed (inclusive).
        end: u16,
    },

    /// An action id outside `[0, size)` reached the action table. Policies
    /// that produce these are substituted with the no-op action by the match
    /// loop; this variant only escapes when `encode` is called directly.
    #[error("action id {id} out of range (action space size is {size})")]
    ActionOutOfRange {
        /// The offending id.
        id: usize,
        /// Size of the action table.
        size: usize,
    },

    /// The external simulation process vanished or stopped responding.
    /// Fatal for the current match; `close()` remains safe to call.
    #[error("simulation process disconnected: {0}")]
    ProcessDisconnected(String),
}
