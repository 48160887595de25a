//! Boundary to the external simulation process.
//!
//! The environment is the only component allowed to touch the process, and it
//! does so exclusively through [`ProcessDriver`]: launch, connect, advance one
//! frame, stop. Snapshots arrive on a single monotonic stream; `step` is
//! called exactly once per tick.

use std::net::UdpSocket;

use tracing::trace;

use crate::error::EnvError;
use crate::snapshot::Snapshot;

/// Handle on the external simulation process.
pub trait ProcessDriver {
    /// Launch the simulation process.
    fn run(&mut self) -> Result<(), EnvError>;

    /// Attach to the control channel of the running process.
    fn connect(&mut self) -> Result<(), EnvError>;

    /// Advance the simulation by one frame and return the resulting snapshot.
    ///
    /// # Errors
    /// [`EnvError::ProcessDisconnected`] when the process has vanished.
    fn step(&mut self) -> Result<Snapshot, EnvError>;

    /// Terminate the process. Must be safe to call more than once.
    fn stop(&mut self);
}

/// Scan an inclusive port range for a UDP port this host can bind.
///
/// Used at startup when no explicit control port is configured.
///
/// # Errors
/// [`EnvError::PortUnavailable`] when every port in the range is taken.
pub fn find_available_udp_port(start: u16, end: u16) -> Result<u16, EnvError> {
    for port in start..=end {
        if UdpSocket::bind(("127.0.0.1", port)).is_ok() {
            trace!(port, "found available udp port");
            return Ok(port);
        }
    }
    Err(EnvError::PortUnavailable { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_bindable_port() {
        let port = find_available_udp_port(40000, 65535).unwrap();
        assert!((40000..=65535).contains(&port));
        // the port is actually bindable after the scan released it
        UdpSocket::bind(("127.0.0.1", port)).unwrap();
    }

    #[test]
    fn exhausted_range_is_an_error() {
        // occupy one port, then scan a range containing only that port
        let blocker = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let taken = blocker.local_addr().unwrap().port();
        let err = find_available_udp_port(taken, taken).unwrap_err();
        assert!(matches!(err, EnvError::PortUnavailable { .. }));
    }
}
