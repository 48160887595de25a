//! Advisory process hygiene.
//!
//! A crashed caller can leave simulation processes behind; on a shared
//! machine those pile up. [`kill_zombies`] sweeps the process table and
//! terminates instances of the simulation binary that have been running
//! longer than the configured lifetime. This is housekeeping outside the
//! match lifecycle: failures are logged and the sweep moves on.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sysinfo::{ProcessesToUpdate, System};
use tracing::{info, warn};

/// Kill processes whose name contains `process_name` and whose runtime
/// exceeds `max_runtime`. Returns the number of processes killed.
pub fn kill_zombies(process_name: &str, max_runtime: Duration) -> usize {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let mut killed = 0;
    for (pid, process) in sys.processes() {
        let name = process.name().to_string_lossy();
        if !name.contains(process_name) {
            continue;
        }
        let age = now.saturating_sub(process.start_time());
        if age <= max_runtime.as_secs() {
            continue;
        }
        if process.kill() {
            info!(%pid, age, "killed zombie simulation process");
            killed += 1;
        } else {
            warn!(%pid, "zombie process kill failure");
        }
    }
    killed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_with_unmatched_name_kills_nothing() {
        let killed = kill_zombies(
            "no-process-is-named-like-this-2f7c",
            Duration::from_secs(1200),
        );
        assert_eq!(killed, 0);
    }
}
