//! Best-effort "keep the display awake" resource held while the teleprompter
//! screen is active. The lock is a spawned helper process that inhibits idle
//! blanking for as long as it runs; dropping the guard kills it. Platforms
//! without a helper, and hosts where spawning fails, degrade to a no-op:
//! the teleprompter works either way, the screen just may blank.

use std::process::Child;

use tracing::debug;

/// RAII guard around the platform inhibitor process. Acquire on entering the
/// teleprompter, drop on leaving it.
pub(crate) struct WakeGuard {
    child: Option<Child>,
}

impl WakeGuard {
    /// Try to acquire the stay-awake resource. Failure is not an error
    /// anywhere in the application; it is logged for diagnostics only.
    pub(crate) fn acquire() -> Self {
        let child = spawn_inhibitor();
        match &child {
            Some(child) => debug!(pid = child.id(), "display stay-awake acquired"),
            None => debug!("display stay-awake unavailable"),
        }
        Self { child }
    }
}

impl Drop for WakeGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(target_os = "linux")]
fn spawn_inhibitor() -> Option<Child> {
    use std::process::{Command, Stdio};

    Command::new("systemd-inhibit")
        .args([
            "--what=idle:sleep",
            "--who=capo-canto",
            "--why=teleprompter session",
            "--mode=block",
            "sleep",
            "infinity",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .ok()
}

#[cfg(target_os = "macos")]
fn spawn_inhibitor() -> Option<Child> {
    use std::process::{Command, Stdio};

    Command::new("caffeinate")
        .arg("-d")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .ok()
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn spawn_inhibitor() -> Option<Child> {
    None
}
