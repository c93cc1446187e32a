//! Best-effort desktop notifications.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

pub const NOTIFICATION_TITLE: &str = "Epoch Dashboard";

/// Fire-and-forget alert channel. Implementations must not block or fail outward.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Desktop notification backend, picked once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopNotifier {
    /// `notify-send` (Linux / freedesktop)
    NotifySend(PathBuf),
    /// `terminal-notifier` (macOS, preferred when installed)
    TerminalNotifier(PathBuf),
    /// `osascript` (macOS fallback)
    AppleScript(PathBuf),
    Disabled,
}

impl DesktopNotifier {
    /// Pick a backend for the current OS from whatever is on `PATH`
    pub fn detect() -> Self {
        Self::detect_for(env::consts::OS, env::var_os("PATH"))
    }

    fn detect_for(os: &str, search_path: Option<OsString>) -> Self {
        let Some(search_path) = search_path else {
            return DesktopNotifier::Disabled;
        };
        let find = |program: &str| find_program(program, &search_path);

        let notifier = match os {
            "linux" | "freebsd" | "openbsd" | "netbsd" => find("notify-send").map(DesktopNotifier::NotifySend),
            "macos" => find("terminal-notifier")
                .map(DesktopNotifier::TerminalNotifier)
                .or_else(|| find("osascript").map(DesktopNotifier::AppleScript)),
            _ => None,
        };

        notifier.unwrap_or(DesktopNotifier::Disabled)
    }

    fn command(&self, message: &str) -> Option<Command> {
        let command = match self {
            DesktopNotifier::NotifySend(program) => {
                let mut command = Command::new(program);
                command.arg(NOTIFICATION_TITLE).arg(message);
                command
            }
            DesktopNotifier::TerminalNotifier(program) => {
                let mut command = Command::new(program);
                command.args(["-title", NOTIFICATION_TITLE, "-message", message]);
                command
            }
            DesktopNotifier::AppleScript(program) => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    escape_applescript(message),
                    NOTIFICATION_TITLE
                );
                let mut command = Command::new(program);
                command.arg("-e").arg(script);
                command
            }
            DesktopNotifier::Disabled => return None,
        };
        Some(command)
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str) {
        let Some(mut command) = self.command(message) else {
            debug!(%message, "notifications disabled");
            return;
        };
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(%message, "no runtime to dispatch notification on");
            return;
        };
        runtime.spawn(async move {
            match command.status().await {
                Ok(status) if !status.success() => debug!(%status, "notification command failed"),
                Err(e) => debug!("failed to run notification command: {e}"),
                Ok(_) => {}
            }
        });
    }
}

fn find_program(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn escape_applescript(message: &str) -> String {
    message.replace('\\', "\\\\").replace('"', "\\\"")
}
