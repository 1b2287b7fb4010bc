//! Desktop notifications through the platform helper.
//!
//! `notify-send` on Linux, `osascript` on macOS. The helper is spawned and
//! reaped on a background thread so the render loop never waits on it.

use daeshboard_core::{NotifyError, Notifier};
use std::process::{Child, Command};

pub const PROGRAM_NAME: &str = "Daeshboard";

pub fn notification_message(tab_title: &str) -> String {
    format!("New activity in {tab_title}")
}

#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn spawn(&self, message: &str) -> std::io::Result<Child> {
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                message.replace('"', "\\\""),
                PROGRAM_NAME
            );
            Command::new("osascript").arg("-e").arg(&script).spawn()
        } else {
            Command::new("notify-send")
                .arg(format!("--app-name={PROGRAM_NAME}"))
                .arg(PROGRAM_NAME)
                .arg(message)
                .spawn()
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, tab_title: &str) -> Result<(), NotifyError> {
        if !self.enabled {
            tracing::debug!(tab = tab_title, "Notifications disabled");
            return Ok(());
        }

        let message = notification_message(tab_title);
        let program = helper_program();
        let mut child = self.spawn(&message).map_err(|err| NotifyError::Unavailable {
            program: program.to_string(),
            reason: err.to_string(),
        })?;

        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(program, status = %status, "Notification helper exited with failure");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(program, error = %err, "Failed to wait for notification helper"),
        });
        Ok(())
    }
}

fn helper_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "osascript"
    } else {
        "notify-send"
    }
}
