//! Opens activated items in the browser or a local application.

use daeshboard_core::{OpenError, OpenTarget, Opener};
use std::process::Command;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, target: &OpenTarget) -> Result<(), OpenError> {
        match target {
            OpenTarget::Url(url) => open::that_detached(url).map_err(|err| OpenError::Launch {
                target: url.clone(),
                reason: err.to_string(),
            })?,
            OpenTarget::Application(app) => {
                launch_application(app).map_err(|err| OpenError::Launch {
                    target: app.clone(),
                    reason: err.to_string(),
                })?
            }
        }
        tracing::info!(open_target = ?target, "Opened item");
        Ok(())
    }
}

fn launch_application(app: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg("-a").arg(app);
        command
    } else {
        Command::new(app)
    };
    let mut child = command.spawn()?;
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}
