//! Command orchestration from UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` without blocking the UI. Failures are reported through
/// `status` for the status bar.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut Option<String>,
) {
    let cmd_name = match &cmd {
        BackendCommand::Search { .. } => "search",
        BackendCommand::ConfirmAdminName { .. } => "confirm_admin_name",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = Some("Busy; please retry in a moment".to_string());
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = Some("Backend stopped; see the log file for details".to_string());
        }
    }
}
