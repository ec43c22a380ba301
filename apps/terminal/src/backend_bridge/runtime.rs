//! Runtime bridge between the UI command queue and the search session.

use std::thread::{self, JoinHandle};

use client_core::{ArchiveClient, Console, OutputLine, Pacing, SearchSession, SystemProbe};
use crossbeam_channel::Receiver;

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub server_url: String,
    pub pacing: Pacing,
}

/// Spawns the worker. It plays the startup script, then serves commands in
/// arrival order until every sender is dropped. Output reaches the UI only
/// through `console`.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    console: Console,
    config: BackendConfig,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                console.add_line(OutputLine::comment(format!(
                    "// Backend failed to start: {err}"
                )));
                return;
            }
        };

        let client = match ArchiveClient::new(&config.server_url) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("{err}");
                console.add_line(OutputLine::comment(format!("// {err}")));
                return;
            }
        };

        let session = SearchSession::new(console, config.pacing, client.base_url().clone());
        runtime.block_on(session.startup(&client, &SystemProbe));
        tracing::info!(papers = session.papers().len(), "terminal session ready");

        while let Ok(cmd) = cmd_rx.recv() {
            runtime.block_on(handle_command(&session, cmd));
        }
        tracing::debug!("command queue closed; backend worker exiting");
    })
}

pub(crate) async fn handle_command(session: &SearchSession, cmd: BackendCommand) {
    match cmd {
        BackendCommand::Search { query } => {
            let outcome = session.perform_search(&query).await;
            tracing::debug!(?outcome, "search finished");
        }
        BackendCommand::ConfirmAdminName { name } => {
            if !session.confirm_admin_name(&name).await {
                tracing::debug!("empty admin name ignored");
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
