use std::time::Duration;

use shared::domain::Paper;
use tracing::{error, info};

use crate::{
    console::{Console, OutputLine},
    device::{device_info_lines, DeviceProbe},
    PaperSource,
};

pub const SYSTEM_PROMPT: &str = "system@archives:~$";
pub const USER_PROMPT: &str = "user@archives:~$";

/// Artificial delays of the scripted terminal. None of them wait on real work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub step_pause: Duration,
    pub connect: Duration,
    pub initialize: Duration,
    pub search: Duration,
    pub redirect: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step_pause: Duration::from_millis(500),
            connect: Duration::from_millis(1500),
            initialize: Duration::from_millis(1000),
            search: Duration::from_millis(1000),
            redirect: Duration::from_millis(1500),
        }
    }
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            step_pause: Duration::ZERO,
            connect: Duration::ZERO,
            initialize: Duration::ZERO,
            search: Duration::ZERO,
            redirect: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StartupReport {
    pub papers: Vec<Paper>,
    pub fetch_error: Option<String>,
}

/// Plays the fixed startup script. A failed fetch is reported as one line
/// and the script carries on with no papers.
pub async fn run_startup(
    console: &Console,
    source: &dyn PaperSource,
    probe: &dyn DeviceProbe,
    pacing: &Pacing,
) -> StartupReport {
    console.add_line(OutputLine::comment("// Welcome to the Terminal Archives."));
    tokio::time::sleep(pacing.step_pause).await;

    console
        .progress("Connecting to archives...", pacing.connect)
        .await;
    let mut report = StartupReport::default();
    match source.fetch_papers().await {
        Ok(papers) => {
            info!(count = papers.len(), "fetched paper list");
            console.add_line(
                OutputLine::plain("// Connected. ")
                    .highlight(papers.len().to_string())
                    .text(" papers found in the database."),
            );
            report.papers = papers;
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "paper list fetch failed");
            console.add_line(OutputLine::comment(
                "// Connection to archives failed. Please check the server.",
            ));
            report.fetch_error = Some(format!("{err:#}"));
        }
    }

    tokio::time::sleep(pacing.step_pause).await;
    console
        .progress("Initializing system...", pacing.initialize)
        .await;
    console.add_line(OutputLine::shell(SYSTEM_PROMPT, "fetch --device-info"));
    for line in device_info_lines(&probe.probe()) {
        console.add_line(line);
    }

    tokio::time::sleep(pacing.step_pause).await;
    console.add_line(OutputLine::shell(SYSTEM_PROMPT, "ready"));
    console.add_line(
        OutputLine::plain("System ready. Press ")
            .highlight("Ctrl + K")
            .text(" to search the database."),
    );

    report
}
