//! Line-oriented mode: queries come from stdin, output goes to stdout as
//! plain text. Useful over pipes and for smoke-testing a server.

use anyhow::Result;
use client_core::{
    ArchiveClient, Console, ConsoleEvent, OutputLine, Pacing, SearchOutcome, SearchSession,
    SegmentStyle, SystemProbe,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{controller::navigation::navigate, ui::log::NAME_PROMPT};

pub async fn run(server_url: &str, pacing: Pacing, use_browser: bool) -> Result<()> {
    let client = ArchiveClient::new(server_url)?;
    let (console, mut console_rx) = Console::channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = console_rx.recv().await {
            for line in render_event(event, use_browser) {
                println!("{line}");
            }
        }
    });

    let session = SearchSession::new(console, pacing, client.base_url().clone());
    session.startup(&client, &SystemProbe).await;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut awaiting_name = false;
    while let Some(line) = stdin.next_line().await? {
        if awaiting_name {
            awaiting_name = !session.confirm_admin_name(&line).await;
            continue;
        }
        awaiting_name = session.perform_search(&line).await == SearchOutcome::AdminPrompt;
    }

    drop(session);
    printer.await?;
    Ok(())
}

/// Plain-text rendering of one event. Finished progress prints nothing.
pub fn render_event(event: ConsoleEvent, use_browser: bool) -> Vec<String> {
    match event {
        ConsoleEvent::Line(line) => vec![render_line(&line)],
        ConsoleEvent::ProgressStarted { label, .. } => vec![label],
        ConsoleEvent::ProgressFinished { .. } => Vec::new(),
        ConsoleEvent::NamePrompt => vec![NAME_PROMPT.trim_end().to_string()],
        ConsoleEvent::Navigate { url } => navigate(&url, use_browser)
            .iter()
            .map(render_line)
            .collect(),
    }
}

/// Flattens a line, spelling out link targets that differ from their text.
pub fn render_line(line: &OutputLine) -> String {
    let mut out = String::new();
    for segment in &line.segments {
        out.push_str(&segment.text);
        if let SegmentStyle::Link { url } = &segment.style {
            if *url != segment.text {
                out.push_str(&format!(" <{url}>"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn result_line_spells_out_link() {
        let line = OutputLine::plain("  [2020] ").link("BSc Math", "http://h/uploads/a.pdf");
        assert_eq!(
            render_line(&line),
            "  [2020] BSc Math <http://h/uploads/a.pdf>"
        );
    }

    #[test]
    fn progress_prints_label_once() {
        let started = render_event(
            ConsoleEvent::ProgressStarted {
                id: 1,
                label: "Searching database...".into(),
                duration: Duration::from_secs(1),
            },
            false,
        );
        assert_eq!(started, ["Searching database..."]);
        assert!(render_event(ConsoleEvent::ProgressFinished { id: 1 }, false).is_empty());
    }

    #[test]
    fn name_prompt_and_navigation_are_printed() {
        assert_eq!(
            render_event(ConsoleEvent::NamePrompt, false),
            ["// Please enter your name to proceed:"]
        );
        assert_eq!(
            render_event(
                ConsoleEvent::Navigate {
                    url: "http://127.0.0.1:5000/admin".into()
                },
                false
            ),
            ["// Admin panel: http://127.0.0.1:5000/admin"]
        );
    }
}
