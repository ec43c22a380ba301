use std::sync::OnceLock;

use shared::domain::Paper;
use tracing::warn;
use url::Url;

use crate::{
    console::{Console, ConsoleEvent, OutputLine, SegmentStyle},
    device::DeviceProbe,
    search::{classify_query, filter_papers, result_lines, QueryAction},
    startup::{run_startup, Pacing, StartupReport, USER_PROMPT},
    PaperSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Ignored,
    AdminPrompt,
    Results(usize),
}

/// One terminal session: the paper cache filled once at startup and the
/// search/admin flows that read it.
pub struct SearchSession {
    console: Console,
    pacing: Pacing,
    base_url: Url,
    papers: OnceLock<Vec<Paper>>,
}

impl SearchSession {
    pub fn new(console: Console, pacing: Pacing, base_url: Url) -> Self {
        Self {
            console,
            pacing,
            base_url,
            papers: OnceLock::new(),
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Cached papers; empty until startup has run or when the fetch failed.
    pub fn papers(&self) -> &[Paper] {
        self.papers.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// Fills the cache. Only the first call has any effect.
    pub fn install_papers(&self, papers: Vec<Paper>) -> bool {
        let installed = self.papers.set(papers).is_ok();
        if !installed {
            warn!("paper cache already populated; ignoring second write");
        }
        installed
    }

    pub async fn startup(&self, source: &dyn PaperSource, probe: &dyn DeviceProbe) -> StartupReport {
        let report = run_startup(&self.console, source, probe, &self.pacing).await;
        self.install_papers(report.papers.clone());
        report
    }

    pub async fn perform_search(&self, query: &str) -> SearchOutcome {
        let query = match classify_query(query) {
            QueryAction::Ignore => return SearchOutcome::Ignored,
            QueryAction::AdminShortcut => {
                self.request_admin_name();
                return SearchOutcome::AdminPrompt;
            }
            QueryAction::Search(query) => query,
        };

        self.console.add_line(OutputLine::shell(
            USER_PROMPT,
            format!("search --query=\"{query}\""),
        ));
        self.console
            .progress("Searching database...", self.pacing.search)
            .await;

        let matches = filter_papers(self.papers(), query);
        for line in result_lines(&matches, |url| self.resolve(url)) {
            self.console.add_line(line);
        }
        self.console.add_line(OutputLine::blank());
        self.console.add_line(
            OutputLine::comment("// Press ")
                .highlight("Ctrl + K")
                .styled(" to search again.", SegmentStyle::Comment),
        );
        SearchOutcome::Results(matches.len())
    }

    fn request_admin_name(&self) {
        warn!("admin shortcut used; this is navigation only, not an access check");
        self.console
            .add_line(OutputLine::comment("// Admin access requested."));
        self.console.emit(ConsoleEvent::NamePrompt);
    }

    /// Completes the admin shortcut. An empty name is ignored so the prompt
    /// stays open; returns whether navigation was issued.
    pub async fn confirm_admin_name(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.console.add_line(OutputLine::comment(format!(
            "// Welcome, {name}. Redirecting to admin panel..."
        )));
        tokio::time::sleep(self.pacing.redirect).await;
        self.console.emit(ConsoleEvent::Navigate {
            url: self.resolve(shared::protocol::ADMIN_ROUTE),
        });
        true
    }

    /// Absolute URL for a server-relative path; unparseable paths are passed
    /// through unchanged.
    pub fn resolve(&self, path: &str) -> String {
        crate::join_url(&self.base_url, path)
            .map(String::from)
            .unwrap_or_else(|_| path.to_string())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
