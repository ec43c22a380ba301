//! Scrollback the console events build up, plus the transient rows
//! (progress bars, the admin name prompt) shown beneath it.

use std::time::{Duration, Instant};

use client_core::{ConsoleEvent, OutputLine, SegmentStyle};

use super::input::TextInput;

pub const NAME_PROMPT: &str = "// Please enter your name to proceed: ";

#[derive(Debug, Clone)]
pub struct ActiveProgress {
    pub id: u64,
    pub label: String,
    pub duration: Duration,
    pub started: Instant,
}

impl ActiveProgress {
    /// Share of the duration elapsed, clamped to `0.0..=1.0`.
    pub fn ratio(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Default)]
pub struct TerminalLog {
    lines: Vec<OutputLine>,
    progress: Vec<ActiveProgress>,
    name_prompt: Option<TextInput>,
}

impl TerminalLog {
    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn progress(&self) -> &[ActiveProgress] {
        &self.progress
    }

    pub fn name_prompt(&self) -> Option<&TextInput> {
        self.name_prompt.as_ref()
    }

    pub fn name_prompt_mut(&mut self) -> Option<&mut TextInput> {
        self.name_prompt.as_mut()
    }

    pub fn push(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    /// Applies one event. A navigation request is handed back to the caller.
    pub fn apply(&mut self, event: ConsoleEvent) -> Option<String> {
        match event {
            ConsoleEvent::Line(line) => self.lines.push(line),
            ConsoleEvent::ProgressStarted {
                id,
                label,
                duration,
            } => self.progress.push(ActiveProgress {
                id,
                label,
                duration,
                started: Instant::now(),
            }),
            ConsoleEvent::ProgressFinished { id } => self.progress.retain(|p| p.id != id),
            ConsoleEvent::NamePrompt => self.name_prompt = Some(TextInput::default()),
            ConsoleEvent::Navigate { url } => return Some(url),
        }
        None
    }

    /// Closes the name prompt and returns the name, leaving the answered
    /// prompt in the scrollback. An empty name keeps the prompt open.
    pub fn submit_name(&mut self) -> Option<String> {
        let prompt = self.name_prompt.as_mut()?;
        if prompt.text.is_empty() {
            return None;
        }
        let name = prompt.take();
        self.name_prompt = None;
        self.lines.push(
            OutputLine::default()
                .styled(NAME_PROMPT, SegmentStyle::AdminPrompt)
                .text(name.clone()),
        );
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rows_come_and_go_by_id() {
        let mut log = TerminalLog::default();
        for id in [1, 2] {
            log.apply(ConsoleEvent::ProgressStarted {
                id,
                label: format!("step {id}"),
                duration: Duration::from_secs(1),
            });
        }
        log.apply(ConsoleEvent::ProgressFinished { id: 1 });
        assert_eq!(log.progress().len(), 1);
        assert_eq!(log.progress()[0].label, "step 2");
        assert!(log.lines().is_empty());
    }

    #[test]
    fn ratio_is_clamped() {
        let started = Instant::now();
        let progress = ActiveProgress {
            id: 1,
            label: String::new(),
            duration: Duration::from_millis(100),
            started,
        };
        assert_eq!(progress.ratio(started), 0.0);
        assert_eq!(progress.ratio(started + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn empty_name_keeps_prompt_open() {
        let mut log = TerminalLog::default();
        assert!(log.apply(ConsoleEvent::NamePrompt).is_none());
        assert_eq!(log.submit_name(), None);
        assert!(log.name_prompt().is_some());

        if let Some(input) = log.name_prompt_mut() {
            "Ada".chars().for_each(|c| input.insert_char(c));
        }
        assert_eq!(log.submit_name().as_deref(), Some("Ada"));
        assert!(log.name_prompt().is_none());
        assert_eq!(
            log.lines()[0].plain_text(),
            "// Please enter your name to proceed: Ada"
        );
    }

    #[test]
    fn navigation_is_returned_not_logged() {
        let mut log = TerminalLog::default();
        let url = log.apply(ConsoleEvent::Navigate {
            url: "http://127.0.0.1:5000/admin".into(),
        });
        assert_eq!(url.as_deref(), Some("http://127.0.0.1:5000/admin"));
        assert!(log.lines().is_empty());
    }
}
