//! Output model shared by every renderer: styled lines, transient progress
//! indicators, and the prompts the search flow can raise.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Style tag applied to a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTone {
    #[default]
    Normal,
    Comment,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Prompt,
    Command,
    Highlight,
    Comment,
    AdminPrompt,
    Link { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLine {
    pub tone: LineTone,
    pub segments: Vec<Segment>,
}

impl OutputLine {
    pub fn new(tone: LineTone) -> Self {
        Self {
            tone,
            segments: Vec::new(),
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::default().text(text)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(LineTone::Comment).styled(text, SegmentStyle::Comment)
    }

    /// `user@archives:~$ <command>`
    pub fn shell(prompt: &str, command: impl Into<String>) -> Self {
        Self::default()
            .styled(prompt, SegmentStyle::Prompt)
            .text(" ")
            .styled(command, SegmentStyle::Command)
    }

    pub fn styled(mut self, text: impl Into<String>, style: SegmentStyle) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            style,
        });
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.styled(text, SegmentStyle::Plain)
    }

    pub fn highlight(self, text: impl Into<String>) -> Self {
        self.styled(text, SegmentStyle::Highlight)
    }

    pub fn link(self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.styled(text, SegmentStyle::Link { url: url.into() })
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Line(OutputLine),
    ProgressStarted {
        id: u64,
        label: String,
        duration: Duration,
    },
    ProgressFinished { id: u64 },
    /// Ask the renderer for an inline name input.
    NamePrompt,
    Navigate { url: String },
}

/// Cloneable handle that appends to whatever log is draining the paired
/// receiver. Events sent after the receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct Console {
    tx: UnboundedSender<ConsoleEvent>,
    next_progress_id: Arc<AtomicU64>,
}

impl Console {
    pub fn channel() -> (Self, UnboundedReceiver<ConsoleEvent>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                tx,
                next_progress_id: Arc::new(AtomicU64::new(1)),
            },
            rx,
        )
    }

    pub fn emit(&self, event: ConsoleEvent) {
        let _ = self.tx.send(event);
    }

    pub fn add_line(&self, line: OutputLine) {
        self.emit(ConsoleEvent::Line(line));
    }

    /// Shows `label` with a progress indicator for `duration`, then removes it.
    pub async fn progress(&self, label: impl Into<String>, duration: Duration) {
        let id = self.next_progress_id.fetch_add(1, Ordering::Relaxed);
        self.emit(ConsoleEvent::ProgressStarted {
            id,
            label: label.into(),
            duration,
        });
        tokio::time::sleep(duration).await;
        self.emit(ConsoleEvent::ProgressFinished { id });
    }
}

/// Drains every event currently queued on `rx` without waiting.
pub fn drain_events(rx: &mut UnboundedReceiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_line_flattens_to_prompt_and_command() {
        let line = OutputLine::shell("system@archives:~$", "ready");
        assert_eq!(line.plain_text(), "system@archives:~$ ready");
        assert_eq!(line.segments[0].style, SegmentStyle::Prompt);
        assert_eq!(line.segments[2].style, SegmentStyle::Command);
    }

    #[tokio::test]
    async fn progress_is_started_then_finished() {
        let (console, mut rx) = Console::channel();
        console.progress("Working...", Duration::ZERO).await;
        console.progress("Again...", Duration::ZERO).await;

        let events = drain_events(&mut rx);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::ProgressStarted {
                    id: 1,
                    label: "Working...".into(),
                    duration: Duration::ZERO,
                },
                ConsoleEvent::ProgressFinished { id: 1 },
                ConsoleEvent::ProgressStarted {
                    id: 2,
                    label: "Again...".into(),
                    duration: Duration::ZERO,
                },
                ConsoleEvent::ProgressFinished { id: 2 },
            ]
        );
    }

    #[test]
    fn lines_after_receiver_drop_are_ignored() {
        let (console, rx) = Console::channel();
        drop(rx);
        console.add_line(OutputLine::plain("nobody listening"));
    }
}
