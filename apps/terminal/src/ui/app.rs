//! Application state and event loop.

use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::Result;
use client_core::ConsoleEvent;
use crossbeam_channel::Sender;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

use super::{
    log::TerminalLog,
    modal::{ModalOutcome, SearchModal},
    render,
};
use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{navigation::navigate, orchestration::dispatch_backend_command},
};

const FRAME_TIME: Duration = Duration::from_millis(33);

pub struct App {
    pub log: TerminalLog,
    pub modal: SearchModal,
    pub status: Option<String>,
    pub should_quit: bool,
    cmd_tx: Sender<BackendCommand>,
    use_browser: bool,
}

impl App {
    pub fn new(cmd_tx: Sender<BackendCommand>, use_browser: bool) -> Self {
        Self {
            log: TerminalLog::default(),
            modal: SearchModal::default(),
            status: None,
            should_quit: false,
            cmd_tx,
            use_browser,
        }
    }

    pub fn handle_console_event(&mut self, event: ConsoleEvent) {
        if let Some(url) = self.log.apply(event) {
            for line in navigate(&url, self.use_browser) {
                self.log.push(line);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.modal.handle_key(key) {
            ModalOutcome::Handled => return,
            ModalOutcome::Submitted(query) => {
                self.dispatch(BackendCommand::Search { query });
                return;
            }
            ModalOutcome::Ignored => {}
        }

        if self.log.name_prompt().is_some() {
            if key.code == KeyCode::Enter {
                if let Some(name) = self.log.submit_name() {
                    self.dispatch(BackendCommand::ConfirmAdminName { name });
                }
            } else if let Some(input) = self.log.name_prompt_mut() {
                match key.code {
                    KeyCode::Backspace => input.delete_char_before(),
                    KeyCode::Delete => input.delete_char_at(),
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Char(c) => input.insert_char(c),
                    _ => {}
                }
            }
            return;
        }

        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        self.status = None;
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }
}

/// Takes over the terminal until the user quits. The backend worker is
/// expected to be running already and feeding `console_rx`.
pub fn run(
    cmd_tx: Sender<BackendCommand>,
    console_rx: UnboundedReceiver<ConsoleEvent>,
    use_browser: bool,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cmd_tx, use_browser);
    let result = run_loop(&mut terminal, &mut app, console_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut console_rx: UnboundedReceiver<ConsoleEvent>,
) -> Result<()> {
    let mut backend_alive = true;
    loop {
        while backend_alive {
            match console_rx.try_recv() {
                Ok(event) => app.handle_console_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("backend worker stopped");
                    backend_alive = false;
                }
            }
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(FRAME_TIME)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
