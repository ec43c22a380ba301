//! Search overlay. Hidden until Ctrl+K (or Cmd+K); Escape hides it and Enter
//! hides it and hands the typed query back.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// The key was not meant for the overlay.
    Ignored,
    Handled,
    Submitted(String),
}

#[derive(Debug, Default)]
pub struct SearchModal {
    state: ModalState,
    input: TextInput,
}

pub fn is_open_shortcut(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('k') | KeyCode::Char('K'))
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

impl SearchModal {
    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == ModalState::Visible
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Shows the overlay with an empty input, even when already open.
    pub fn open(&mut self) {
        self.state = ModalState::Visible;
        self.input.clear();
    }

    pub fn close(&mut self) {
        self.state = ModalState::Hidden;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        if is_open_shortcut(&key) {
            self.open();
            return ModalOutcome::Handled;
        }
        if !self.is_visible() {
            return ModalOutcome::Ignored;
        }

        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Enter => {
                self.close();
                return ModalOutcome::Submitted(self.input.take());
            }
            KeyCode::Backspace => self.input.delete_char_before(),
            KeyCode::Delete => self.input.delete_char_at(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert_char(c)
            }
            _ => {}
        }
        ModalOutcome::Handled
    }
}

#[cfg(test)]
#[path = "../tests/modal_tests.rs"]
mod tests;
