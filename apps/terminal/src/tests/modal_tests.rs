use super::*;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl_k() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)
}

fn type_text(modal: &mut SearchModal, text: &str) {
    for c in text.chars() {
        assert_eq!(modal.handle_key(key(KeyCode::Char(c))), ModalOutcome::Handled);
    }
}

#[test]
fn starts_hidden_and_ignores_typing() {
    let mut modal = SearchModal::default();
    assert_eq!(modal.state(), ModalState::Hidden);
    assert_eq!(modal.handle_key(key(KeyCode::Char('q'))), ModalOutcome::Ignored);
    assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalOutcome::Ignored);
    assert!(modal.input().text.is_empty());
}

#[test]
fn ctrl_or_cmd_k_opens_with_cleared_input() {
    let mut modal = SearchModal::default();
    assert_eq!(modal.handle_key(ctrl_k()), ModalOutcome::Handled);
    type_text(&mut modal, "math");
    assert_eq!(modal.input().text, "math");

    let cmd_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
    assert_eq!(modal.handle_key(cmd_k), ModalOutcome::Handled);
    assert!(modal.is_visible());
    assert!(modal.input().text.is_empty());
}

#[test]
fn escape_closes_without_submitting() {
    let mut modal = SearchModal::default();
    modal.handle_key(ctrl_k());
    type_text(&mut modal, "phys");
    assert_eq!(modal.handle_key(key(KeyCode::Esc)), ModalOutcome::Handled);
    assert_eq!(modal.state(), ModalState::Hidden);
}

#[test]
fn enter_closes_and_submits_raw_query() {
    let mut modal = SearchModal::default();
    modal.handle_key(ctrl_k());
    type_text(&mut modal, " Math 2020 ");
    assert_eq!(
        modal.handle_key(key(KeyCode::Enter)),
        ModalOutcome::Submitted(" Math 2020 ".into())
    );
    assert_eq!(modal.state(), ModalState::Hidden);
}

#[test]
fn enter_on_empty_input_still_closes() {
    let mut modal = SearchModal::default();
    modal.handle_key(ctrl_k());
    assert_eq!(
        modal.handle_key(key(KeyCode::Enter)),
        ModalOutcome::Submitted(String::new())
    );
    assert!(!modal.is_visible());
}

#[test]
fn backspace_edits_the_query() {
    let mut modal = SearchModal::default();
    modal.handle_key(ctrl_k());
    type_text(&mut modal, "mathx");
    modal.handle_key(key(KeyCode::Backspace));
    assert_eq!(modal.input().text, "math");
}
