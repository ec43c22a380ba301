use super::*;
use client_core::OutputLine;
use crossbeam_channel::{bounded, Receiver};

fn app() -> (App, Receiver<BackendCommand>) {
    let (tx, rx) = bounded(8);
    (App::new(tx, false), rx)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    text.chars().for_each(|c| press(app, KeyCode::Char(c)));
}

fn ctrl(app: &mut App, c: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

#[test]
fn search_from_overlay_is_queued_for_backend() {
    let (mut app, rx) = app();
    ctrl(&mut app, 'k');
    type_text(&mut app, "quit me not");
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Enter);

    assert!(!app.modal.is_visible());
    assert_eq!(
        rx.try_recv(),
        Ok(BackendCommand::Search {
            query: "quit me not".into()
        })
    );
}

#[test]
fn q_quits_only_outside_inputs() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);

    let (mut app, _rx) = self::app();
    ctrl(&mut app, 'c');
    assert!(app.should_quit);
}

#[test]
fn name_prompt_collects_name_then_confirms() {
    let (mut app, rx) = app();
    app.handle_console_event(ConsoleEvent::Line(OutputLine::comment(
        "// Admin access requested.",
    )));
    app.handle_console_event(ConsoleEvent::NamePrompt);

    press(&mut app, KeyCode::Enter);
    assert!(rx.try_recv().is_err());
    assert!(app.log.name_prompt().is_some());

    type_text(&mut app, "quinn");
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Enter);
    assert_eq!(
        rx.try_recv(),
        Ok(BackendCommand::ConfirmAdminName {
            name: "quinn".into()
        })
    );
    assert!(app.log.name_prompt().is_none());
}

#[test]
fn overlay_can_open_over_the_name_prompt() {
    let (mut app, rx) = app();
    app.handle_console_event(ConsoleEvent::NamePrompt);
    ctrl(&mut app, 'k');
    type_text(&mut app, "math");
    press(&mut app, KeyCode::Enter);
    assert_eq!(
        rx.try_recv(),
        Ok(BackendCommand::Search {
            query: "math".into()
        })
    );
    assert!(app.log.name_prompt().is_some());
}

#[test]
fn navigation_without_browser_prints_the_url() {
    let (mut app, _rx) = app();
    app.handle_console_event(ConsoleEvent::Navigate {
        url: "http://127.0.0.1:5000/admin".into(),
    });
    let last = app.log.lines().last().expect("line");
    assert_eq!(
        last.plain_text(),
        "// Admin panel: http://127.0.0.1:5000/admin"
    );
}

#[test]
fn key_releases_are_ignored() {
    let (mut app, _rx) = app();
    let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    key.kind = KeyEventKind::Release;
    app.handle_key(key);
    assert!(!app.should_quit);
}

#[test]
fn closed_backend_is_reported_in_status() {
    let (mut app, rx) = app();
    drop(rx);
    ctrl(&mut app, 'k');
    type_text(&mut app, "math");
    press(&mut app, KeyCode::Enter);
    assert!(app.status.is_some());
}
