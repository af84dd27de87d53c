//! Input handling. Maps key and mouse events to state mutations.
//!
//! Handlers only touch the document and the controller.  Scroll signals for
//! whatever they move are delivered by [`AppState::pump`] afterwards.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::presentation::{Key, KeyDisposition};

use super::state::{AppState, Focus};

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(' ') => Key::Space,
            _ => Key::Other,
        }
    }
}

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // A focused control gets first refusal; activation keys stop here so
    // Space does not also page the document.
    if state.focus == Focus::Control && key.modifiers.is_empty() {
        let input = Key::from(key.code);
        let disposition = state.controller.on_key(input, &state.document, &mut state.tasks);
        if disposition == KeyDisposition::Consumed {
            return;
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    state.status_message = None;
    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollUp => state.document.scroll_rows(-1),
        Action::ScrollDown => state.document.scroll_rows(1),
        Action::PageUp => state.document.page(false),
        Action::PageDown => state.document.page(true),
        Action::JumpBottom => state.document.jump_bottom(),
        Action::FocusControl => toggle_focus(state),
        Action::BackToTop => {
            state.controller.activate(&state.document, &mut state.tasks);
        }
    }
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let rows = i32::from(state.config.tunables.wheel_rows);
    match mouse.kind {
        MouseEventKind::ScrollUp => state.document.scroll_rows(-rows),
        MouseEventKind::ScrollDown => state.document.scroll_rows(rows),
        MouseEventKind::Down(MouseButton::Left) => {
            if hits_control(state, mouse.column, mouse.row) {
                state.controller.activate(&state.document, &mut state.tasks);
            }
        }
        _ => {}
    }
}

fn toggle_focus(state: &mut AppState) {
    state.focus = match state.focus {
        Focus::Control => Focus::Document,
        Focus::Document if state.controller.render_state().shown => Focus::Control,
        Focus::Document => {
            state.status_message = Some("Nothing to focus yet; scroll down first".into());
            Focus::Document
        }
    };
}

fn hits_control(state: &AppState, column: u16, row: u16) -> bool {
    if !state.controller.render_state().shown {
        return false;
    }
    state.control_area.is_some_and(|area| {
        column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height)
    })
}
