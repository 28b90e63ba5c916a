//! Key bindings and per-frame input dispatch.

use crate::game::{Command, GameState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    TogglePause,
    Restart,
    Quit,
    None,
}

/// Map key event to input. Arrows or vim keys (hjkl); Down / j drops the piece.
pub fn key_to_input(key: KeyEvent) -> Input {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = key;
    if kind != KeyEventKind::Press {
        return Input::None;
    }
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Input::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Input::None;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('p' | 'P') => Input::TogglePause,
        KeyCode::Enter => Input::Restart,
        KeyCode::Left | KeyCode::Char('h') => Input::Command(Command::Left),
        KeyCode::Right | KeyCode::Char('l') => Input::Command(Command::Right),
        KeyCode::Up | KeyCode::Char('k') => Input::Command(Command::Rotate),
        KeyCode::Down | KeyCode::Char('j') => Input::Command(Command::Drop),
        _ => Input::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one frame's worth of inputs in arrival order.
///
/// Movement commands just overwrite the pending one, so the last wins. Pause
/// and quit take effect immediately. A successful restart discards whatever
/// was still buffered behind it.
pub fn dispatch<I>(state: &mut GameState, inputs: I, now: Instant) -> Flow
where
    I: IntoIterator<Item = Input>,
{
    for input in inputs {
        match input {
            Input::Quit => return Flow::Quit,
            Input::TogglePause => state.toggle_pause(),
            Input::Command(command) => state.queue_command(command),
            Input::Restart => {
                if state.restart(now) {
                    break;
                }
            }
            Input::None => {}
        }
    }
    Flow::Continue
}
