use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::shared::InputEvent;

// poll for one key press and resolve it into input events for the middle layer
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code).into_iter().collect());
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,
        KeyCode::Char(' ') => InputEvent::TogglePlay,

        // editor cursor
        KeyCode::Left | KeyCode::Char('h') => InputEvent::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => InputEvent::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => InputEvent::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => InputEvent::CursorDown,
        KeyCode::Enter | KeyCode::Char('t') => InputEvent::ToggleCell,
        KeyCode::Backspace => InputEvent::ClearPattern,
        KeyCode::Char(c @ '1'..='8') => InputEvent::SelectPattern(c as u8 - b'1'),

        // playlist
        KeyCode::Char('a') => InputEvent::AppendToPlaylist,
        KeyCode::Char('[') => InputEvent::PlaylistSelectPrev,
        KeyCode::Char(']') => InputEvent::PlaylistSelectNext,
        KeyCode::Char('u') => InputEvent::PlaylistMoveUp,
        KeyCode::Char('d') => InputEvent::PlaylistMoveDown,
        KeyCode::Char('r') => InputEvent::PlaylistRemove,

        // pads
        KeyCode::Char('z') => InputEvent::TriggerPad(0),
        KeyCode::Char('x') => InputEvent::TriggerPad(1),
        KeyCode::Char('c') => InputEvent::TriggerPad(2),
        KeyCode::Char('v') => InputEvent::TriggerPad(3),

        _ => return None,
    };
    Some(event)
}
