use std::thread;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Ctrl-C; raw mode delivers it as a key instead of a signal.
    Interrupt,
    Char(char),
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Esc => Key::Escape,
            KeyCode::Char('c') | KeyCode::Char('C')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Key::Interrupt
            }
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Forwards key presses from a background thread until the receiver is dropped.
pub fn spawn_relay() -> Result<mpsc::UnboundedReceiver<Key>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("input-relay".to_string())
        .spawn(move || relay(tx))?;
    Ok(rx)
}

fn relay(tx: mpsc::UnboundedSender<Key>) {
    loop {
        match event::read() {
            Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.send(Key::from(key)).is_err() {
                    break;
                }
            }
            Ok(_) if tx.is_closed() => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "terminal input failed");
                break;
            }
        }
    }
    debug!("input relay stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Key {
        Key::from(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_escape() {
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Key::Escape);
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Key::Interrupt);
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::NONE), Key::Char('c'));
        assert_eq!(key(KeyCode::Char('P'), KeyModifiers::SHIFT), Key::Char('P'));
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), Key::Other);
        assert_eq!(key(KeyCode::F(1), KeyModifiers::NONE), Key::Other);
    }
}
