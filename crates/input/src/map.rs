//! Key mapping from terminal events to board commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    CursorLeft,
    CursorRight,
    /// Select / deselect / swap with the selection, like a touch tap.
    Tap,
    /// Swap the tile under the cursor with its left neighbour.
    SwapLeft,
    /// Swap the tile under the cursor with its right neighbour.
    SwapRight,
    /// Start a timed round.
    StartRound,
    /// Fresh board in the current mode.
    Restart,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::CursorLeft => "cursor_left",
            Command::CursorRight => "cursor_right",
            Command::Tap => "tap",
            Command::SwapLeft => "swap_left",
            Command::SwapRight => "swap_right",
            Command::StartRound => "start_round",
            Command::Restart => "restart",
        }
    }
}

/// Map keyboard input to commands.
///
/// Arrows and `h`/`l` (or `a`/`d`) move the cursor; with Shift (or the
/// uppercase letter) they swap instead.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Left if shift => Some(Command::SwapLeft),
        KeyCode::Right if shift => Some(Command::SwapRight),
        KeyCode::Char('H') | KeyCode::Char('A') | KeyCode::Char('<') | KeyCode::Char(',') => {
            Some(Command::SwapLeft)
        }
        KeyCode::Char('L') | KeyCode::Char('D') | KeyCode::Char('>') | KeyCode::Char('.') => {
            Some(Command::SwapRight)
        }

        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(Command::CursorLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(Command::CursorRight),

        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Tap),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::StartRound),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_keys() {
        for code in [KeyCode::Left, KeyCode::Char('h'), KeyCode::Char('a')] {
            assert_eq!(map_key(KeyEvent::from(code)), Some(Command::CursorLeft));
        }
        for code in [KeyCode::Right, KeyCode::Char('l'), KeyCode::Char('d')] {
            assert_eq!(map_key(KeyEvent::from(code)), Some(Command::CursorRight));
        }
    }

    #[test]
    fn shifted_keys_swap() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT)),
            Some(Command::SwapLeft)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(Command::SwapRight)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('H'))), Some(Command::SwapLeft));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('.'))), Some(Command::SwapRight));
    }

    #[test]
    fn action_keys() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char(' '))), Some(Command::Tap));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Enter)), Some(Command::Tap));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('s'))), Some(Command::StartRound));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('R'))), Some(Command::Restart));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('q'))), None);
    }
}
