use std::io;

use thiserror::Error;

pub const EXIT_EXPIRED: u8 = 0;
pub const EXIT_CANCELLED: u8 = 1;
pub const EXIT_INVALID_DURATION: u8 = 2;
pub const EXIT_TERMINAL: u8 = 3;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid duration or kitchen time: {0}")]
    InvalidDuration(String),

    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidDuration(_) => EXIT_INVALID_DURATION,
            Error::TerminalInit(_) | Error::Terminal(_) => EXIT_TERMINAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_duration_message_carries_input() {
        let err = Error::InvalidDuration("abcxyz".to_string());
        assert_eq!(err.to_string(), "invalid duration or kitchen time: abcxyz");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_terminal_errors_are_distinct_from_input_errors() {
        let init = Error::TerminalInit(io::Error::other("no tty"));
        let io = Error::from(io::Error::other("broken pipe"));
        assert_eq!(init.exit_code(), EXIT_TERMINAL);
        assert_eq!(io.exit_code(), EXIT_TERMINAL);
        assert_ne!(init.exit_code(), EXIT_CANCELLED);
    }
}
