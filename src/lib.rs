pub mod countdown;
pub mod duration;
pub mod error;
pub mod input;
pub mod render;
pub mod surface;

use std::io::{self, Write};

use chrono::TimeDelta;

pub use countdown::{Countdown, Direction, Outcome};
pub use duration::parse_duration;
pub use error::{Error, Result};
pub use surface::Terminal;

/// Takes over the terminal and runs the clock until it expires or is cancelled.
pub async fn run(duration: TimeDelta, direction: Direction) -> Result<Outcome> {
    let mut terminal = Terminal::init()?;
    let keys = input::spawn_relay()?;

    let outcome = Countdown::new(duration, direction, keys)
        .run(&mut terminal)
        .await?;
    terminal.close()?;

    finish(outcome, &mut io::stdout())?;
    Ok(outcome)
}

/// Rings the bell on expiry; must run after the terminal is restored.
pub fn finish<W: Write>(outcome: Outcome, out: &mut W) -> Result<()> {
    if outcome == Outcome::Expired {
        out.write_all(b"\x07")?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_rings_bell_once() {
        let mut out = Vec::new();
        finish(Outcome::Expired, &mut out).unwrap();
        assert_eq!(out, b"\x07");
    }

    #[test]
    fn test_cancel_is_silent() {
        let mut out = Vec::new();
        finish(Outcome::Cancelled, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
