use std::future;
use std::pin::Pin;
use std::time::Duration as StdDuration;

use chrono::TimeDelta;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::debug;

use crate::error::{EXIT_CANCELLED, EXIT_EXPIRED, Result};
use crate::input::Key;
use crate::render::{Renderer, format_duration};
use crate::surface::Surface;

const TICK: StdDuration = StdDuration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub value: TimeDelta,
    pub direction: Direction,
    /// False only while paused.
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Tick,
    Expiry,
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Expired,
    Cancelled,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Expired => EXIT_EXPIRED,
            Outcome::Cancelled => EXIT_CANCELLED,
        }
    }
}

pub struct Countdown {
    state: TimerState,
    duration: TimeDelta,
    renderer: Renderer,
    keys: mpsc::UnboundedReceiver<Key>,
    ticker: Option<Interval>,
    expiry: Option<Pin<Box<Sleep>>>,
}

impl Countdown {
    pub fn new(
        duration: TimeDelta,
        direction: Direction,
        keys: mpsc::UnboundedReceiver<Key>,
    ) -> Self {
        let value = match direction {
            Direction::Down => duration,
            Direction::Up => TimeDelta::zero(),
        };
        Countdown {
            state: TimerState {
                value,
                direction,
                running: true,
            },
            duration,
            // counting up, the widest string is the one shown at expiry
            renderer: Renderer::reserving(&format_duration(duration)),
            keys,
            ticker: None,
            expiry: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub async fn run<S: Surface>(mut self, surface: &mut S) -> Result<Outcome> {
        self.start(self.duration);
        self.draw(surface)?;

        loop {
            let event = self.next_event().await;
            if let Some(outcome) = self.dispatch(event, surface)? {
                debug!(?outcome, "countdown finished");
                return Ok(outcome);
            }
        }
    }

    async fn next_event(&mut self) -> Event {
        tokio::select! {
            biased;
            key = self.keys.recv() => key.map_or(Event::InputClosed, Event::Key),
            () = next_tick(&mut self.ticker) => Event::Tick,
            () = next_expiry(&mut self.expiry) => Event::Expiry,
        }
    }

    fn dispatch<S: Surface>(&mut self, event: Event, surface: &mut S) -> Result<Option<Outcome>> {
        match event {
            Event::Key(Key::Escape | Key::Interrupt) => return Ok(Some(Outcome::Cancelled)),
            Event::Key(Key::Char(c)) => match c.to_ascii_lowercase() {
                'p' => {
                    self.stop();
                    self.state.running = false;
                    debug!(value = %self.state.value, "paused");
                }
                'c' => {
                    // re-armed from the tracked value, not the wall-clock remainder
                    self.start(self.state.value);
                    self.state.running = true;
                    debug!(value = %self.state.value, "resumed");
                }
                _ => {}
            },
            Event::Key(Key::Other) => {}
            Event::Tick => {
                let step = TimeDelta::seconds(1);
                match self.state.direction {
                    Direction::Up => self.state.value += step,
                    Direction::Down => self.state.value -= step,
                }
                self.draw(surface)?;
            }
            Event::Expiry => return Ok(Some(Outcome::Expired)),
            Event::InputClosed => return Ok(Some(Outcome::Cancelled)),
        }
        Ok(None)
    }

    fn start(&mut self, d: TimeDelta) {
        let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);
        self.expiry = Some(Box::pin(time::sleep(d.to_std().unwrap_or_default())));
    }

    fn stop(&mut self) {
        self.ticker = None;
        self.expiry = None;
    }

    fn draw<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        self.renderer.draw(surface, &format_duration(self.state.value))
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}

async fn next_expiry(expiry: &mut Option<Pin<Box<Sleep>>>) {
    match expiry {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
