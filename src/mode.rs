//! The engineer/designer mode toggle.
//!
//! The site presents one person two ways. Exactly one [`Mode`] is active at a
//! time; switching runs a short, fixed overlay sequence:
//!
//! ```text
//!   request ──► Entering (350ms) ──► Holding (80ms) ──► Exiting (350ms) ──► Idle
//!                              ▲ mode flips here
//! ```
//!
//! A request that arrives while a sequence is running is ignored rather than
//! queued. Nothing is persisted: every page load starts from the configured
//! default mode.
//!
//! [`ModeToggle`] is a pure state machine driven by caller-supplied
//! timestamps. It is the reference model for the browser: the generator
//! seeds each page's initial mode and [`TransitionTimings`] from a toggle,
//! and the embedded page script replays the same request/tick sequence
//! against those data attributes.

use crate::types::ProjectType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Engineer,
    #[default]
    Designer,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Engineer => Mode::Designer,
            Mode::Designer => Mode::Engineer,
        }
    }

    /// Which projects this persona showcases.
    pub fn project_type(self) -> ProjectType {
        match self {
            Mode::Engineer => ProjectType::Engineering,
            Mode::Designer => ProjectType::Design,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Engineer => "engineer",
            Mode::Designer => "designer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase durations of the switch overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub enter: Duration,
    pub hold: Duration,
    pub exit: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(350),
            hold: Duration::from_millis(80),
            exit: Duration::from_millis(350),
        }
    }
}

impl TransitionTimings {
    pub fn total(&self) -> Duration {
        self.enter + self.hold + self.exit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Entering,
    Holding,
    Exiting,
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A transition towards this mode has started.
    Started(Mode),
    /// A transition was already running; nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ModeToggle {
    mode: Mode,
    timings: TransitionTimings,
    in_flight: Option<InFlight>,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    started_at: Duration,
    target: Mode,
}

impl ModeToggle {
    pub fn new(initial: Mode) -> Self {
        Self::with_timings(initial, TransitionTimings::default())
    }

    pub fn with_timings(initial: Mode, timings: TransitionTimings) -> Self {
        Self {
            mode: initial,
            timings,
            in_flight: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ask to switch to the other mode at time `now`.
    pub fn request(&mut self, now: Duration) -> Request {
        if self.in_flight.is_some() {
            return Request::Ignored;
        }
        let target = self.mode.toggled();
        self.in_flight = Some(InFlight {
            started_at: now,
            target,
        });
        Request::Started(target)
    }

    /// Advance to time `now` and report the current phase.
    ///
    /// The mode flips once `enter` has elapsed; the toggle accepts new
    /// requests again once the whole sequence has elapsed.
    pub fn tick(&mut self, now: Duration) -> Phase {
        let Some(flight) = self.in_flight else {
            return Phase::Idle;
        };
        let elapsed = now.saturating_sub(flight.started_at);
        let t = self.timings;

        if elapsed >= t.enter {
            self.mode = flight.target;
        }
        if elapsed >= t.total() {
            self.in_flight = None;
            Phase::Idle
        } else if elapsed >= t.enter + t.hold {
            Phase::Exiting
        } else if elapsed >= t.enter {
            Phase::Holding
        } else {
            Phase::Entering
        }
    }
}

impl Default for ModeToggle {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}
