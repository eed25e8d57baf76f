//! Countdown clocks
//!
//! A [`Clock`] does not own a timer. It is an explicit scheduled task: the host either calls
//! [`Clock::tick()`] from its own fixed-rate timer, or calls [`Clock::poll()`] from its event
//! loop, and the clock fires every tick that is due. A tick on a clock which is not running is a
//! no-op, so [`Clock::cancel()`] takes effect immediately.

use crate::types::Side;

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use thiserror::Error;

#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum ClockConfigError {
    #[error("time limit must be positive")]
    ZeroTimeLimit,
    #[error("tick interval must be positive")]
    ZeroTickInterval,
}

/// Clock settings
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClockConfig {
    /// Time given on each [`Clock::start()`]
    pub time_limit: Duration,
    /// Amount of time removed by one tick
    pub tick_interval: Duration,
}

impl ClockConfig {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10 * 60);
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

    pub const fn with_time_limit(time_limit: Duration) -> ClockConfig {
        ClockConfig {
            time_limit,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<(), ClockConfigError> {
        if self.time_limit.is_zero() {
            return Err(ClockConfigError::ZeroTimeLimit);
        }
        if self.tick_interval.is_zero() {
            return Err(ClockConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> ClockConfig {
        ClockConfig::with_time_limit(Self::DEFAULT_TIME_LIMIT)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClockState {
    Idle,
    Running,
    Expired,
}

/// What a single tick did
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClockEvent {
    /// Time was consumed, but some is still left
    Tick(Duration),
    /// Time ran out
    Expired,
}

/// Formats `d` as `MM:SS`, dropping the fractional seconds
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

type TickFn = Box<dyn FnMut(Duration)>;
type ExpireFn = Box<dyn FnMut()>;

/// Single-player countdown clock
///
/// # Example
///
/// ```
/// # use std::time::Duration;
/// # use tapchess::clock::{Clock, ClockEvent, ClockState};
/// #
/// let mut clock = Clock::new(Duration::from_secs(3));
/// clock.start();
/// assert_eq!(clock.tick(), Some(ClockEvent::Tick(Duration::from_secs(2))));
/// assert_eq!(clock.formatted_time(), "00:02");
/// clock.cancel();
/// assert_eq!(clock.tick(), None);
/// assert_eq!(clock.state(), ClockState::Idle);
/// assert_eq!(clock.remaining(), Duration::from_secs(2));
/// ```
pub struct Clock {
    config: ClockConfig,
    remaining: Duration,
    state: ClockState,
    deadline: Option<Instant>,
    on_tick: Option<TickFn>,
    on_expire: Option<ExpireFn>,
}

impl Clock {
    /// Creates an idle clock with the given time limit and a one second tick
    ///
    /// A zero limit is allowed here and makes the clock expire on its first tick.
    pub fn new(time_limit: Duration) -> Clock {
        Clock::from_valid_config(ClockConfig::with_time_limit(time_limit))
    }

    pub fn with_config(config: ClockConfig) -> Result<Clock, ClockConfigError> {
        config.validate()?;
        Ok(Clock::from_valid_config(config))
    }

    fn from_valid_config(config: ClockConfig) -> Clock {
        Clock {
            config,
            remaining: config.time_limit,
            state: ClockState::Idle,
            deadline: None,
            on_tick: None,
            on_expire: None,
        }
    }

    /// Sets the callback invoked with the remaining time after each tick that doesn't expire
    /// the clock
    pub fn on_tick(mut self, f: impl FnMut(Duration) + 'static) -> Clock {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Sets the callback invoked once when the time runs out
    pub fn on_expire(mut self, f: impl FnMut() + 'static) -> Clock {
        self.on_expire = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    #[inline]
    pub fn limit(&self) -> Duration {
        self.config.time_limit
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[inline]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.state == ClockState::Expired
    }

    /// Returns the instant at which the next tick is due
    ///
    /// `None` if the clock is not running, or if the tick interval reaches past the range of
    /// [`Instant`]. Such a clock is only driven by [`Clock::tick()`].
    #[inline]
    pub fn next_tick_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Starts the countdown from the full time limit
    ///
    /// Does the same as [`Clock::start_at()`] with the current instant.
    pub fn start(&mut self) {
        self.start_at(Instant::now())
    }

    /// Starts the countdown from the full time limit, with the first tick due one interval after
    /// `now`
    ///
    /// A countdown which is already in progress is cancelled first.
    pub fn start_at(&mut self, now: Instant) {
        if self.is_running() {
            self.cancel();
        }
        self.remaining = self.config.time_limit;
        self.state = ClockState::Running;
        // An interval too long to represent as an `Instant` never comes due.
        self.deadline = now.checked_add(self.config.tick_interval);
        debug!("clock started with {}", format_time(self.remaining));
    }

    /// Stops the countdown, keeping the remaining time
    ///
    /// Does nothing unless the clock is running. No callback fires after this returns.
    pub fn cancel(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = ClockState::Idle;
        self.deadline = None;
        debug!("clock cancelled at {}", format_time(self.remaining));
    }

    /// Stops the clock and restores the full time limit
    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.deadline = None;
        self.remaining = self.config.time_limit;
    }

    /// Consumes one tick interval
    ///
    /// Returns `None` if the clock is not running. Otherwise, invokes either the tick callback or,
    /// when the remaining time reaches zero, the expiry callback.
    pub fn tick(&mut self) -> Option<ClockEvent> {
        if !self.is_running() {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(self.config.tick_interval);
        if self.remaining.is_zero() {
            self.state = ClockState::Expired;
            self.deadline = None;
            info!("clock expired");
            if let Some(f) = self.on_expire.as_mut() {
                f();
            }
            return Some(ClockEvent::Expired);
        }
        self.deadline = self
            .deadline
            .and_then(|d| d.checked_add(self.config.tick_interval));
        trace!("clock tick, {} left", format_time(self.remaining));
        if let Some(f) = self.on_tick.as_mut() {
            f(self.remaining);
        }
        Some(ClockEvent::Tick(self.remaining))
    }

    /// Fires one tick if it is due by `now`
    pub fn tick_if_due(&mut self, now: Instant) -> Option<ClockEvent> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.tick(),
            _ => None,
        }
    }

    /// Fires all the ticks that are due by `now` and returns how many fired
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while self.tick_if_due(now).is_some() {
            fired += 1;
        }
        fired
    }

    /// Returns the remaining time as `MM:SS`
    pub fn formatted_time(&self) -> String {
        format_time(self.remaining)
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("Clock")
            .field("config", &self.config)
            .field("remaining", &self.remaining)
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// Pair of clocks, one per side, with at most one of them running
///
/// The active side is the one whose clock is running, so it stays correct when a host cancels a
/// clock directly through [`ChessClock::get_mut()`].
#[derive(Debug)]
pub struct ChessClock {
    clocks: [Clock; 2],
}

impl ChessClock {
    pub fn new(config: ClockConfig) -> Result<ChessClock, ClockConfigError> {
        Ok(ChessClock::from_clocks(
            Clock::with_config(config)?,
            Clock::with_config(config)?,
        ))
    }

    /// Combines two clocks, e.g. with callbacks already attached
    ///
    /// Both clocks are reset.
    pub fn from_clocks(mut white: Clock, mut black: Clock) -> ChessClock {
        white.reset();
        black.reset();
        ChessClock {
            clocks: [white, black],
        }
    }

    #[inline]
    pub fn get(&self, s: Side) -> &Clock {
        &self.clocks[s.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, s: Side) -> &mut Clock {
        &mut self.clocks[s.index()]
    }

    /// Returns the side whose clock is running
    pub fn active(&self) -> Option<Side> {
        Side::iter().find(|s| self.get(*s).is_running())
    }

    pub fn switch_to(&mut self, s: Side) {
        self.switch_to_at(s, Instant::now())
    }

    /// Cancels the clock of the opponent of `s`, then starts the clock of `s`
    pub fn switch_to_at(&mut self, s: Side, now: Instant) {
        self.get_mut(s.inv()).cancel();
        self.get_mut(s).start_at(now);
        debug!("clock switched to {}", s.as_long_str());
    }

    /// Cancels both clocks
    pub fn stop(&mut self) {
        for clock in &mut self.clocks {
            clock.cancel();
        }
    }

    /// Resets both clocks to idle with full time
    pub fn reset(&mut self) {
        for clock in &mut self.clocks {
            clock.reset();
        }
    }

    /// Ticks the running clock, if any
    pub fn tick(&mut self) -> Option<(Side, ClockEvent)> {
        let side = self.active()?;
        let event = self.get_mut(side).tick()?;
        Some((side, event))
    }

    /// Ticks the running clock if its next tick is due by `now`
    pub fn tick_if_due(&mut self, now: Instant) -> Option<(Side, ClockEvent)> {
        let side = self.active()?;
        let event = self.get_mut(side).tick_if_due(now)?;
        Some((side, event))
    }
}
