//! Timed line gate and plain output abstractions.
//!
//! The separator does not own any peripherals. The firmware hands it
//! implementations of these traits backed by a hardware timer and GPIO,
//! tests hand it software ones.

use crate::config::Configuration;

/// Output that rises a fixed delay after a trigger and falls after a fixed
/// duration, without any further intervention.
pub trait OneShot {
    /// Start a new pulse, superseding the one in flight.
    ///
    /// Implementations triggered directly by the sync edge in hardware may
    /// treat this as a no-op.
    fn arm(&mut self);

    /// While disabled, the output stays inactive and arming has no effect.
    fn set_enabled(&mut self, enabled: bool);

    /// Drive the output inactive right away, regardless of pulse timing.
    fn force_inactive(&mut self);

    /// Suppress pulses of the following triggers, leaving the one in flight
    /// untouched. Enabling lifts the mask.
    fn mask_next(&mut self);

    fn is_enabled(&self) -> bool;
}

/// Output following the last value written into it.
pub trait OutputLatch {
    fn set(&mut self, high: bool);
}

/// Software implementation of the one-shot.
///
/// Call `tick` once per tick of the timer clock. This is meant for targets
/// without a suitable timer, or to model the hardware in tests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftOneShot {
    delay: u32,
    duration: u32,
    enabled: bool,
    masked: bool,
    since_arm: Option<u32>,
}

impl SoftOneShot {
    /// Delay and duration are given in ticks.
    #[must_use]
    pub fn new(delay: u32, duration: u32) -> Self {
        Self {
            delay,
            duration,
            enabled: false,
            masked: false,
            since_arm: None,
        }
    }

    #[must_use]
    pub fn from_configuration(configuration: &Configuration, tick_hz: u32) -> Self {
        Self::new(
            configuration.gate_delay_ticks(tick_hz),
            configuration.gate_duration_ticks(tick_hz),
        )
    }

    pub fn tick(&mut self) {
        if let Some(since_arm) = self.since_arm {
            let since_arm = since_arm + 1;
            self.since_arm = if since_arm < self.end() {
                Some(since_arm)
            } else {
                None
            };
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.since_arm {
            Some(since_arm) => self.enabled && since_arm >= self.delay,
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.since_arm.is_some()
    }

    fn end(&self) -> u32 {
        self.delay.saturating_add(self.duration)
    }
}

impl OneShot for SoftOneShot {
    fn arm(&mut self) {
        if !self.enabled {
            return;
        }
        self.since_arm = if self.masked || self.duration == 0 {
            None
        } else {
            Some(0)
        };
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.masked = false;
        } else {
            self.since_arm = None;
        }
    }

    fn force_inactive(&mut self) {
        self.since_arm = None;
    }

    fn mask_next(&mut self) {
        self.masked = true;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
