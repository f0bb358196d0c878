//! Calibration of the separator for a single video timing profile.

use core::fmt;

/// Highest reference the comparator can be given.
pub const THRESHOLD_MAX_MILLIVOLTS: u16 = 5000;

/// The gate delay is counted in cycles of this clock.
pub const GATE_DELAY_CLOCK_HZ: u32 = 8_000_000;

/// The gate duration is counted in cycles of this clock.
pub const GATE_DURATION_CLOCK_HZ: u32 = 2_000_000;

/// Timing profile of the separator.
///
/// All values are fixed for the lifetime of the process. The defaults are
/// calibrated for 1080p component video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    /// Reference the incoming signal is compared against.
    pub threshold: Threshold,
    /// Cycles of `GATE_DELAY_CLOCK_HZ` between the sync edge and gate
    /// assertion.
    pub gate_delay: u16,
    /// Cycles of `GATE_DURATION_CLOCK_HZ` the gate stays asserted.
    pub gate_duration: u16,
    /// Lines carrying visible video, counted from the vertical sync.
    pub visible_lines: LineWindow,
}

pub const PROFILE_1080P: Configuration = Configuration {
    // One step of a 32 step ladder over 5 V.
    threshold: Threshold::from_millivolts(156),
    // The video starts ~3 us after the sync pulse, counting includes the
    // edge detection latency.
    gate_delay: 7,
    // ~28.5 us, covering the ~26 us of picture of each line.
    gate_duration: 57,
    visible_lines: LineWindow::new(35, 1115),
};

impl Default for Configuration {
    fn default() -> Self {
        PROFILE_1080P
    }
}

impl Configuration {
    /// Check that the profile can drive the hardware.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint. The window must not be empty,
    /// the gate must last at least one cycle and the threshold must be within
    /// the reference range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.visible_lines.min > self.visible_lines.max {
            return Err(ConfigurationError::EmptyWindow {
                min: self.visible_lines.min,
                max: self.visible_lines.max,
            });
        }
        if self.gate_duration == 0 {
            return Err(ConfigurationError::ZeroGateDuration);
        }
        if self.threshold.millivolts() > THRESHOLD_MAX_MILLIVOLTS {
            return Err(ConfigurationError::ThresholdOutOfRange(
                self.threshold.millivolts(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn gate_delay_ns(&self) -> u32 {
        cycles_to_ticks(self.gate_delay, GATE_DELAY_CLOCK_HZ, 1_000_000_000)
    }

    #[must_use]
    pub fn gate_duration_ns(&self) -> u32 {
        cycles_to_ticks(self.gate_duration, GATE_DURATION_CLOCK_HZ, 1_000_000_000)
    }

    /// Gate delay in ticks of a timer running at `tick_hz`.
    #[must_use]
    pub fn gate_delay_ticks(&self, tick_hz: u32) -> u32 {
        cycles_to_ticks(self.gate_delay, GATE_DELAY_CLOCK_HZ, tick_hz)
    }

    /// Gate duration in ticks of a timer running at `tick_hz`.
    #[must_use]
    pub fn gate_duration_ticks(&self, tick_hz: u32) -> u32 {
        cycles_to_ticks(self.gate_duration, GATE_DURATION_CLOCK_HZ, tick_hz)
    }
}

fn cycles_to_ticks(cycles: u16, clock_hz: u32, tick_hz: u32) -> u32 {
    (u64::from(cycles) * u64::from(tick_hz) / u64::from(clock_hz)) as u32
}

/// Comparator reference voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threshold(u16);

impl Threshold {
    #[must_use]
    pub const fn from_millivolts(millivolts: u16) -> Self {
        Self(millivolts)
    }

    #[must_use]
    pub const fn millivolts(self) -> u16 {
        self.0
    }

    /// Code of a DAC with the given full scale producing the closest
    /// voltage.
    ///
    /// Returns `None` when the threshold is out of the DAC range.
    #[must_use]
    pub fn dac_code(self, full_scale_millivolts: u16, resolution_bits: u32) -> Option<u16> {
        if self.0 > full_scale_millivolts || full_scale_millivolts == 0 {
            return None;
        }
        let max_code = (1_u32 << resolution_bits) - 1;
        let full_scale = u32::from(full_scale_millivolts);
        let code = (u32::from(self.0) * max_code + full_scale / 2) / full_scale;
        Some(code as u16)
    }
}

/// Inclusive range of line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineWindow {
    pub min: u16,
    pub max: u16,
}

impl LineWindow {
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(&self, line: u16) -> bool {
        line >= self.min && line <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    EmptyWindow { min: u16, max: u16 },
    ZeroGateDuration,
    ThresholdOutOfRange(u16),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWindow { min, max } => {
                write!(f, "visible line window {min}..={max} is empty")
            }
            Self::ZeroGateDuration => write!(f, "gate duration must be at least one cycle"),
            Self::ThresholdOutOfRange(millivolts) => write!(
                f,
                "threshold {millivolts} mV is above {THRESHOLD_MAX_MILLIVOLTS} mV"
            ),
        }
    }
}
