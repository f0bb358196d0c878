//! Line gate generated by TIM3 in one-pulse mode.
//!
//! The timer is slaved to the comparator through its external trigger.
//! Every rising edge resets and restarts the counter, so a new line always
//! supersedes the pulse of the previous one. Channel 4 runs in PWM mode 2:
//! inactive until the counter reaches the compare value, active until the
//! end of the gate, where the counter stops.
//!
//! The pulse starts on the edge, about 10 µs before the handler decides
//! about the line. The compare value is preloaded and only takes effect at
//! the next update event, which happens at the end of the pulse or on the
//! next trigger. Setting it past the end of the gate masks the pulses from
//! then on while keeping the one in flight. Forcing the channel inactive
//! takes effect immediately.

use syncsep_control::config::GATE_DELAY_CLOCK_HZ;
use syncsep_control::{Configuration, OneShot};

use crate::system::hal::gpio;
use crate::system::hal::pac::{self, TIM3};

const TICK_HZ: u32 = GATE_DELAY_CLOCK_HZ;

// CR1
const CR1_OPM: u32 = 1 << 3;
const CR1_ARPE: u32 = 1 << 7;
// SMCR
const SMCR_TS_ETRF: u32 = 0b111 << 4;
const SMCR_SMS_RESET_AND_TRIGGER: u32 = 1 << 16;
// CCMR2
const CCMR2_OC4PE: u32 = 1 << 11;
const CCMR2_OC4M_MASK: u32 = (0b111 << 12) | (1 << 24);
const CCMR2_OC4M_PWM_2: u32 = 0b111 << 12;
const CCMR2_OC4M_FORCE_INACTIVE: u32 = 0b100 << 12;
// CCER
const CCER_CC4E: u32 = 1 << 12;
// EGR
const EGR_UG: u32 = 1 << 0;

const OUTPUT_PIN: u32 = 9;

pub struct GateTimer {
    tim: TIM3,
    delay: u32,
    end: u32,
    enabled: bool,
    _pin: Pin,
}

pub type Pin = gpio::gpioc::PC9<gpio::Alternate<2>>;

impl GateTimer {
    /// Configure the timer, keeping the output disabled.
    ///
    /// The peripheral clock of TIM3 must be already enabled and running at
    /// `timer_clock_hz`.
    ///
    /// # Panics
    ///
    /// The timer clock must be an integer multiple of 8 MHz and the delay
    /// must be at least one tick.
    #[must_use]
    pub fn new(tim: TIM3, pin: Pin, timer_clock_hz: u32, configuration: &Configuration) -> Self {
        assert!(timer_clock_hz % TICK_HZ == 0);
        let prescaler = timer_clock_hz / TICK_HZ - 1;
        let delay = configuration.gate_delay_ticks(TICK_HZ);
        let end = delay + configuration.gate_duration_ticks(TICK_HZ);
        assert!(delay > 0);
        assert!(end < 0xFFFF);

        tim.cr1.write(|w| unsafe { w.bits(CR1_OPM | CR1_ARPE) });
        tim.psc.write(|w| unsafe { w.bits(prescaler) });
        tim.arr.write(|w| unsafe { w.bits(end) });
        tim.ccr4.write(|w| unsafe { w.bits(end + 1) });
        tim.smcr
            .write(|w| unsafe { w.bits(SMCR_TS_ETRF | SMCR_SMS_RESET_AND_TRIGGER) });
        tim.ccmr2_output()
            .write(|w| unsafe { w.bits(CCMR2_OC4M_FORCE_INACTIVE | CCMR2_OC4PE) });
        tim.ccer.write(|w| unsafe { w.bits(CCER_CC4E) });
        tim.egr.write(|w| unsafe { w.bits(EGR_UG) });

        defmt::info!(
            "Gate timer prescaler={}, delay={}, end={}",
            prescaler,
            delay,
            end
        );

        Self {
            tim,
            delay,
            end,
            enabled: false,
            _pin: pin,
        }
    }

    /// Whether the following pulses are masked.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        self.tim.ccr4.read().bits() > self.end
    }

    #[must_use]
    pub fn is_forced_inactive(&self) -> bool {
        self.tim.ccmr2_output().read().bits() & CCMR2_OC4M_MASK == CCMR2_OC4M_FORCE_INACTIVE
    }

    /// Level of the gate output pin.
    #[must_use]
    pub fn output_high(&self) -> bool {
        let idr = unsafe { (*pac::GPIOC::ptr()).idr.read().bits() };
        idr & (1 << OUTPUT_PIN) != 0
    }

    fn set_output_mode(&mut self, mode: u32) {
        self.tim
            .ccmr2_output()
            .modify(|r, w| unsafe { w.bits((r.bits() & !CCMR2_OC4M_MASK) | mode) });
    }

    fn set_compare(&mut self, value: u32) {
        self.tim.ccr4.write(|w| unsafe { w.bits(value) });
    }
}

impl OneShot for GateTimer {
    // The counter is restarted by the comparator itself.
    fn arm(&mut self) {}

    fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        if enabled {
            // The compare value in effect stays masked until the pulse in
            // flight ends, so enabling never raises the output mid-line.
            self.set_compare(self.delay);
            self.set_output_mode(CCMR2_OC4M_PWM_2);
        } else {
            self.set_compare(self.end + 1);
            self.set_output_mode(CCMR2_OC4M_FORCE_INACTIVE);
        }
        self.enabled = enabled;
    }

    fn force_inactive(&mut self) {
        self.set_output_mode(CCMR2_OC4M_FORCE_INACTIVE);
    }

    fn mask_next(&mut self) {
        self.set_compare(self.end + 1);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
