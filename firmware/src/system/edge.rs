//! Sync edges of the incoming signal.
//!
//! An external comparator compares the signal against a reference driven by
//! the DAC on CV output 1. Its output is wired to pin D7, which serves as:
//!
//! * the H-Sync output, as is,
//! * the external trigger of the gate timer (TIM3_ETR),
//! * EXTI line 2, raising the `EXTI2` interrupt on each rising edge,
//! * the level sampled by the handler.

use syncsep_control::{SyncEvent, Threshold};

use crate::system::hal::dac::{self, DacExt};
use crate::system::hal::gpio::{self, Edge, ExtiPin};
use crate::system::hal::pac::{self, DAC, EXTI, SYSCFG};
use crate::system::hal::rcc::rec;
use crate::system::hal::traits::DacOut;

/// The level is sampled this long after the edge. Horizontal pulses are
/// over by then, pulses of the vertical sync train are not.
pub const SAMPLE_DELAY_US: u32 = 10;

const SAMPLE_DELAY_CYCLES: u32 = 480_000_000 / 1_000_000 * SAMPLE_DELAY_US;

/// CV output 1 spans 0 to 5 V over the full range of the 12-bit DAC.
pub const CV_OUT_FULL_SCALE_MILLIVOLTS: u16 = 5000;
const DAC_BITS: u32 = 12;

const SIGNAL_PIN: u32 = 2;

pub struct EdgeSource {
    signal: SignalPin,
    _threshold: ThresholdDac,
}

pub struct Pins {
    pub signal: SignalPin,
    pub threshold: ThresholdPin,
}

pub type SignalPin = gpio::gpiod::PD2<gpio::Alternate<2>>;
pub type ThresholdPin = gpio::gpioa::PA4<gpio::Analog>;
type ThresholdDac = dac::C1<DAC, dac::Enabled>;

impl EdgeSource {
    /// Set the comparator reference and start listening to its edges.
    ///
    /// # Panics
    ///
    /// Panics if the threshold does not fit the range of the DAC.
    #[must_use]
    pub fn new(
        dac: DAC,
        dac_rec: rec::Dac12,
        exti: &mut EXTI,
        syscfg: &mut SYSCFG,
        mut pins: Pins,
        threshold: Threshold,
    ) -> Self {
        let code = defmt::unwrap!(threshold.dac_code(CV_OUT_FULL_SCALE_MILLIVOLTS, DAC_BITS));
        let mut reference = dac.dac(pins.threshold, dac_rec).enable();
        reference.set_value(code);
        defmt::info!(
            "Sync threshold set to {} mV, DAC code={}",
            threshold.millivolts(),
            code
        );

        pins.signal.make_interrupt_source(syscfg);
        pins.signal.trigger_on_edge(exti, Edge::Rising);
        pins.signal.enable_interrupt(exti);

        Self {
            signal: pins.signal,
            _threshold: reference,
        }
    }

    /// Current output of the comparator.
    #[must_use]
    pub fn level(&self) -> bool {
        // The pin is owned by the alternate function, its input register
        // still follows the level.
        let idr = unsafe { (*pac::GPIOD::ptr()).idr.read().bits() };
        idr & (1 << SIGNAL_PIN) != 0
    }

    #[must_use]
    pub fn pending(&self) -> bool {
        self.signal.check_interrupt()
    }

    /// Wait until the wide pulses can be told apart, then sample the level
    /// and acknowledge the edge.
    ///
    /// An edge arriving while sampling is kept pending and raises the
    /// interrupt again.
    pub fn sample(&mut self) -> SyncEvent {
        self.signal.clear_interrupt_pending_bit();
        cortex_m::asm::delay(SAMPLE_DELAY_CYCLES);
        SyncEvent {
            still_high: self.level(),
        }
    }
}
