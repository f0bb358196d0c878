pub mod edge;
pub mod gate;
pub mod vsync;

pub use daisy::hal;

use daisy::led::LedUser;
use hal::pac::CorePeripherals;
use hal::pac::Peripherals as DevicePeripherals;
use hal::prelude::*;
use hal::rcc::rec::ResetEnable;
use systick_monotonic::Systick;

use syncsep_control::{Configuration, SyncSeparator};

use edge::{EdgeSource, Pins as EdgePins};
use gate::GateTimer;
use vsync::VSyncPin;

pub type Separator = SyncSeparator<GateTimer, VSyncPin>;

pub struct System {
    pub mono: Systick<1000>,
    pub led_user: LedUser,
    pub edge: EdgeSource,
    pub separator: Separator,
}

impl System {
    /// Initialize system abstraction
    ///
    /// # Panics
    ///
    /// The system can be initialized only once. It panics otherwise. It also
    /// panics when the configuration is invalid.
    #[must_use]
    pub fn init(cp: CorePeripherals, mut dp: DevicePeripherals, configuration: Configuration) -> Self {
        if let Err(error) = configuration.validate() {
            defmt::panic!("Invalid configuration: {}", error);
        }

        let board = daisy::Board::take().unwrap();
        let ccdr = daisy::board_freeze_clocks!(board, dp);
        let pins = daisy::board_split_gpios!(board, ccdr, dp);

        let edge = EdgeSource::new(
            dp.DAC,
            ccdr.peripheral.DAC12,
            &mut dp.EXTI,
            &mut dp.SYSCFG,
            EdgePins {
                signal: pins.GPIO.PIN_D7.into_alternate(),
                threshold: pins.GPIO.PIN_C10.into_analog(),
            },
            configuration.threshold,
        );

        ccdr.peripheral.TIM3.enable();
        let gate = GateTimer::new(
            dp.TIM3,
            pins.GPIO.PIN_D4.into_alternate(),
            ccdr.clocks.timx_ker_ck().raw(),
            &configuration,
        );
        let vsync = VSyncPin::new(pins.GPIO.PIN_B5.into_push_pull_output());
        let separator = SyncSeparator::new(configuration, gate, vsync);

        let mono = Systick::new(cp.SYST, 480_000_000);
        let led_user = daisy::board_split_leds!(pins).USER;

        defmt::info!("System initialized with {}", configuration);

        Self {
            mono,
            led_user,
            edge,
            separator,
        }
    }
}
