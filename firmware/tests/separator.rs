#![no_std]
#![no_main]

use syncsep_firmware as _; // memory layout + panic handler

#[defmt_test::tests]
mod tests {
    use syncsep_control::config::PROFILE_1080P;
    use syncsep_control::{OneShot, SyncEvent};
    use syncsep_firmware::system::{Separator, System};

    #[init]
    fn init() -> Separator {
        let cp = cortex_m::Peripherals::take().unwrap();
        let dp = daisy::pac::Peripherals::take().unwrap();

        System::init(cp, dp, PROFILE_1080P).separator
    }

    #[test]
    fn vsync_output_follows_the_first_pulse_of_the_train(separator: &mut Separator) {
        const MS: u32 = 480_000_000 / 1000;

        defmt::info!("Connect a scope to the V-Sync output, expect 4 pulses of 100 ms");
        for _ in 0..4 {
            for _ in 0..10 {
                separator.handle(SyncEvent::horizontal());
            }
            separator.handle(SyncEvent::vertical());
            defmt::assert!(separator.vsync());
            cortex_m::asm::delay(100 * MS);

            separator.handle(SyncEvent::vertical());
            defmt::assert!(!separator.vsync());
            cortex_m::asm::delay(900 * MS);
        }
    }

    #[test]
    fn gate_is_disabled_outside_of_visible_lines(separator: &mut Separator) {
        separator.handle(SyncEvent::vertical());
        for _ in 0..34 {
            separator.handle(SyncEvent::horizontal());
        }
        defmt::assert!(!separator.gate().is_enabled());
        defmt::assert!(separator.gate().is_forced_inactive());
        defmt::assert!(separator.gate().is_masked());

        separator.handle(SyncEvent::horizontal());
        defmt::assert!(separator.gate().is_enabled());
        defmt::assert!(!separator.gate().is_forced_inactive());
        defmt::assert!(!separator.gate().is_masked());

        for _ in 35..1115 {
            separator.handle(SyncEvent::horizontal());
        }
        defmt::assert_eq!(separator.line(), 1115);
        defmt::assert!(separator.gate().is_enabled());
        defmt::assert!(!separator.gate().is_forced_inactive());
        defmt::assert!(separator.gate().is_masked());

        separator.handle(SyncEvent::horizontal());
        defmt::assert!(!separator.gate().is_enabled());
        defmt::assert!(separator.gate().is_forced_inactive());
    }
}
