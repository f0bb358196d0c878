#![no_main]
#![no_std]

use syncsep_firmware as _; // global logger + panicking-behavior

#[rtic::app(device = stm32h7xx_hal::pac, peripherals = true, dispatchers = [EXTI0])]
mod app {
    use daisy::led::{Led, LedUser};
    use fugit::ExtU64;
    use systick_monotonic::Systick;

    use syncsep_control::config::PROFILE_1080P;
    use syncsep_firmware::system::edge::EdgeSource;
    use syncsep_firmware::system::{Separator, System};

    #[monotonic(binds = SysTick, default = true)]
    type Mono = Systick<1000>; // 1 kHz / 1 ms granularity

    #[shared]
    struct Shared {
        frame_seen: bool,
    }

    #[local]
    struct Local {
        status_led: LedUser,
        edge: EdgeSource,
        separator: Separator,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("INIT");

        let system = System::init(cx.core, cx.device, PROFILE_1080P);

        status::spawn().unwrap();

        (
            Shared { frame_seen: false },
            Local {
                status_led: system.led_user,
                edge: system.edge,
                separator: system.separator,
            },
            init::Monotonics(system.mono),
        )
    }

    // Must finish well within a single line.
    #[task(binds = EXTI2, local = [edge, separator], shared = [frame_seen], priority = 4)]
    fn sync_edge(mut cx: sync_edge::Context) {
        let event = cx.local.edge.sample();
        let reaction = cx.local.separator.handle(event);
        if reaction.vsync {
            cx.shared.frame_seen.lock(|frame_seen| *frame_seen = true);
        }
    }

    /// Keep the LED lit while frames are coming, blink otherwise.
    #[task(local = [status_led, on: bool = false], shared = [frame_seen])]
    fn status(mut cx: status::Context) {
        let locked = cx.shared.frame_seen.lock(|frame_seen| {
            let seen = *frame_seen;
            *frame_seen = false;
            seen
        });

        *cx.local.on = locked || !*cx.local.on;
        if *cx.local.on {
            cx.local.status_led.on();
        } else {
            cx.local.status_led.off();
        }

        status::spawn_after(200.millis()).unwrap();
    }
}
