use syncsep_control::OutputLatch;

use crate::system::hal::gpio;

pub struct VSyncPin {
    pin: Pin,
}

pub type Pin = gpio::gpioc::PC14<gpio::Output>;

impl VSyncPin {
    #[must_use]
    pub fn new(pin: Pin) -> Self {
        Self { pin }
    }

    #[must_use]
    pub fn is_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl OutputLatch for VSyncPin {
    fn set(&mut self, high: bool) {
        self.pin.set_state(high.into());
    }
}
