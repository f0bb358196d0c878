//! Synthetic sync signal of 1080p video.
//!
//! Every frame opens with a train of wide vertical sync pulses, followed by
//! narrow horizontal ones for the rest of the lines.

use crate::line_counter::SyncEvent;

pub const LINES_PER_FRAME: u16 = 1125;
pub const VSYNC_PULSES_PER_FRAME: u16 = 5;

/// Endless sequence of sync events, one per line.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSignal {
    position: u16,
}

impl FrameSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for FrameSignal {
    type Item = SyncEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = if self.position < VSYNC_PULSES_PER_FRAME {
            SyncEvent::vertical()
        } else {
            SyncEvent::horizontal()
        };
        self.position = (self.position + 1) % LINES_PER_FRAME;
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_starts_with_vertical_train() {
        let frame: Vec<SyncEvent> = FrameSignal::new().take(6).collect();
        assert!(frame[..5].iter().all(|e| e.still_high));
        assert!(!frame[5].still_high);
    }

    #[test]
    fn frames_repeat_after_all_lines() {
        let vertical = FrameSignal::new()
            .take(2 * usize::from(LINES_PER_FRAME))
            .filter(|e| e.still_high)
            .count();
        assert_eq!(vertical, 2 * usize::from(VSYNC_PULSES_PER_FRAME));
        let second_frame = FrameSignal::new()
            .nth(usize::from(LINES_PER_FRAME))
            .unwrap();
        assert!(second_frame.still_high);
    }
}
