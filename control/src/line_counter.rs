//! Classification of sync pulses and counting of lines within a frame.

use crate::config::LineWindow;

/// Vertical pulse only marks a new frame when more lines than this were
/// counted since the previous one. This suppresses the remaining pulses of
/// the vertical sync train.
pub const VSYNC_DEBOUNCE_LINES: u16 = 5;

/// A rising edge of the sync signal.
///
/// The comparator is sampled a fixed time after the edge. Horizontal sync
/// pulses are narrow and already over by then, vertical ones are wider and
/// the signal is still high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncEvent {
    pub still_high: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    Horizontal,
    Vertical,
}

impl SyncEvent {
    #[must_use]
    pub const fn horizontal() -> Self {
        Self { still_high: false }
    }

    #[must_use]
    pub const fn vertical() -> Self {
        Self { still_high: true }
    }

    #[must_use]
    pub const fn classify(self) -> Pulse {
        if self.still_high {
            Pulse::Vertical
        } else {
            Pulse::Horizontal
        }
    }
}

/// Result of a single transition of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineReaction {
    pub pulse: Pulse,
    pub line: u16,
    pub vsync: bool,
    pub visible: bool,
}

/// Counts horizontal pulses since the last vertical sync.
///
/// Feed it with every sync event, in the order they arrived. The counter
/// saturates, so a signal that never carries a vertical sync keeps the
/// line outside of any window instead of wrapping back into it.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineCounter {
    line: u16,
    vsync: bool,
}

impl LineCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, event: SyncEvent, window: LineWindow) -> LineReaction {
        let pulse = event.classify();
        match pulse {
            Pulse::Vertical => {
                // Only the first pulse of the train follows a scanned region.
                // The rest arrive with the counter just reset.
                self.vsync = self.line > VSYNC_DEBOUNCE_LINES;
                self.line = 0;
            }
            Pulse::Horizontal => {
                self.vsync = false;
                self.line = self.line.saturating_add(1);
            }
        }
        LineReaction {
            pulse,
            line: self.line,
            vsync: self.vsync,
            visible: window.contains(self.line),
        }
    }

    #[must_use]
    pub fn line(&self) -> u16 {
        self.line
    }

    #[must_use]
    pub fn vsync(&self) -> bool {
        self.vsync
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::PROFILE_1080P;

    const WINDOW: LineWindow = PROFILE_1080P.visible_lines;

    fn feed(counter: &mut LineCounter, event: SyncEvent, times: usize) -> Vec<LineReaction> {
        (0..times).map(|_| counter.process(event, WINDOW)).collect()
    }

    #[test]
    fn when_pulse_is_still_high_it_is_classified_as_vertical() {
        assert_eq!(SyncEvent::vertical().classify(), Pulse::Vertical);
        assert_eq!(SyncEvent::horizontal().classify(), Pulse::Horizontal);
    }

    #[test]
    fn horizontal_pulse_increments_the_line() {
        let mut counter = LineCounter::new();
        let lines: Vec<u16> = feed(&mut counter, SyncEvent::horizontal(), 3)
            .iter()
            .map(|r| r.line)
            .collect();
        assert_eq!(lines, [1, 2, 3]);
    }

    #[test]
    fn vertical_pulse_resets_the_line() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 10);
        let reaction = counter.process(SyncEvent::vertical(), WINDOW);
        assert_eq!(reaction.line, 0);
        assert_eq!(counter.line(), 0);
    }

    #[test]
    fn when_vertical_pulse_follows_more_than_five_lines_it_sets_vsync() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 6);
        assert!(counter.process(SyncEvent::vertical(), WINDOW).vsync);
    }

    #[test]
    fn when_vertical_pulse_follows_exactly_five_lines_it_is_suppressed() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 5);
        assert!(!counter.process(SyncEvent::vertical(), WINDOW).vsync);
    }

    #[test]
    fn horizontal_pulse_clears_vsync() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 100);
        counter.process(SyncEvent::vertical(), WINDOW);
        assert!(counter.vsync());
        assert!(!counter.process(SyncEvent::horizontal(), WINDOW).vsync);
        assert!(!counter.vsync());
    }

    #[test]
    fn vsync_is_set_only_for_the_first_pulse_of_the_train() {
        let mut counter = LineCounter::new();
        let mut reactions = feed(&mut counter, SyncEvent::horizontal(), 1000);
        reactions.extend(feed(&mut counter, SyncEvent::vertical(), 5));
        reactions.extend(feed(&mut counter, SyncEvent::horizontal(), 1000));

        let vsyncs: Vec<usize> = reactions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.vsync)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(vsyncs, [1000]);

        let lines: Vec<u16> = reactions.iter().map(|r| r.line).collect();
        let expected: Vec<u16> = (1..=1000)
            .chain([0; 5])
            .chain(1..=1000)
            .collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn when_vertical_pulses_are_three_lines_apart_the_second_is_suppressed() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 500);
        assert!(counter.process(SyncEvent::vertical(), WINDOW).vsync);
        feed(&mut counter, SyncEvent::horizontal(), 3);
        assert!(!counter.process(SyncEvent::vertical(), WINDOW).vsync);
    }

    #[test]
    fn visibility_follows_the_window_bounds() {
        let mut counter = LineCounter::new();
        let reactions = feed(&mut counter, SyncEvent::horizontal(), 1116);
        assert!(!reactions[33].visible, "line 34");
        assert!(reactions[34].visible, "line 35");
        assert!(reactions[1114].visible, "line 1115");
        assert!(!reactions[1115].visible, "line 1116");
    }

    #[test]
    fn vertical_pulse_is_never_visible() {
        let mut counter = LineCounter::new();
        feed(&mut counter, SyncEvent::horizontal(), 100);
        assert!(!counter.process(SyncEvent::vertical(), WINDOW).visible);
    }

    #[test]
    fn when_no_vertical_sync_arrives_the_line_saturates_out_of_window() {
        let mut counter = LineCounter::new();
        for _ in 0..u32::from(u16::MAX) + 10 {
            counter.process(SyncEvent::horizontal(), WINDOW);
        }
        assert_eq!(counter.line(), u16::MAX);
        assert!(!counter.process(SyncEvent::horizontal(), WINDOW).visible);
    }

    proptest! {
        #[test]
        fn line_follows_every_pulse(pulses in proptest::collection::vec(any::<bool>(), 0..3000)) {
            let mut counter = LineCounter::new();
            for still_high in pulses {
                let before = counter.line();
                let reaction = counter.process(SyncEvent { still_high }, WINDOW);
                if still_high {
                    prop_assert_eq!(reaction.line, 0);
                    prop_assert_eq!(reaction.vsync, before > VSYNC_DEBOUNCE_LINES);
                } else {
                    prop_assert_eq!(reaction.line, before + 1);
                    prop_assert!(!reaction.vsync);
                }
                prop_assert_eq!(reaction.visible, WINDOW.contains(reaction.line));
            }
        }

        #[test]
        fn a_train_of_vertical_pulses_marks_at_most_one_frame(
            lines in 0u16..2000,
            train in 1usize..20,
        ) {
            let mut counter = LineCounter::new();
            for _ in 0..lines {
                counter.process(SyncEvent::horizontal(), WINDOW);
            }
            let vsyncs: Vec<bool> = (0..train)
                .map(|_| counter.process(SyncEvent::vertical(), WINDOW).vsync)
                .collect();
            prop_assert_eq!(vsyncs[0], lines > VSYNC_DEBOUNCE_LINES);
            prop_assert!(vsyncs[1..].iter().all(|v| !v));
        }
    }
}
