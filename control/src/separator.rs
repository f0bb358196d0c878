//! Sync separator tying line counting to the gate and vertical sync outputs.

use crate::config::Configuration;
use crate::gate::{OneShot, OutputLatch};
use crate::line_counter::{LineCounter, LineReaction, SyncEvent};
use crate::log;

/// The whole decision logic of the separator.
///
/// Owns the line counter and both outputs that depend on it. `handle` must be
/// called for every sync edge, in order, and must finish before the next
/// edge arrives. Nothing else should touch the outputs.
///
/// The gate may be triggered by the edge itself, before `handle` runs. The
/// decision made for a line therefore applies to the pulse of the next one,
/// with two exceptions: leaving the window cuts the pulse in flight
/// immediately, and the pulse following the last visible line is masked
/// ahead of time.
pub struct SyncSeparator<G, V> {
    configuration: Configuration,
    counter: LineCounter,
    gate: G,
    vsync: V,
}

impl<G: OneShot, V: OutputLatch> SyncSeparator<G, V> {
    /// Start in the blanking region with both outputs low.
    pub fn new(configuration: Configuration, mut gate: G, mut vsync: V) -> Self {
        gate.set_enabled(false);
        gate.force_inactive();
        vsync.set(false);
        Self {
            configuration,
            counter: LineCounter::new(),
            gate,
            vsync,
        }
    }

    pub fn handle(&mut self, event: SyncEvent) -> LineReaction {
        self.gate.arm();

        let window = self.configuration.visible_lines;
        let reaction = self.counter.process(event, window);

        if reaction.vsync {
            log::info!("Vertical sync");
        }
        self.vsync.set(reaction.vsync);

        if reaction.visible {
            if !self.gate.is_enabled() {
                log::debug!("Entering visible lines at line={}", reaction.line);
            }
            // Only enable, the gate rises with the next timed pulse.
            self.gate.set_enabled(true);
            // A hardware timer fires on the next edge before it is handled.
            // After the last visible line that pulse must not happen.
            if !window.contains(reaction.line.saturating_add(1)) {
                self.gate.mask_next();
            }
        } else {
            if self.gate.is_enabled() {
                log::debug!("Leaving visible lines at line={}", reaction.line);
            }
            self.gate.set_enabled(false);
            self.gate.force_inactive();
        }
        reaction
    }

    #[must_use]
    pub fn line(&self) -> u16 {
        self.counter.line()
    }

    #[must_use]
    pub fn vsync(&self) -> bool {
        self.counter.vsync()
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.configuration.visible_lines.contains(self.line())
    }

    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[must_use]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    pub fn vsync_output(&self) -> &V {
        &self.vsync
    }
}
