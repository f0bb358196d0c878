use syncsep_control::LineReaction;

use crate::system::edge::EdgeSource;
use crate::system::Separator;

const MS: u32 = 480_000_000 / 1000;

/// Statistics of frames observed by polling the comparator.
#[derive(Debug, Default, defmt::Format)]
pub struct Frames {
    pub vsyncs: u32,
    pub shortest: u16,
    pub longest: u16,
}

/// Feed the separator from the comparator without interrupts.
///
/// Returns `None` if no edge arrived within the timeout.
pub fn next_line(
    edge: &mut EdgeSource,
    separator: &mut Separator,
    timeout_ms: u32,
) -> Option<LineReaction> {
    for _ in 0..timeout_ms * 1000 {
        if edge.pending() {
            let event = edge.sample();
            return Some(separator.handle(event));
        }
        cortex_m::asm::delay(MS / 1000);
    }
    None
}

/// Feed the separator until the line count is established.
///
/// # Panics
///
/// Panics if the signal disappears.
pub fn wait_for_vsync(edge: &mut EdgeSource, separator: &mut Separator) {
    loop {
        let Some(reaction) = next_line(edge, separator, 100) else {
            defmt::panic!("No sync edge detected, is the signal connected?");
        };
        if reaction.vsync {
            return;
        }
    }
}

/// Run the separator until the requested number of frames passes.
///
/// # Panics
///
/// Panics if the signal disappears.
pub fn observe_frames(edge: &mut EdgeSource, separator: &mut Separator, frames: u32) -> Frames {
    let mut stats = Frames {
        shortest: u16::MAX,
        ..Frames::default()
    };
    let mut last_line = 0;
    // The first vertical sync only establishes the line count.
    while stats.vsyncs <= frames {
        let Some(reaction) = next_line(edge, separator, 100) else {
            defmt::panic!("No sync edge detected, is the signal connected?");
        };
        if reaction.vsync {
            if stats.vsyncs > 0 {
                stats.shortest = stats.shortest.min(last_line);
                stats.longest = stats.longest.max(last_line);
            }
            stats.vsyncs += 1;
        }
        last_line = reaction.line;
    }
    stats
}
