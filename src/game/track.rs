use log::debug;

use crate::game::chart::ChordSource;
use crate::game::chord::Chord;
use crate::game::scoring::{ScoreState, ScoreValues};

/// Depth geometry of the scrolling track. Depth increases by one per tick;
/// a slot is strikeable while strictly inside (entry_depth, zone_end_depth).
/// Defaults reproduce the classic 800x630 layout.
#[derive(Copy, Clone, Debug)]
pub struct TrackParams {
    pub slot_count: usize,
    /// Depth a slot resets to when it wraps.
    pub top_depth: i32,
    /// Initial depth spacing between consecutive slots.
    pub slot_spacing: i32,
    /// Depth at which a chord's notes are added to the seen total.
    pub entry_depth: i32,
    /// Exclusive end of the strike zone.
    pub zone_end_depth: i32,
    /// Depth at which an uncleared chord is scored as a miss.
    pub exit_depth: i32,
    /// Depth at which the slot recycles.
    pub wrap_depth: i32,
    /// The visual edges widen by one every this many depth units (cosmetic).
    pub widen_interval: i32,
    pub left_edge: i32,
    pub right_edge: i32,
    /// Initial per-slot outward stagger of the edges.
    pub edge_stagger: i32,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            slot_count: 10,
            top_depth: 200,
            slot_spacing: 40,
            entry_depth: 520,
            zone_end_depth: 560,
            exit_depth: 561,
            wrap_depth: 600,
            widen_interval: 8,
            left_edge: 350,
            right_edge: 450,
            edge_stagger: 5,
        }
    }
}

/// One recyclable track position carrying a chord.
#[derive(Copy, Clone, Debug)]
pub struct Slot {
    pub depth: i32,
    pub left: i32,
    pub right: i32,
    pub chord: Chord,
}

/// The fixed ring of slots. Chords start empty; real chords flow in from
/// the `ChordSource` as slots wrap.
pub struct Track {
    params: TrackParams,
    slots: Vec<Slot>,
}

impl Track {
    pub fn new(params: TrackParams) -> Self {
        let slots = (0..params.slot_count)
            .map(|i| Slot {
                depth: params.top_depth + params.slot_spacing * i as i32,
                left: params.left_edge - params.edge_stagger * i as i32,
                right: params.right_edge + params.edge_stagger * i as i32,
                chord: Chord::EMPTY,
            })
            .collect();
        Self { params, slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    pub const fn params(&self) -> &TrackParams {
        &self.params
    }

    /// Advances every slot by one depth unit and applies the threshold
    /// effects in order: edge widening, entry counting, active-slot
    /// selection, exit miss, wrap/recycle. Returns the slot marked
    /// strikeable this tick, if any.
    ///
    /// Under default spacing at most one slot is in the zone. If custom
    /// spacing puts two there, the later slot in iteration order wins;
    /// the displacement is logged rather than silently reordered.
    pub fn advance(
        &mut self,
        score: &mut ScoreState,
        values: ScoreValues,
        source: &mut ChordSource,
    ) -> Option<usize> {
        let p = self.params;
        let mut active = None;

        for i in 0..self.slots.len() {
            let slot = &mut self.slots[i];
            slot.depth += 1;

            if slot.depth % p.widen_interval == 0 {
                slot.left -= 1;
                slot.right += 1;
            }

            // Counted exactly once per chord, at the moment it becomes
            // eligible, not when it was installed.
            if slot.depth == p.entry_depth {
                score.total += slot.chord.len();
            }

            if slot.depth > p.entry_depth && slot.depth < p.zone_end_depth {
                if let Some(prev) = active {
                    debug!("Strike zone overlap: slot {i} displaces slot {prev}");
                }
                active = Some(i);
            }

            if slot.depth == p.exit_depth && !slot.chord.is_empty() {
                score.zone_miss(slot.chord.len(), values);
            }

            if slot.depth == p.wrap_depth {
                slot.depth = p.top_depth;
                slot.left = p.left_edge;
                slot.right = p.right_edge;
                // An exhausted source supplies rests from here on.
                slot.chord = source.next_chord().unwrap_or(Chord::EMPTY);
            }
        }

        active
    }
}
