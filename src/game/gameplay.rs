use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::game::chart::ChordSource;
use crate::game::chord::Chord;
use crate::game::input::InputEvent;
use crate::game::scoring::{ScoreState, ScoreValues, StrumOutcome};
use crate::game::track::{Slot, Track, TrackParams};

/// All mutable session state in one owned struct: the slot ring, the chord
/// supply, the held-input chord, the last strikeable slot and the score.
pub struct GameState {
    track: Track,
    source: ChordSource,
    held: Chord,
    active_slot: usize,
    score: ScoreState,
    values: ScoreValues,
}

/// Read-only per-tick view for a rendering collaborator. The renderer gets
/// everything it can draw and nothing it can mutate.
pub struct Snapshot<'a> {
    pub slots: &'a [Slot],
    pub held: Chord,
    pub active_slot: usize,
    pub score: &'a ScoreState,
    pub chords_remaining: usize,
}

impl GameState {
    pub fn new(source: ChordSource, params: TrackParams, values: ScoreValues) -> Self {
        Self {
            track: Track::new(params),
            source,
            held: Chord::EMPTY,
            active_slot: 0,
            score: ScoreState::default(),
            values,
        }
    }

    /// Applies one discrete input event. Returns the outcome when the event
    /// was a strum. `Quit` is a loop concern and a no-op here.
    pub fn apply_event(&mut self, event: InputEvent) -> Option<StrumOutcome> {
        match event {
            InputEvent::LanePressed(lane) => {
                self.held.insert(lane);
                None
            }
            InputEvent::LaneReleased(lane) => {
                self.held.remove(lane);
                None
            }
            InputEvent::Strum => Some(self.strum()),
            InputEvent::Quit => None,
        }
    }

    /// Commits the held notes against the chord in the last slot marked
    /// strikeable. The held set is intentionally not cleared: notes still
    /// physically held count again on every strum, the empty-strum penalty
    /// included.
    fn strum(&mut self) -> StrumOutcome {
        let slot = self.track.slot_mut(self.active_slot);
        self.score.strum(self.held, &mut slot.chord, self.values)
    }

    /// One fixed-timestep tick: advance the track, refresh the derived
    /// percentage. The strikeable slot persists until another slot enters
    /// the zone.
    pub fn tick(&mut self) {
        if let Some(active) = self.track.advance(&mut self.score, self.values, &mut self.source) {
            self.active_slot = active;
        }
        self.score.recompute_percent();
    }

    /// The session ends when the chord supply is exhausted; chords still on
    /// the track at that point are never played out.
    pub fn finished(&self) -> bool {
        self.source.is_exhausted()
    }

    pub const fn score(&self) -> &ScoreState {
        &self.score
    }

    pub const fn held(&self) -> Chord {
        self.held
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            slots: self.track.slots(),
            held: self.held,
            active_slot: self.active_slot,
            score: &self.score,
            chords_remaining: self.source.remaining(),
        }
    }
}

/// Drives the fixed-timestep loop: drain the input channel, tick, hand a
/// snapshot to the render sink, sleep. Pacing is delay-per-tick, so elapsed
/// time is `tick_delay * ticks` regardless of render cost.
pub fn run_loop<F>(
    state: &mut GameState,
    events: &Receiver<InputEvent>,
    tick_delay: Duration,
    mut render: F,
) where
    F: FnMut(&Snapshot<'_>),
{
    let started = Instant::now();
    let mut ticks: u64 = 0;

    'session: while !state.finished() {
        for event in events.try_iter() {
            if event == InputEvent::Quit {
                info!("Quit requested");
                break 'session;
            }
            if let Some(outcome) = state.apply_event(event) {
                debug!(
                    "Strum: {} hit(s), {} extra, streak {}",
                    outcome.hits,
                    outcome.extra,
                    state.score.streak
                );
            }
        }

        state.tick();
        ticks += 1;
        render(&state.snapshot());

        std::thread::sleep(tick_delay);
    }

    info!(
        "Session over after {ticks} ticks ({:.1?} elapsed): score {}, {}/{} notes, longest streak {}",
        started.elapsed(),
        state.score.score,
        state.score.cleared,
        state.score.total,
        state.score.longest.max(state.score.streak)
    );
}
