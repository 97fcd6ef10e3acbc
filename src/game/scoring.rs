use crate::game::chord::Chord;

/// Score coefficients, configurable via `[Scoring]` in strumline.ini.
///
/// A strum that clears `hits` notes earns `note_value * hits^2`, so a full
/// chord cleared in one strum is worth disproportionately more than the
/// same notes cleared across several strums. A streak of `n` precisely
/// cleared chords pays `streak_bonus * n^2` at the moment it ends.
#[derive(Copy, Clone, Debug)]
pub struct ScoreValues {
    /// Base points for cleared notes.
    pub note_value: i64,
    /// Deduction per missed note (over-strummed or left in the zone).
    pub miss_value: i64,
    /// Flat deduction for strumming with nothing held.
    pub empty_value: i64,
    /// Coefficient for the end-of-streak bonus.
    pub streak_bonus: i64,
}

impl Default for ScoreValues {
    fn default() -> Self {
        Self {
            note_value: 10,
            miss_value: -5,
            empty_value: -1,
            streak_bonus: 5,
        }
    }
}

/// Running session totals. `percent` is derived from cleared/total and
/// recomputed once per tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreState {
    pub score: i64,
    /// Consecutive precisely-cleared chords.
    pub streak: u32,
    /// Longest streak observed; never decreases.
    pub longest: u32,
    /// Notes that have entered the strike zone.
    pub total: u32,
    /// Notes successfully cleared.
    pub cleared: u32,
    pub percent: f64,
}

/// What a single strum did, for logging and the HUD.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StrumOutcome {
    pub hits: u32,
    pub extra: u32,
    /// True when the strum fully cleared the target with no extra held
    /// notes, extending the streak.
    pub precise: bool,
}

impl ScoreState {
    /// Ends the current streak: banks `streak_bonus * streak^2`, records
    /// the longest streak, resets the counter. Strum misses and
    /// strike-zone-exit misses share this one contract.
    pub fn end_streak(&mut self, values: ScoreValues) {
        self.score += values.streak_bonus * i64::from(self.streak).pow(2);
        self.longest = self.longest.max(self.streak);
        self.streak = 0;
    }

    /// Scores a chord that reached the strike-zone exit with notes still
    /// remaining.
    pub fn zone_miss(&mut self, remaining: u32, values: ScoreValues) {
        self.score += values.miss_value * i64::from(remaining);
        self.end_streak(values);
    }

    /// The match engine: commits `held` against `target`.
    ///
    /// Cleared notes are the set intersection; they are removed from the
    /// target chord. Holding more notes than the target has left counts the
    /// excess length as misses regardless of which notes are the extras.
    /// Strumming nothing costs a flat penalty. The streak extends only on a
    /// precise full clear.
    pub fn strum(&mut self, held: Chord, target: &mut Chord, values: ScoreValues) -> StrumOutcome {
        let cleared = held.intersection(*target);

        let extra = held.len().saturating_sub(target.len());
        if extra > 0 {
            self.score += values.miss_value * i64::from(extra);
        }

        if held.is_empty() {
            self.score += values.empty_value;
        }

        let hits = cleared.len();
        self.cleared += hits;
        self.score += values.note_value * i64::from(hits).pow(2);

        *target = target.difference(cleared);

        let precise = !held.is_empty() && target.is_empty() && extra == 0;
        if precise {
            self.streak += 1;
        } else {
            self.end_streak(values);
        }

        StrumOutcome { hits, extra, precise }
    }

    /// Fraction of seen notes cleared, as a percentage truncated to two
    /// decimal places. Left untouched while no notes have been seen.
    pub fn recompute_percent(&mut self) {
        if self.total > 0 {
            self.percent =
                (f64::from(self.cleared) / f64::from(self.total) * 10000.0).trunc() / 100.0;
        }
    }
}
