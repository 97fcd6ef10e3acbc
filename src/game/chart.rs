use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::game::chord::Chord;
use crate::game::input::Keymap;

/// Sequential supply of chords parsed from a chart file: one line per
/// chord, whitespace stripped, each remaining character mapped through the
/// keymap to a lane. Unmapped characters are harmless no-ops. A missing or
/// unreadable chart degrades to an empty source rather than an error.
pub struct ChordSource {
    chords: VecDeque<Chord>,
}

impl ChordSource {
    pub fn load<P: AsRef<Path>>(path: P, keymap: &Keymap) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let source = Self::parse(&content, keymap);
                info!("Loaded chart '{}' ({} chords)", path.display(), source.remaining());
                source
            }
            Err(e) => {
                warn!("Failed to read chart '{}': {e}; starting with an empty chart", path.display());
                Self { chords: VecDeque::new() }
            }
        }
    }

    pub fn parse(content: &str, keymap: &Keymap) -> Self {
        let mut chords = VecDeque::new();
        for (line_no, line) in content.lines().enumerate() {
            let mut chord = Chord::EMPTY;
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                match keymap.lane(ch) {
                    Some(lane) => chord.insert(lane),
                    None => debug!("Chart line {}: unmapped character '{ch}'", line_no + 1),
                }
            }
            chords.push_back(chord);
        }
        Self { chords }
    }

    /// Pulls the next chord, FIFO. `None` once exhausted; an exhausted
    /// source stays exhausted for the rest of the session.
    pub fn next_chord(&mut self) -> Option<Chord> {
        self.chords.pop_front()
    }

    pub fn is_exhausted(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.chords.len()
    }
}

#[cfg(test)]
mod tests {
    use super::ChordSource;
    use crate::game::chord::{Chord, Lane};
    use crate::game::input::Keymap;

    fn keymap() -> Keymap {
        Keymap::new("12345", '\u{8}')
    }

    #[test]
    fn parses_one_chord_per_line() {
        let mut source = ChordSource::parse("1\n24\n135\n", &keymap());
        assert_eq!(source.remaining(), 3);

        let first = source.next_chord().unwrap();
        assert_eq!(first, [Lane(0)].into_iter().collect());

        let second = source.next_chord().unwrap();
        assert_eq!(second, [Lane(1), Lane(3)].into_iter().collect());

        let third = source.next_chord().unwrap();
        assert_eq!(third, [Lane(0), Lane(2), Lane(4)].into_iter().collect());

        assert!(source.is_exhausted());
        assert_eq!(source.next_chord(), None);
    }

    #[test]
    fn strips_whitespace_and_keeps_rests() {
        let mut source = ChordSource::parse(" 1 2 \n\n\t\n3", &keymap());
        assert_eq!(source.remaining(), 4);
        assert_eq!(source.next_chord().unwrap().len(), 2);
        // Blank lines are rests: valid empty chords, not skipped.
        assert_eq!(source.next_chord().unwrap(), Chord::EMPTY);
        assert_eq!(source.next_chord().unwrap(), Chord::EMPTY);
        assert_eq!(source.next_chord().unwrap(), [Lane(2)].into_iter().collect());
    }

    #[test]
    fn unmapped_characters_are_ignored() {
        let mut source = ChordSource::parse("1x2\n9-\n", &keymap());
        assert_eq!(source.next_chord().unwrap().len(), 2);
        assert_eq!(source.next_chord().unwrap(), Chord::EMPTY);
    }

    #[test]
    fn missing_chart_degrades_to_empty_source() {
        let source = ChordSource::load("does/not/exist.txt", &keymap());
        assert!(source.is_exhausted());
    }
}
