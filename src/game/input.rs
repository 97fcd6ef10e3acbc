use log::warn;
use rustc_hash::FxHashMap;

use crate::game::chord::{Lane, MAX_LANES};

/// Discrete input events, produced by the input thread and drained by the
/// game loop once per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    LanePressed(Lane),
    LaneReleased(Lane),
    /// Commit the currently held lanes against the active chord.
    Strum,
    Quit,
}

/// Maps physical key characters to lanes, plus the one distinguished strum
/// key. Built once from config; shared by chart parsing, input translation
/// and the HUD.
#[derive(Clone, Debug)]
pub struct Keymap {
    by_key: FxHashMap<char, Lane>,
    // Ordered lane keys, index = lane index.
    keys: Vec<char>,
    strum_key: char,
}

impl Keymap {
    /// Builds a keymap from an ordered lane-key string (`"12345"` by
    /// default). Duplicates, the strum key itself, and characters beyond
    /// `MAX_LANES` are dropped with a warning.
    pub fn new(lane_keys: &str, strum_key: char) -> Self {
        let mut by_key = FxHashMap::default();
        let mut keys = Vec::new();

        for ch in lane_keys.chars() {
            if ch == strum_key {
                warn!("Lane key '{ch}' collides with the strum key; dropping it");
                continue;
            }
            if by_key.contains_key(&ch) {
                warn!("Duplicate lane key '{ch}' in key mapping; dropping it");
                continue;
            }
            if keys.len() >= MAX_LANES {
                warn!("Too many lane keys (max {MAX_LANES}); dropping '{ch}'");
                continue;
            }
            by_key.insert(ch, Lane(keys.len() as u8));
            keys.push(ch);
        }

        Self { by_key, keys, strum_key }
    }

    pub fn lane(&self, key: char) -> Option<Lane> {
        self.by_key.get(&key).copied()
    }

    pub fn key_for(&self, lane: Lane) -> Option<char> {
        self.keys.get(lane.index()).copied()
    }

    pub fn lane_count(&self) -> usize {
        self.keys.len()
    }

    pub const fn strum_key(&self) -> char {
        self.strum_key
    }

    /// Translates a key press. The strum key strums, recognized lane keys
    /// press their lane, anything else is a no-op.
    pub fn on_key_down(&self, key: char) -> Option<InputEvent> {
        if key == self.strum_key {
            return Some(InputEvent::Strum);
        }
        self.lane(key).map(InputEvent::LanePressed)
    }

    /// Translates a key release. Releasing the strum key is ignored.
    pub fn on_key_up(&self, key: char) -> Option<InputEvent> {
        if key == self.strum_key {
            return None;
        }
        self.lane(key).map(InputEvent::LaneReleased)
    }
}

#[cfg(test)]
mod tests {
    use super::{InputEvent, Keymap};
    use crate::game::chord::Lane;

    const STRUM: char = '\u{8}'; // Backspace

    #[test]
    fn maps_ordered_lane_keys() {
        let keymap = Keymap::new("12345", STRUM);
        assert_eq!(keymap.lane_count(), 5);
        assert_eq!(keymap.lane('1'), Some(Lane(0)));
        assert_eq!(keymap.lane('5'), Some(Lane(4)));
        assert_eq!(keymap.lane('6'), None);
        assert_eq!(keymap.key_for(Lane(2)), Some('3'));
        assert_eq!(keymap.key_for(Lane(7)), None);
    }

    #[test]
    fn key_down_translation() {
        let keymap = Keymap::new("12345", STRUM);
        assert_eq!(keymap.on_key_down('2'), Some(InputEvent::LanePressed(Lane(1))));
        assert_eq!(keymap.on_key_down(STRUM), Some(InputEvent::Strum));
        assert_eq!(keymap.on_key_down('x'), None);
    }

    #[test]
    fn key_up_ignores_strum_key() {
        let keymap = Keymap::new("12345", STRUM);
        assert_eq!(keymap.on_key_up('4'), Some(InputEvent::LaneReleased(Lane(3))));
        assert_eq!(keymap.on_key_up(STRUM), None);
        assert_eq!(keymap.on_key_up('x'), None);
    }

    #[test]
    fn drops_duplicates_and_strum_collisions() {
        let keymap = Keymap::new("11a\u{8}b", STRUM);
        assert_eq!(keymap.lane_count(), 3);
        assert_eq!(keymap.lane('1'), Some(Lane(0)));
        assert_eq!(keymap.lane('a'), Some(Lane(1)));
        assert_eq!(keymap.lane('b'), Some(Lane(2)));
    }

    #[test]
    fn caps_lane_count() {
        let keymap = Keymap::new("abcdefghij", STRUM);
        assert_eq!(keymap.lane_count(), 8);
        assert_eq!(keymap.lane('i'), None);
        assert_eq!(keymap.lane('j'), None);
    }
}
