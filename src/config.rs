use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex};

use log::{info, warn};

use crate::game::scoring::ScoreValues;

const CONFIG_PATH: &str = "strumline.ini";

// --- Minimal INI reader ---
#[derive(Debug, Default)]
pub struct SimpleIni {
    sections: HashMap<String, HashMap<String, String>>,
}

impl SimpleIni {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content);
        Ok(())
    }

    pub fn parse(&mut self, content: &str) {
        self.sections.clear();
        let mut current_section: Option<String> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            // Section header: [SectionName]
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let section = line[1..line.len() - 1].trim().to_string();
                current_section = Some(section.clone());
                self.sections.entry(section).or_default();
                continue;
            }

            // Key/value pair: key=value
            if let Some(eq_idx) = line.find('=') {
                let (key_raw, value_raw) = line.split_at(eq_idx);
                let key = key_raw.trim();
                if key.is_empty() {
                    continue;
                }
                let value = value_raw[1..].trim().to_string();
                let section = current_section.clone().unwrap_or_default();
                self.sections
                    .entry(section)
                    .or_default()
                    .insert(key.to_string(), value);
            }
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section).and_then(|s| s.get(key)).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

/// Parses a strum-key spec: a handful of named keys or one literal
/// character.
fn parse_strum_key(s: &str) -> Option<char> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "backspace" => return Some('\u{8}'),
        "space" => return Some(' '),
        "tab" => return Some('\t'),
        "enter" | "return" => return Some('\n'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn strum_key_spec(key: char) -> String {
    match key {
        '\u{8}' => "Backspace".to_string(),
        ' ' => "Space".to_string(),
        '\t' => "Tab".to_string(),
        '\n' => "Enter".to_string(),
        c => c.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub music_path: String,
    pub chart_path: String,
    pub log_level: LogLevel,
    /// Fixed wall-clock delay between ticks, in milliseconds.
    pub tick_delay_ms: u64,
    /// Delay before music playback starts, so the first chord's strike-zone
    /// arrival lines up with the song.
    pub start_adjustment_ms: u64,
    /// Ordered lane keys; index = lane (green, red, yellow, blue, orange).
    pub lane_keys: String,
    pub strum_key: char,
    pub note_value: i64,
    pub miss_value: i64,
    pub empty_value: i64,
    pub streak_bonus: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_path: "music/van halen/you really got me.wav".to_string(),
            chart_path: "music/van halen/you really got me.txt".to_string(),
            log_level: LogLevel::Info,
            tick_delay_ms: 5,
            start_adjustment_ms: 1800,
            lane_keys: "12345".to_string(),
            strum_key: '\u{8}',
            note_value: 10,
            miss_value: -5,
            empty_value: -1,
            streak_bonus: 5,
        }
    }
}

impl Config {
    pub const fn score_values(&self) -> ScoreValues {
        ScoreValues {
            note_value: self.note_value,
            miss_value: self.miss_value,
            empty_value: self.empty_value,
            streak_bonus: self.streak_bonus,
        }
    }
}

static CONFIG: LazyLock<Mutex<Config>> = LazyLock::new(|| Mutex::new(Config::default()));

fn create_default_config_file() -> Result<(), std::io::Error> {
    info!("'{CONFIG_PATH}' not found, creating with default values.");
    let default = Config::default();

    let mut content = String::new();

    content.push_str("[Game]\n");
    content.push_str(&format!("Music={}\n", default.music_path));
    content.push_str(&format!("Chart={}\n", default.chart_path));
    content.push_str(&format!("LogLevel={}\n", default.log_level.as_str()));

    content.push_str("\n[Timing]\n");
    content.push_str(&format!("TickDelayMs={}\n", default.tick_delay_ms));
    content.push_str(&format!("StartAdjustmentMs={}\n", default.start_adjustment_ms));

    content.push_str("\n[Keys]\n");
    content.push_str(&format!("LaneKeys={}\n", default.lane_keys));
    content.push_str(&format!("StrumKey={}\n", strum_key_spec(default.strum_key)));

    content.push_str("\n[Scoring]\n");
    content.push_str(&format!("NoteValue={}\n", default.note_value));
    content.push_str(&format!("MissValue={}\n", default.miss_value));
    content.push_str(&format!("EmptyValue={}\n", default.empty_value));
    content.push_str(&format!("StreakBonus={}\n", default.streak_bonus));

    std::fs::write(CONFIG_PATH, content)
}

pub fn load() {
    if !Path::new(CONFIG_PATH).exists()
        && let Err(e) = create_default_config_file()
    {
        warn!("Failed to create default config file: {e}");
    }

    let mut conf = SimpleIni::new();
    match conf.load(CONFIG_PATH) {
        Ok(()) => {
            let mut cfg = CONFIG.lock().unwrap();
            *cfg = config_from_ini(&conf);
        }
        Err(e) => {
            warn!("Failed to load '{CONFIG_PATH}': {e}; using defaults");
        }
    }
}

fn config_from_ini(conf: &SimpleIni) -> Config {
    let default = Config::default();

    Config {
        music_path: conf.get("Game", "Music").unwrap_or(default.music_path),
        chart_path: conf.get("Game", "Chart").unwrap_or(default.chart_path),
        log_level: conf
            .get("Game", "LogLevel")
            .and_then(|v| LogLevel::from_str(&v).ok())
            .unwrap_or(default.log_level),
        tick_delay_ms: conf
            .get("Timing", "TickDelayMs")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(default.tick_delay_ms),
        start_adjustment_ms: conf
            .get("Timing", "StartAdjustmentMs")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(default.start_adjustment_ms),
        lane_keys: conf
            .get("Keys", "LaneKeys")
            .filter(|v| !v.is_empty())
            .unwrap_or(default.lane_keys),
        strum_key: conf
            .get("Keys", "StrumKey")
            .and_then(|v| parse_strum_key(&v))
            .unwrap_or(default.strum_key),
        note_value: conf
            .get("Scoring", "NoteValue")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default.note_value),
        miss_value: conf
            .get("Scoring", "MissValue")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default.miss_value),
        empty_value: conf
            .get("Scoring", "EmptyValue")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default.empty_value),
        streak_bonus: conf
            .get("Scoring", "StreakBonus")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default.streak_bonus),
    }
}

pub fn get() -> Config {
    CONFIG.lock().unwrap().clone()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Config, LogLevel, SimpleIni, config_from_ini, parse_strum_key};

    #[test]
    fn ini_reader_handles_sections_comments_and_whitespace() {
        let mut ini = SimpleIni::new();
        ini.parse("; comment\n[Game]\nMusic = a.wav \n# other\n[Scoring]\nNoteValue=25\n");
        assert_eq!(ini.get("Game", "Music").as_deref(), Some("a.wav"));
        assert_eq!(ini.get("Scoring", "NoteValue").as_deref(), Some("25"));
        assert_eq!(ini.get("Game", "Missing"), None);
        assert_eq!(ini.get("Nope", "Music"), None);
    }

    #[test]
    fn missing_or_malformed_keys_fall_back_to_defaults() {
        let mut ini = SimpleIni::new();
        ini.parse("[Timing]\nTickDelayMs=fast\n[Scoring]\nMissValue=-3\n");
        let cfg = config_from_ini(&ini);
        let default = Config::default();

        assert_eq!(cfg.tick_delay_ms, default.tick_delay_ms);
        assert_eq!(cfg.miss_value, -3);
        assert_eq!(cfg.lane_keys, default.lane_keys);
        assert_eq!(cfg.strum_key, '\u{8}');
    }

    #[test]
    fn zero_tick_delay_is_rejected() {
        let mut ini = SimpleIni::new();
        ini.parse("[Timing]\nTickDelayMs=0\n");
        assert_eq!(config_from_ini(&ini).tick_delay_ms, 5);
    }

    #[test]
    fn strum_key_specs() {
        assert_eq!(parse_strum_key("Backspace"), Some('\u{8}'));
        assert_eq!(parse_strum_key("space"), Some(' '));
        assert_eq!(parse_strum_key("m"), Some('m'));
        assert_eq!(parse_strum_key("ctrl+x"), None);
        assert_eq!(parse_strum_key(""), None);
    }

    #[test]
    fn log_level_round_trip() {
        for level in [
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(LogLevel::from_str(level.as_str()), Ok(level));
        }
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn score_values_mirror_config() {
        let cfg = Config::default();
        let values = cfg.score_values();
        assert_eq!(values.note_value, 10);
        assert_eq!(values.miss_value, -5);
        assert_eq!(values.empty_value, -1);
        assert_eq!(values.streak_bonus, 5);
    }
}
