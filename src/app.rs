use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{info, warn};

use crate::config;
use crate::core::audio::AudioCue;
use crate::game::chart::ChordSource;
use crate::game::chord::Lane;
use crate::game::gameplay::{self, GameState, Snapshot};
use crate::game::input::{InputEvent, Keymap};
use crate::game::scoring::ScoreState;
use crate::game::track::TrackParams;

// Redraw the HUD every Nth tick; at the default 5ms timestep this is ~25fps.
const HUD_TICK_INTERVAL: u64 = 8;
const HUD_ROWS: i32 = 20;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::get();
    let keymap = Keymap::new(&cfg.lane_keys, cfg.strum_key);
    if keymap.lane_count() == 0 {
        warn!("No usable lane keys configured; every chart note will be unplayable");
    }

    let source = ChordSource::load(&cfg.chart_path, &keymap);
    if source.is_exhausted() {
        warn!("Chart is empty; the session will end immediately");
    }

    let params = TrackParams::default();
    let mut state = GameState::new(source, params, cfg.score_values());

    // Input thread: blocking terminal reads, translated through the keymap
    // into discrete events the loop drains once per tick.
    let (event_tx, event_rx) = mpsc::channel();
    {
        let keymap = keymap.clone();
        thread::Builder::new()
            .name("input".into())
            .spawn(move || input_thread(&keymap, &event_tx))?;
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let key_release_reporting = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if key_release_reporting {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("Terminal does not report key releases; held notes only accumulate");
    }

    let audio = AudioCue::start(&cfg.music_path, Duration::from_millis(cfg.start_adjustment_ms));

    let tick_delay = Duration::from_millis(cfg.tick_delay_ms);
    let mut ticks: u64 = 0;
    gameplay::run_loop(&mut state, &event_rx, tick_delay, |snapshot| {
        ticks += 1;
        if ticks % HUD_TICK_INTERVAL == 0
            && let Err(e) = draw_hud(&mut stdout, snapshot, &keymap, &params, &cfg.music_path)
        {
            warn!("HUD draw failed: {e}");
        }
    });

    if key_release_reporting {
        execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    print_summary(state.score());

    // The input thread stays parked in event::read; it dies with the
    // process. The music is allowed to drain first.
    audio.finish();
    Ok(())
}

fn input_thread(keymap: &Keymap, events: &mpsc::Sender<InputEvent>) {
    loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(e) => {
                warn!("Input read failed: {e}");
                let _ = events.send(InputEvent::Quit);
                return;
            }
        };
        if let Event::Key(key) = ev
            && let Some(translated) = translate_key(keymap, &key)
            && events.send(translated).is_err()
        {
            // Loop side hung up; session is over.
            return;
        }
    }
}

fn translate_key(keymap: &Keymap, key: &KeyEvent) -> Option<InputEvent> {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(InputEvent::Quit);
    }

    let ch = match key.code {
        KeyCode::Char(c) => c,
        KeyCode::Backspace => '\u{8}',
        KeyCode::Tab => '\t',
        KeyCode::Enter => '\n',
        _ => return None,
    };

    match key.kind {
        // Terminal auto-repeat re-strums a held strum key, matching the
        // classic behavior; lane presses are idempotent.
        KeyEventKind::Press | KeyEventKind::Repeat => keymap.on_key_down(ch),
        KeyEventKind::Release => keymap.on_key_up(ch),
    }
}

/// Minimal textual projection of the render snapshot: the slot ring mapped
/// onto a fixed number of rows, the held lanes, and the score block.
fn draw_hud(
    out: &mut impl Write,
    snapshot: &Snapshot<'_>,
    keymap: &Keymap,
    params: &TrackParams,
    music_path: &str,
) -> io::Result<()> {
    let lane_count = keymap.lane_count().max(1);
    let span = params.wrap_depth - params.top_depth;
    let row_of = |depth: i32| ((depth - params.top_depth) * (HUD_ROWS - 1) / span.max(1)).clamp(0, HUD_ROWS - 1);

    let mut rows: Vec<Option<usize>> = vec![None; HUD_ROWS as usize];
    for (i, slot) in snapshot.slots.iter().enumerate() {
        rows[row_of(slot.depth) as usize] = Some(i);
    }
    let zone_top = row_of(params.entry_depth);
    let zone_bottom = row_of(params.zone_end_depth);

    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    queue!(out, MoveTo(0, 0))?;
    write!(out, "strumline - {music_path}")?;

    for row in 0..HUD_ROWS {
        queue!(out, MoveTo(2, (row + 2) as u16))?;
        let mut line = String::from("|");
        match rows[row as usize] {
            Some(i) => {
                let slot = &snapshot.slots[i];
                for lane_idx in 0..lane_count {
                    let lane = Lane(lane_idx as u8);
                    if slot.chord.contains(lane) {
                        line.push(' ');
                        line.push(keymap.key_for(lane).unwrap_or('?'));
                    } else {
                        line.push_str(" .");
                    }
                }
            }
            None => {
                for _ in 0..lane_count {
                    line.push_str("  ");
                }
            }
        }
        line.push_str(" |");
        if row >= zone_top && row <= zone_bottom {
            line.push_str(" <");
        }
        write!(out, "{line}")?;
    }

    let mut held = String::new();
    for lane_idx in 0..lane_count {
        let lane = Lane(lane_idx as u8);
        if snapshot.held.contains(lane) {
            held.push('[');
            held.push(keymap.key_for(lane).unwrap_or('?'));
            held.push(']');
        } else {
            held.push_str(" . ");
        }
    }

    let s: &ScoreState = snapshot.score;
    queue!(out, MoveTo(2, (HUD_ROWS + 3) as u16))?;
    write!(out, "held {held}")?;
    queue!(out, MoveTo(2, (HUD_ROWS + 4) as u16))?;
    write!(
        out,
        "score {}  streak {} (best {})  cleared {}/{} ({:.2}%)  chords left {}",
        s.score, s.streak, s.longest, s.cleared, s.total, s.percent, snapshot.chords_remaining
    )?;

    out.flush()
}

fn print_summary(score: &ScoreState) {
    info!("Final score {}", score.score);
    println!("song over!");
    println!("  score:          {}", score.score);
    println!("  notes cleared:  {}/{} ({:.2}%)", score.cleared, score.total, score.percent);
    println!("  longest streak: {}", score.longest.max(score.streak));
}
