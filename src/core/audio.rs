use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use kira::sound::static_sound::StaticSoundData;
use kira::{AudioManager, AudioManagerSettings, DefaultBackend};
use log::{info, warn};

/// Background music started once with a fixed delay so the first chord's
/// strike-zone arrival lines up with playback. Fire and forget: there is no
/// feedback channel into the game loop, and the loop ending does not stop
/// the music. Any failure degrades to a silent session.
pub struct AudioCue {
    handle: Option<JoinHandle<()>>,
}

impl AudioCue {
    pub fn start(path: &str, start_delay: Duration) -> Self {
        let path = PathBuf::from(path);
        let spawned = thread::Builder::new()
            .name("audio-cue".into())
            .spawn(move || play_to_completion(&path, start_delay));

        match spawned {
            Ok(handle) => Self { handle: Some(handle) },
            Err(e) => {
                warn!("Failed to spawn audio thread: {e}");
                Self { handle: None }
            }
        }
    }

    /// Blocks until playback drains. Call after the session so the stream
    /// finishes naturally even when the loop ended first.
    pub fn finish(mut self) {
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Audio thread panicked");
        }
    }
}

fn play_to_completion(path: &Path, start_delay: Duration) {
    let sound = match StaticSoundData::from_file(path) {
        Ok(sound) => sound,
        Err(e) => {
            warn!("Failed to load music '{}': {e}", path.display());
            return;
        }
    };

    let mut manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
        Ok(manager) => manager,
        Err(e) => {
            warn!("Failed to open the audio output: {e}");
            return;
        }
    };

    thread::sleep(start_delay);

    let duration = sound.duration();
    if let Err(e) = manager.play(sound) {
        warn!("Failed to start music: {e}");
        return;
    }
    info!("Music started ('{}', {:.0?})", path.display(), duration);

    // The manager owns the output stream; keep it alive until the sound has
    // drained, then let the thread exit.
    thread::sleep(duration);
}
