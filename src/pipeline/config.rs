// Optional settings file, read once on startup:
// <dir>/stepseq.json, where <dir> is the first CLI arg or the cwd.
// Patterns and playlists are never written back; this is input only.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::shared::{DEFAULT_STEP_DURATION_SECS, MAX_PATTERNS, SAMPLE_COUNT};

use super::sequence::{PatternId, Playlist};

const CONFIG_FILE: &str = "stepseq.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SampleSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub step_duration_secs: f64,
    pub downmix_to_mono: bool,
    pub samples: Vec<SampleSource>,
    pub initial_playlist: Vec<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_duration_secs: DEFAULT_STEP_DURATION_SECS,
            downmix_to_mono: true,
            samples: default_samples().to_vec(),
            initial_playlist: vec![0, 1],
        }
    }
}

fn default_samples() -> [SampleSource; SAMPLE_COUNT] {
    let slot = |name: &str, file: &str| SampleSource {
        name: name.to_string(),
        path: Path::new("samples").join(file),
    };
    [
        slot("Kick", "kick.wav"),
        slot("Snare", "snare.wav"),
        slot("Hi-Hat", "hihat.wav"),
        slot("Clap", "clap.wav"),
    ]
}

fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

// Missing file means defaults; a file we can't parse is logged and ignored.
pub fn load_config(dir: &Path) -> Config {
    let path = config_file_path(dir);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(_) => {
            log::info!("no config at {}, using defaults", path.display());
            return Config::default();
        }
    };
    match serde_json::from_str::<Config>(&data) {
        Ok(config) => config.validated(),
        Err(e) => {
            log::warn!("ignoring malformed config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

impl Config {
    fn validated(mut self) -> Self {
        if !self.step_duration_secs.is_finite() || self.step_duration_secs <= 0.0 {
            log::warn!(
                "step_duration_secs {} is not usable, falling back to {}",
                self.step_duration_secs,
                DEFAULT_STEP_DURATION_SECS
            );
            self.step_duration_secs = DEFAULT_STEP_DURATION_SECS;
        }
        let before = self.initial_playlist.len();
        self.initial_playlist.retain(|&i| i < MAX_PATTERNS);
        if self.initial_playlist.len() != before {
            log::warn!("dropped playlist entries outside 0..{}", MAX_PATTERNS);
        }
        self
    }

    /// Exactly one source per slot, paths resolved against `dir`.
    pub fn slot_sources(&self, dir: &Path) -> [SampleSource; SAMPLE_COUNT] {
        let defaults = default_samples();
        std::array::from_fn(|i| {
            let src = self.samples.get(i).unwrap_or(&defaults[i]);
            SampleSource {
                name: src.name.clone(),
                path: dir.join(&src.path), // absolute paths replace dir
            }
        })
    }

    pub fn playlist(&self) -> Playlist {
        Playlist::from_ids(self.initial_playlist.iter().filter_map(|&i| PatternId::new(i)))
    }
}
