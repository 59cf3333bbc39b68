use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or
/// `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioSettings::default(),
            ui: UiSettings::default(),
            controls: ControlsSettings::default(),
            library: LibrarySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial master gain (1.0 = unity; values above 1 boost).
    pub volume: f32,
    /// Analysis window in samples. Must be a power of two.
    pub fft_size: usize,
    /// Per-bin time smoothing for the analyser, in `[0, 1)`.
    pub smoothing: f32,
    /// Magnitudes at or below this many dB render as 0.
    pub min_db: f32,
    /// Magnitudes at or above this many dB render as 255.
    pub max_db: f32,
    /// Startup gain (dB) for each of the 10 equalizer bands.
    pub eq_gains_db: Vec<f32>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fft_size: 256,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            eq_gains_db: vec![0.0; 10],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text shown in the header while nothing is playing.
    pub header_text: String,

    /// How many times per second the VU needle refreshes.
    pub refresh_hz: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "VIVACE RETRO PLAYER".to_string(),
            refresh_hz: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Gain change per volume keypress.
    pub volume_step: f32,
    /// Gain change (dB) per equalizer keypress.
    pub band_step_db: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 0.05,
            band_step_db: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while picking files.
    pub follow_links: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            recursive: true,
            max_depth: None,
        }
    }
}
