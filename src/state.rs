use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::controller::ReaderController;
use crate::speech::Pronouncer;

pub struct AppState {
    pub reader: Mutex<ReaderController>,
    pub settings: Mutex<Settings>,
}

impl AppState {
    pub fn new() -> Self {
        let settings = Settings::default();
        Self {
            reader: Mutex::new(ReaderController::new(Pronouncer::from_settings(&settings.speech))),
            settings: Mutex::new(settings),
        }
    }

    /// Install new settings and rebuild the speech chain from them.
    pub fn apply_settings(&self, settings: Settings) {
        let pronouncer = Pronouncer::from_settings(&settings.speech);
        self.reader.lock().unwrap().set_pronouncer(pronouncer);
        *self.settings.lock().unwrap() = settings;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub general: GeneralSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Program invoked as `<command> -r <rate> <word>`
    pub command: String,
    pub timeout_secs: u64,
    /// Synthesizer volume, 0.0 to 1.0
    pub volume: f32,
    /// Substring of a synthesizer voice id or name; English when unset
    pub preferred_voice: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            command: "say".to_string(),
            timeout_secs: 10,
            volume: 0.9,
            preferred_voice: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory of the last document opened successfully
    pub last_directory: Option<PathBuf>,
}

impl GeneralSettings {
    /// Where the open dialog starts.
    pub fn dialog_directory(&self) -> Option<PathBuf> {
        self.last_directory
            .clone()
            .filter(|dir| dir.is_dir())
            .or_else(dirs::document_dir)
    }
}
