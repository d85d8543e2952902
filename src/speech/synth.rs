use anyhow::Result;

use super::{SpeechBackend, SpeechRate};
use crate::state::SpeechSettings;

/// Platform speech synthesizer via the `tts` crate.
/// A fresh engine is created for every word and dropped afterwards.
pub struct SynthesizerBackend {
    volume: f32,
    preferred_voice: Option<String>,
}

impl SynthesizerBackend {
    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self {
            volume: settings.volume.clamp(0.0, 1.0),
            preferred_voice: settings.preferred_voice.clone(),
        }
    }
}

/// Map words per minute onto an engine's native rate range, `DEFAULT` wpm being its normal rate.
pub fn engine_rate(rate: SpeechRate, min: f32, normal: f32, max: f32) -> f32 {
    let scaled = normal * rate.get() as f32 / SpeechRate::DEFAULT as f32;
    scaled.clamp(min, max)
}

/// Pick an English voice unless a preference is configured.
pub fn voice_matches(id: &str, name: &str, preferred: Option<&str>) -> bool {
    let id = id.to_lowercase();
    let name = name.to_lowercase();
    match preferred {
        Some(wanted) => {
            let wanted = wanted.to_lowercase();
            id.contains(&wanted) || name.contains(&wanted)
        }
        None => id.contains("en") || name.contains("english"),
    }
}

impl SpeechBackend for SynthesizerBackend {
    fn name(&self) -> &str {
        "synthesizer"
    }

    #[cfg(not(target_os = "linux"))]
    fn speak(&self, word: &str, rate: SpeechRate) -> Result<()> {
        let mut tts = tts::Tts::default()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech synthesizer: {}", e))?;
        let features = tts.supported_features();

        if features.rate {
            let native = engine_rate(rate, tts.min_rate(), tts.normal_rate(), tts.max_rate());
            tts.set_rate(native)
                .map_err(|e| anyhow::anyhow!("Failed to set rate: {}", e))?;
        }
        if features.volume {
            tts.set_volume(self.volume)
                .map_err(|e| anyhow::anyhow!("Failed to set volume: {}", e))?;
        }
        if features.voice {
            let voices = tts.voices().unwrap_or_default();
            let preferred = self.preferred_voice.as_deref();
            if let Some(voice) = voices
                .iter()
                .find(|v| voice_matches(&v.id(), &v.name(), preferred))
            {
                tracing::debug!("Using voice {} ({})", voice.name(), voice.id());
                if let Err(e) = tts.set_voice(voice) {
                    tracing::warn!("Failed to select voice {}: {}", voice.id(), e);
                }
            }
        }

        tts.speak(word, false)
            .map_err(|e| anyhow::anyhow!("Speech synthesis failed: {}", e))?;

        if features.is_speaking {
            std::thread::sleep(std::time::Duration::from_millis(50));
            while tts.is_speaking().unwrap_or(false) {
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
        }

        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn speak(&self, _word: &str, _rate: SpeechRate) -> Result<()> {
        let _ = (self.volume, &self.preferred_voice);
        anyhow::bail!("Speech synthesizer is not available on this platform")
    }
}
