pub mod synth;
pub mod system;

use std::io::Write;

use anyhow::Result;

use crate::state::SpeechSettings;

/// Speaking rate in words per minute, shared by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpeechRate(u32);

impl SpeechRate {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 300;
    pub const STEP: u32 = 25;
    pub const DEFAULT: u32 = 150;

    pub fn new(words_per_minute: u32) -> Self {
        Self(words_per_minute.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn increase(&mut self) -> u32 {
        self.0 = (self.0 + Self::STEP).min(Self::MAX);
        self.0
    }

    pub fn decrease(&mut self) -> u32 {
        self.0 = self.0.saturating_sub(Self::STEP).max(Self::MIN);
        self.0
    }

    pub fn reset(&mut self) -> u32 {
        self.0 = Self::DEFAULT;
        self.0
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl std::fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One way of getting a word spoken. Backends are tried in order.
pub trait SpeechBackend: Send {
    fn name(&self) -> &str;
    fn speak(&self, word: &str, rate: SpeechRate) -> Result<()>;
}

/// Outcome of a pronunciation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pronunciation {
    /// Nothing left to say after cleaning; no backend was invoked.
    Skipped,
    Spoken { backend: String, word: String },
    /// Every backend failed.
    Silent { word: String },
}

/// Keep ASCII letters only.
pub fn clean_word(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphabetic).collect()
}

pub struct Pronouncer {
    backends: Vec<Box<dyn SpeechBackend>>,
}

impl Pronouncer {
    pub fn new(backends: Vec<Box<dyn SpeechBackend>>) -> Self {
        Self { backends }
    }

    /// System command first, then the platform synthesizer.
    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(vec![
            Box::new(system::SystemCommandBackend::from_settings(settings)),
            Box::new(synth::SynthesizerBackend::from_settings(settings)),
        ])
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn pronounce(&self, raw: &str, rate: SpeechRate) -> Pronunciation {
        let word = clean_word(raw);
        if word.is_empty() {
            tracing::info!("Nothing to pronounce in {:?}", raw);
            return Pronunciation::Skipped;
        }

        tracing::info!("Pronouncing '{}' at {} wpm", word, rate);

        for backend in &self.backends {
            match backend.speak(&word, rate) {
                Ok(()) => {
                    tracing::info!("'{}' spoken via {}", word, backend.name());
                    return Pronunciation::Spoken {
                        backend: backend.name().to_string(),
                        word,
                    };
                }
                Err(e) => {
                    tracing::warn!("{} could not speak '{}': {:#}", backend.name(), word, e);
                }
            }
        }

        tracing::warn!("All speech backends failed for '{}'", word);
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\x07");
        let _ = stderr.flush();

        Pronunciation::Silent { word }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    pub(crate) type CallLog = Arc<Mutex<Vec<(String, String, u32)>>>;

    /// Records every call and succeeds or fails as configured.
    pub(crate) struct FakeBackend {
        pub name: &'static str,
        pub succeed: bool,
        pub calls: CallLog,
    }

    impl SpeechBackend for FakeBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn speak(&self, word: &str, rate: SpeechRate) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((self.name.to_string(), word.to_string(), rate.get()));
            if self.succeed {
                Ok(())
            } else {
                anyhow::bail!("{} unavailable", self.name)
            }
        }
    }

    pub(crate) fn fake_chain(primary_ok: bool, fallback_ok: bool) -> (Pronouncer, CallLog) {
        let calls = CallLog::default();
        let pronouncer = Pronouncer::new(vec![
            Box::new(FakeBackend { name: "primary", succeed: primary_ok, calls: calls.clone() }),
            Box::new(FakeBackend { name: "fallback", succeed: fallback_ok, calls: calls.clone() }),
        ]);
        (pronouncer, calls)
    }

    #[test]
    fn rate_steps_and_clamps() {
        let mut rate = SpeechRate::default();
        assert_eq!(rate.get(), 150);
        for _ in 0..5 {
            rate.increase();
        }
        assert_eq!(rate.get(), 275);
        assert_eq!(rate.increase(), 300);
        assert_eq!(rate.increase(), 300);

        for _ in 0..20 {
            rate.decrease();
        }
        assert_eq!(rate.get(), 50);
        assert_eq!(rate.reset(), 150);
    }

    #[test]
    fn reset_ignores_prior_value() {
        let mut rate = SpeechRate::new(300);
        assert_eq!(rate.reset(), 150);
        let mut rate = SpeechRate::new(50);
        assert_eq!(rate.reset(), 150);
    }

    #[test]
    fn new_rate_is_clamped() {
        assert_eq!(SpeechRate::new(10).get(), 50);
        assert_eq!(SpeechRate::new(999).get(), 300);
    }

    #[test]
    fn clean_word_keeps_ascii_letters_only() {
        assert_eq!(clean_word("hello!"), "hello");
        assert_eq!(clean_word("  ice-cream 2x "), "icecreamx");
        assert_eq!(clean_word("café"), "caf");
        assert_eq!(clean_word("!!!"), "");
    }

    #[test]
    fn punctuation_only_invokes_no_backend() {
        let (pronouncer, calls) = fake_chain(true, true);
        assert_eq!(pronouncer.pronounce("!!!", SpeechRate::default()), Pronunciation::Skipped);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn primary_success_short_circuits() {
        let (pronouncer, calls) = fake_chain(true, true);
        let outcome = pronouncer.pronounce("hello!", SpeechRate::new(200));
        assert_eq!(
            outcome,
            Pronunciation::Spoken { backend: "primary".into(), word: "hello".into() }
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec![("primary".to_string(), "hello".to_string(), 200)]
        );
    }

    #[test]
    fn primary_failure_falls_through_to_fallback() {
        let (pronouncer, calls) = fake_chain(false, true);
        let outcome = pronouncer.pronounce("world", SpeechRate::default());
        assert_eq!(
            outcome,
            Pronunciation::Spoken { backend: "fallback".into(), word: "world".into() }
        );
        let names: Vec<String> = calls.lock().unwrap().iter().map(|c| c.0.clone()).collect();
        assert_eq!(names, vec!["primary", "fallback"]);
    }

    #[test]
    fn all_backends_failing_is_silent() {
        let (pronouncer, calls) = fake_chain(false, false);
        let outcome = pronouncer.pronounce("quiet", SpeechRate::default());
        assert_eq!(outcome, Pronunciation::Silent { word: "quiet".into() });
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn default_chain_order() {
        let pronouncer = Pronouncer::from_settings(&SpeechSettings::default());
        assert_eq!(pronouncer.backend_names(), vec!["system", "synthesizer"]);
    }
}
