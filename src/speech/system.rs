use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::{SpeechBackend, SpeechRate};
use crate::state::SpeechSettings;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// OS speech command, invoked as `<program> -r <rate> <word>` (macOS `say`)
pub struct SystemCommandBackend {
    program: String,
    timeout: Duration,
}

impl SystemCommandBackend {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(&settings.command, Duration::from_secs(settings.timeout_secs))
    }

    fn build_command(&self, word: &str, rate: SpeechRate) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-r")
            .arg(rate.get().to_string())
            .arg(word)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SpeechBackend for SystemCommandBackend {
    fn name(&self) -> &str {
        "system"
    }

    fn speak(&self, word: &str, rate: SpeechRate) -> Result<()> {
        tracing::debug!("Running {} -r {} {}", self.program, rate, word);

        let mut child = self
            .build_command(word, rate)
            .spawn()
            .with_context(|| format!("Speech command '{}' is not available", self.program))?;

        // Drained while the command runs so a chatty command cannot fill the pipe.
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        anyhow::bail!(
                            "Speech command timed out after {}s",
                            self.timeout.as_secs()
                        );
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        if status.success() {
            return Ok(());
        }

        let stderr = stderr
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();
        anyhow::bail!("Speech command exited with {}: {}", status, stderr.trim())
    }
}
