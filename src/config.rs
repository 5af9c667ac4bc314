//! Animation configuration.
//!
//! Timing is accepted as signed milliseconds so that the command line and
//! script files can express anything the user types; validation into
//! [`Timing`] happens when an animation starts. Values are layered as
//! defaults, then script file, then command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::{AnimationError, AppError};
use crate::state::NextTick;

/// Delay between typed characters.
pub const DEFAULT_TYPING_DELAY_MS: i64 = 100;
/// Delay between deleted characters.
pub const DEFAULT_DELETING_DELAY_MS: i64 = 50;
/// Dwell time once an entry is fully typed.
pub const DEFAULT_PAUSE_AFTER_TYPED_MS: i64 = 2000;
/// Per-character delay of a one-shot reveal.
pub const DEFAULT_REVEAL_DELAY_MS: i64 = 20;

/// Validated timing for a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub typing: Duration,
    pub deleting: Duration,
    pub pause_after_typed: Duration,
    /// Delay before the first tick.
    pub start_delay: Duration,
}

impl Timing {
    /// Delay to wait before the tick following a step that returned `next`.
    pub fn delay_for(&self, next: NextTick) -> Option<Duration> {
        match next {
            NextTick::Type => Some(self.typing),
            NextTick::Pause => Some(self.pause_after_typed),
            NextTick::Delete => Some(self.deleting),
            NextTick::Done => None,
        }
    }
}

/// Raw settings for a cycling animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    pub typing_delay_ms: i64,
    pub deleting_delay_ms: i64,
    pub pause_after_typed_ms: i64,
    pub start_delay_ms: i64,
    /// Number of full passes over the sequence before finishing.
    /// `None` cycles until stopped.
    pub cycles: Option<u32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: DEFAULT_TYPING_DELAY_MS,
            deleting_delay_ms: DEFAULT_DELETING_DELAY_MS,
            pause_after_typed_ms: DEFAULT_PAUSE_AFTER_TYPED_MS,
            start_delay_ms: 0,
            cycles: None,
        }
    }
}

impl AnimationConfig {
    pub fn timing(&self) -> Result<Timing, AnimationError> {
        Ok(Timing {
            typing: millis("typing_delay_ms", self.typing_delay_ms)?,
            deleting: millis("deleting_delay_ms", self.deleting_delay_ms)?,
            pause_after_typed: millis("pause_after_typed_ms", self.pause_after_typed_ms)?,
            start_delay: millis("start_delay_ms", self.start_delay_ms)?,
        })
    }

    /// Validated cycle limit.
    pub fn cycle_limit(&self) -> Result<Option<u32>, AnimationError> {
        match self.cycles {
            Some(0) => Err(AnimationError::invalid("cycles must be at least 1")),
            other => Ok(other),
        }
    }
}

/// Raw settings for a one-shot reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    pub delay_ms: i64,
    pub start_delay_ms: i64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_REVEAL_DELAY_MS,
            start_delay_ms: 0,
        }
    }
}

impl RevealConfig {
    pub fn timing(&self) -> Result<Timing, AnimationError> {
        let delay = millis("delay_ms", self.delay_ms)?;
        Ok(Timing {
            typing: delay,
            deleting: delay,
            pause_after_typed: Duration::ZERO,
            start_delay: millis("start_delay_ms", self.start_delay_ms)?,
        })
    }
}

fn millis(name: &str, value: i64) -> Result<Duration, AnimationError> {
    u64::try_from(value)
        .map(Duration::from_millis)
        .map_err(|_| AnimationError::invalid(format!("{name} must not be negative (got {value})")))
}

/// Command-line overrides. `None` keeps the underlying value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub typing_delay_ms: Option<i64>,
    pub deleting_delay_ms: Option<i64>,
    pub pause_after_typed_ms: Option<i64>,
    pub start_delay_ms: Option<i64>,
    pub cycles: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(&self, base: AnimationConfig) -> AnimationConfig {
        AnimationConfig {
            typing_delay_ms: self.typing_delay_ms.unwrap_or(base.typing_delay_ms),
            deleting_delay_ms: self.deleting_delay_ms.unwrap_or(base.deleting_delay_ms),
            pause_after_typed_ms: self
                .pause_after_typed_ms
                .unwrap_or(base.pause_after_typed_ms),
            start_delay_ms: self.start_delay_ms.unwrap_or(base.start_delay_ms),
            cycles: self.cycles.or(base.cycles),
        }
    }
}

/// A script file: the entries to cycle plus optional timing. Missing timing
/// fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub entries: Vec<String>,
    pub typing_delay_ms: Option<i64>,
    pub deleting_delay_ms: Option<i64>,
    pub pause_after_typed_ms: Option<i64>,
    pub start_delay_ms: Option<i64>,
    pub cycles: Option<u32>,
}

impl Script {
    /// Parse a script, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ScriptFormat::Yaml
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => ScriptFormat::Json,
            _ => {
                return Err(AppError::UnsupportedScriptFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let source = read_file(path)?;
        let script: Script = match format {
            ScriptFormat::Yaml => serde_yml::from_str(&source)?,
            ScriptFormat::Json => serde_json::from_str(&source)?,
        };
        tracing::debug!(path = %path.display(), ?format, "loaded script");
        Ok(script)
    }

    /// Script values layered over the defaults.
    pub fn animation_config(&self) -> AnimationConfig {
        let layer = ConfigOverrides {
            typing_delay_ms: self.typing_delay_ms,
            deleting_delay_ms: self.deleting_delay_ms,
            pause_after_typed_ms: self.pause_after_typed_ms,
            start_delay_ms: self.start_delay_ms,
            cycles: self.cycles,
        };
        layer.apply(AnimationConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
enum ScriptFormat {
    Yaml,
    Json,
}

/// Read a UTF-8 text file, keeping the path in the error.
pub fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::FileAccess {
        path: PathBuf::from(path),
        source,
    })
}
