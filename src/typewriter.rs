//! Typewriter headline cycling through a list of phrases.

use crate::config::TypewriterConfig;

/// Error type for typewriter construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypewriterError {
    /// No non-empty phrase to type
    #[error("Typewriter needs at least one non-empty phrase")]
    NoPhrases,
    /// Deleting must be faster than typing
    #[error("Delete interval {delete_ms}ms must be shorter than type interval {type_ms}ms")]
    DeleteNotFaster { type_ms: u32, delete_ms: u32 },
}

/// Step intervals of the typewriter, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypewriterTimings {
    /// Delay before the first character
    pub start_delay_ms: u32,
    /// Delay after typing a character
    pub type_ms: u32,
    /// Delay after deleting a character
    pub delete_ms: u32,
    /// Dwell on a fully typed phrase
    pub dwell_ms: u32,
}

impl Default for TypewriterTimings {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            type_ms: 100,
            delete_ms: 50,
            dwell_ms: 2000,
        }
    }
}

/// Current phase of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypePhase {
    Typing,
    Pausing,
    Deleting,
}

/// Result of one typewriter step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeStep {
    /// Text to display after this step
    pub text: String,
    /// Delay before the next step should run
    pub next_delay_ms: u32,
}

/// Restartable, never-ending typewriter.
///
/// The caller owns the timer: run [`step`] after [`start_delay_ms`], then
/// again after every returned `next_delay_ms`.
///
/// [`step`]: Typewriter::step
/// [`start_delay_ms`]: Typewriter::start_delay_ms
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{Typewriter, TypewriterTimings};
///
/// let mut tw = Typewriter::new(["Hi", "Yo"], TypewriterTimings::default()).unwrap();
/// assert_eq!(tw.step().text, "H");
/// assert_eq!(tw.step().text, "Hi");
/// let pause = tw.step();
/// assert_eq!(pause.text, "Hi");
/// assert_eq!(pause.next_delay_ms, 2000);
/// assert_eq!(tw.step().text, "H");
/// assert_eq!(tw.step().text, "");
/// assert_eq!(tw.step().text, "Y");
/// ```
#[derive(Clone, Debug)]
pub struct Typewriter {
    phrases: Vec<Vec<char>>,
    phrase_index: usize,
    char_index: usize,
    phase: TypePhase,
    timings: TypewriterTimings,
}

impl Typewriter {
    /// Create a typewriter over `phrases`.
    ///
    /// Empty phrases are skipped.
    pub fn new<I, S>(phrases: I, timings: TypewriterTimings) -> Result<Self, TypewriterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if timings.delete_ms >= timings.type_ms {
            return Err(TypewriterError::DeleteNotFaster {
                type_ms: timings.type_ms,
                delete_ms: timings.delete_ms,
            });
        }

        let mut kept = Vec::new();
        for phrase in phrases {
            let chars: Vec<char> = phrase.as_ref().chars().collect();
            if chars.is_empty() {
                log::warn!("typewriter: skipping empty phrase");
                continue;
            }
            kept.push(chars);
        }
        if kept.is_empty() {
            return Err(TypewriterError::NoPhrases);
        }

        Ok(Self {
            phrases: kept,
            phrase_index: 0,
            char_index: 0,
            phase: TypePhase::Typing,
            timings,
        })
    }

    /// Create the headline typewriter from page configuration.
    pub fn from_config(config: &TypewriterConfig) -> Result<Self, TypewriterError> {
        Self::new(&config.phrases, config.timings)
    }

    #[inline]
    pub fn phase(&self) -> TypePhase {
        self.phase
    }

    #[inline]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[inline]
    pub fn start_delay_ms(&self) -> u32 {
        self.timings.start_delay_ms
    }

    /// Text currently displayed.
    pub fn text(&self) -> String {
        self.phrases[self.phrase_index][..self.char_index].iter().collect()
    }

    /// Restart from the first phrase with nothing typed.
    pub fn reset(&mut self) {
        self.phrase_index = 0;
        self.char_index = 0;
        self.phase = TypePhase::Typing;
    }

    /// Advance one unit.
    pub fn step(&mut self) -> TypeStep {
        let len = self.phrases[self.phrase_index].len();

        let next_delay_ms = match self.phase {
            TypePhase::Typing => {
                self.char_index = (self.char_index + 1).min(len);
                if self.char_index == len {
                    self.phase = TypePhase::Pausing;
                }
                self.timings.type_ms
            }
            TypePhase::Pausing => {
                self.phase = TypePhase::Deleting;
                self.timings.dwell_ms
            }
            TypePhase::Deleting => {
                self.char_index = self.char_index.saturating_sub(1);
                if self.char_index == 0 {
                    self.phase = TypePhase::Typing;
                    self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                    // Last deletion runs at the typing pace
                    self.timings.type_ms
                } else {
                    self.timings.delete_ms
                }
            }
        };

        // text() reads the new phrase after a wrap, which is empty there too
        TypeStep {
            text: self.text(),
            next_delay_ms,
        }
    }
}
