use rand::Rng;
use serde::{Deserialize, Serialize};

use super::phrases::{self, Language};
use crate::error::ChallengeError;

/// Result of judging one input against the target phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVerdict {
    /// The input is a prefix of the target (the empty string always is).
    pub is_prefix_valid: bool,
    /// The input equals the target exactly.
    pub is_complete: bool,
}

/// How a driver should render the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStatus {
    Typing,
    Mistyped,
    Ready,
}

impl InputVerdict {
    pub fn status(self) -> InputStatus {
        match (self.is_prefix_valid, self.is_complete) {
            (_, true) => InputStatus::Ready,
            (true, false) => InputStatus::Typing,
            (false, false) => InputStatus::Mistyped,
        }
    }
}

/// Proof that the deterrent phrase was typed in full.
///
/// Only [`SkipChallenge::commit`] hands these out.
#[derive(Debug)]
pub struct SkipGrant {
    _private: (),
}

/// The phrase a user must retype to cut the current break short.
#[derive(Debug, Clone)]
pub struct SkipChallenge {
    target: String,
    entered: String,
    verdict: InputVerdict,
}

impl SkipChallenge {
    /// Draw a fresh phrase for `language`.
    pub fn begin(language: Language) -> Self {
        Self::begin_with_rng(language, &mut rand::thread_rng())
    }

    pub fn begin_with_rng<R: Rng + ?Sized>(language: Language, rng: &mut R) -> Self {
        Self::with_phrase(phrases::pick(language, rng))
    }

    pub fn with_phrase(phrase: impl Into<String>) -> Self {
        let mut challenge = Self {
            target: phrase.into(),
            entered: String::new(),
            verdict: InputVerdict {
                is_prefix_valid: true,
                is_complete: false,
            },
        };
        challenge.on_input("");
        challenge
    }

    pub fn target_phrase(&self) -> &str {
        &self.target
    }

    pub fn entered_text(&self) -> &str {
        &self.entered
    }

    pub fn verdict(&self) -> InputVerdict {
        self.verdict
    }

    pub fn is_complete(&self) -> bool {
        self.verdict.is_complete
    }

    /// Judge the whole current input. Same text, same verdict.
    pub fn on_input(&mut self, text: &str) -> InputVerdict {
        self.entered.clear();
        self.entered.push_str(text);
        self.verdict = InputVerdict {
            is_prefix_valid: self.target.starts_with(text),
            is_complete: text == self.target,
        };
        self.verdict
    }

    /// Character index of the first typed character that does not match.
    pub fn first_mismatch(&self) -> Option<usize> {
        if self.verdict.is_prefix_valid {
            return None;
        }
        let mut target = self.target.chars();
        self.entered
            .chars()
            .enumerate()
            .find(|(_, c)| target.next() != Some(*c))
            .map(|(i, _)| i)
    }

    /// Redeem a fully typed phrase. Changes nothing when incomplete.
    pub fn commit(&self) -> Result<SkipGrant, ChallengeError> {
        if !self.verdict.is_complete {
            return Err(ChallengeError::Incomplete {
                typed: self.entered.chars().count(),
                required: self.target.chars().count(),
            });
        }
        Ok(SkipGrant { _private: () })
    }
}
