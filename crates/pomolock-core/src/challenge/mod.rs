//! Break-skip confirmation.
//!
//! A break can only be cut short by retyping a randomly chosen deterrent
//! phrase exactly. [`SkipChallenge`] holds the phrase for one break and
//! judges each input against it; [`phrases`] is the bilingual corpus the
//! phrase is drawn from.

pub mod phrases;
mod skip;

pub use phrases::Language;
pub use skip::{InputStatus, InputVerdict, SkipChallenge, SkipGrant};
