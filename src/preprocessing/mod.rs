//! Input preprocessing
//!
//! Normalizes raw pitch readings into [`sequence::PitchSequence`] values at
//! the engine boundary. Unvoiced markers are preserved in place so frame
//! indices keep their time meaning.

pub mod sequence;
