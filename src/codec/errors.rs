//! Error types for the nibble codec
//!
//! `CodecError` is fatal to a whole encode/decode call. `NoteError` is a
//! per-note decode failure: the stream decoder recovers from it by skipping
//! the note.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Step;

/// Fatal codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Nibble value outside 0-15 (an internal invariant violation)
    #[error("nibble must be 0-15 (got {0})")]
    NibbleOutOfRange(u8),

    /// Encoder parameter that must be strictly positive is not
    #[error("invalid configuration: {parameter} must be greater than 0")]
    InvalidConfiguration { parameter: &'static str },

    /// Nothing to decode
    #[error("{0}")]
    EmptyInput(EmptyInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmptyInput {
    #[error("no parts found in document")]
    NoParts,
    #[error("no notes found in document")]
    NoNotes,
}

/// Per-note decode failures
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum NoteError {
    #[error("unknown step: {0}")]
    UnknownStep(Step),

    #[error("octave must be 4 or 5 (got {0})")]
    UnsupportedOctave(i8),

    /// Only raised when naturals are configured to be rejected
    #[error("natural accidental is not part of the alphabet")]
    NaturalAccidental,
}
