//! Nibble <-> note mapping
//!
//! Bit layout of a nibble, least significant first:
//!
//! | bits | meaning                     |
//! |------|-----------------------------|
//! | 1:0  | step index into C, D, E, F  |
//! | 2    | accidental (0 flat, 1 sharp)|
//! | 3    | octave (0 -> 4, 1 -> 5)     |

use serde::{Deserialize, Serialize};

use super::errors::{CodecError, NoteError};
use crate::models::{NotePitch, Step};

const STEPS: [Step; 4] = [Step::C, Step::D, Step::E, Step::F];

const BASE_OCTAVE: i8 = 4;

/// How the decoder treats a natural (`alter == 0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NaturalPolicy {
    /// Read naturals as sharps (any non-negative alter sets the accidental bit)
    #[default]
    AsSharp,
    /// Reject naturals like any other out-of-alphabet note
    Reject,
}

/// Convert a 4-bit value into its note pitch
pub fn encode_nibble(nibble: u8) -> Result<NotePitch, CodecError> {
    if nibble > 0xF {
        return Err(CodecError::NibbleOutOfRange(nibble));
    }

    let step = STEPS[(nibble & 0b11) as usize];
    let alter = if (nibble >> 2) & 0b1 == 0 { -1 } else { 1 };
    let octave = BASE_OCTAVE + ((nibble >> 3) & 0b1) as i8;

    Ok(NotePitch::new(step, alter, octave))
}

/// Convert a pitch back into its nibble, reading naturals as sharps
pub fn decode_nibble(step: Step, alter: i8, octave: i8) -> Result<u8, NoteError> {
    decode_nibble_with(step, alter, octave, NaturalPolicy::AsSharp)
}

pub fn decode_nibble_with(
    step: Step,
    alter: i8,
    octave: i8,
    naturals: NaturalPolicy,
) -> Result<u8, NoteError> {
    let pitch_bits = match step {
        Step::C => 0,
        Step::D => 1,
        Step::E => 2,
        Step::F => 3,
        other => return Err(NoteError::UnknownStep(other)),
    };

    let accidental_bit = match (alter, naturals) {
        (a, _) if a < 0 => 0,
        (0, NaturalPolicy::Reject) => return Err(NoteError::NaturalAccidental),
        _ => 1,
    };

    let octave_bit = match octave {
        4 => 0,
        5 => 1,
        other => return Err(NoteError::UnsupportedOctave(other)),
    };

    Ok((octave_bit << 3) | (accidental_bit << 2) | pitch_bits)
}

/// Split a byte into `(high, low)` nibbles
pub fn split_byte(byte: u8) -> (u8, u8) {
    ((byte >> 4) & 0xF, byte & 0xF)
}

pub fn join_nibbles(high: u8, low: u8) -> u8 {
    ((high & 0xF) << 4) | (low & 0xF)
}
