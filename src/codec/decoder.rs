//! Note descriptors -> byte stream
//!
//! Input is one descriptor per sounding event, in document order, with tied
//! notes already merged. Notes outside the alphabet are skipped; a dangling
//! final nibble is padded into the high half of one last byte.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{CodecError, EmptyInput, NoteError};
use super::nibble::{decode_nibble_with, join_nibbles, NaturalPolicy};
use crate::models::NoteDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DecoderConfig {
    /// Record (and log) warnings for skipped notes and padding
    pub validate: bool,
    pub naturals: NaturalPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            validate: true,
            naturals: NaturalPolicy::AsSharp,
        }
    }
}

/// Advisory finding from a decode pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeWarning {
    /// Note at `index` (document order) contributed no nibble
    SkippedNote { index: usize, id: String, reason: NoteError },
    /// Final nibble was padded with a zero low half
    OddNibbleCount { count: usize },
    NoValidNibbles,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::SkippedNote { index, id, reason } => {
                if id.is_empty() {
                    write!(f, "skipping note #{}: {}", index, reason)
                } else {
                    write!(f, "skipping note #{} ({}): {}", index, id, reason)
                }
            }
            DecodeWarning::OddNibbleCount { count } => {
                write!(f, "odd number of nibbles ({}); last nibble padded with 0", count)
            }
            DecodeWarning::NoValidNibbles => write!(f, "no valid nibbles extracted from notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    /// Nibbles that survived, before pairing
    pub nibble_count: usize,
    pub warnings: Vec<DecodeWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct StreamDecoder {
    config: DecoderConfig,
}

impl StreamDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn decode(&self, notes: &[NoteDescriptor]) -> Result<Decoded, CodecError> {
        if notes.is_empty() {
            return Err(CodecError::EmptyInput(EmptyInput::NoNotes));
        }

        let mut warnings = Vec::new();
        let nibbles = self.extract_nibbles(notes, &mut warnings);

        if nibbles.is_empty() {
            self.warn(&mut warnings, DecodeWarning::NoValidNibbles);
        }
        if nibbles.len() % 2 == 1 {
            self.warn(&mut warnings, DecodeWarning::OddNibbleCount { count: nibbles.len() });
        }

        let bytes = pack_nibbles(&nibbles);
        log::debug!("decoded {} notes into {} nibbles, {} bytes", notes.len(), nibbles.len(), bytes.len());

        Ok(Decoded {
            bytes,
            nibble_count: nibbles.len(),
            warnings,
        })
    }

    fn extract_nibbles(&self, notes: &[NoteDescriptor], warnings: &mut Vec<DecodeWarning>) -> Vec<u8> {
        let mut nibbles = Vec::with_capacity(notes.len());

        for (index, note) in notes.iter().enumerate() {
            match decode_nibble_with(note.step, note.alter, note.octave, self.config.naturals) {
                Ok(nibble) => nibbles.push(nibble),
                Err(reason) => self.warn(
                    warnings,
                    DecodeWarning::SkippedNote {
                        index,
                        id: note.id.clone(),
                        reason,
                    },
                ),
            }
        }

        nibbles
    }

    fn warn(&self, warnings: &mut Vec<DecodeWarning>, warning: DecodeWarning) {
        if self.config.validate {
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }
}

/// Pair nibbles into bytes, high nibble first
///
/// An odd trailing nibble becomes the high half of a final byte.
pub fn pack_nibbles(nibbles: &[u8]) -> Vec<u8> {
    nibbles
        .chunks(2)
        .map(|pair| match pair {
            [high, low] => join_nibbles(*high, *low),
            [high] => join_nibbles(*high, 0),
            _ => 0,
        })
        .collect()
}

pub fn decode_notes(notes: &[NoteDescriptor], config: &DecoderConfig) -> Result<Decoded, CodecError> {
    StreamDecoder::new(*config).decode(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::nibble::encode_nibble;
    use crate::models::{NotePitch, Step};

    fn note(index: usize, step: Step, alter: i8, octave: i8) -> NoteDescriptor {
        let start = index as u64 * 480;
        NoteDescriptor::new(format!("n{}", index), NotePitch::new(step, alter, octave), start, start + 480)
    }

    fn notes_for(nibbles: &[u8]) -> Vec<NoteDescriptor> {
        nibbles
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let p = encode_nibble(n).unwrap();
                note(i, p.step, p.alter, p.octave)
            })
            .collect()
    }

    #[test]
    fn test_decode_h() {
        let notes = vec![note(0, Step::C, 1, 4), note(1, Step::C, -1, 5)];
        let decoded = StreamDecoder::default().decode(&notes).unwrap();
        assert_eq!(decoded.bytes, vec![0x48]);
        assert_eq!(decoded.nibble_count, 2);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_empty_sequence_is_fatal() {
        assert_eq!(
            StreamDecoder::default().decode(&[]),
            Err(CodecError::EmptyInput(EmptyInput::NoNotes))
        );
    }

    #[test]
    fn test_odd_nibble_count_pads_low_half() {
        let decoded = StreamDecoder::default().decode(&notes_for(&[4, 8, 0xA])).unwrap();
        assert_eq!(decoded.bytes, vec![0x48, 0xA0]);
        assert_eq!(decoded.warnings, vec![DecodeWarning::OddNibbleCount { count: 3 }]);
    }

    #[test]
    fn test_unknown_step_skipped_without_aborting() {
        let mut notes = notes_for(&[4, 8]);
        notes.insert(1, note(9, Step::G, 1, 4));

        let decoded = StreamDecoder::default().decode(&notes).unwrap();
        assert_eq!(decoded.bytes, vec![0x48]);
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::SkippedNote {
                index: 1,
                id: "n9".to_string(),
                reason: NoteError::UnknownStep(Step::G),
            }]
        );
    }

    #[test]
    fn test_unsupported_octave_skipped() {
        let notes = vec![note(0, Step::C, 1, 3), note(1, Step::D, 1, 4)];
        let decoded = StreamDecoder::default().decode(&notes).unwrap();
        // Only D#4 (nibble 5) survives, padded
        assert_eq!(decoded.bytes, vec![0x50]);
        assert_eq!(decoded.warnings.len(), 2);
        assert!(matches!(
            decoded.warnings[0],
            DecodeWarning::SkippedNote { reason: NoteError::UnsupportedOctave(3), .. }
        ));
    }

    #[test]
    fn test_all_notes_skipped() {
        let notes = vec![note(0, Step::A, 0, 4), note(1, Step::B, 0, 4)];
        let decoded = StreamDecoder::default().decode(&notes).unwrap();
        assert!(decoded.bytes.is_empty());
        assert_eq!(decoded.warnings.last(), Some(&DecodeWarning::NoValidNibbles));
    }

    #[test]
    fn test_no_warnings_recorded_without_validate() {
        let decoder = StreamDecoder::new(DecoderConfig { validate: false, ..DecoderConfig::default() });
        let notes = vec![note(0, Step::G, 1, 4), note(1, Step::C, 1, 4)];
        let decoded = decoder.decode(&notes).unwrap();
        assert_eq!(decoded.bytes, vec![0x40]);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_natural_decodes_as_sharp() {
        let notes = vec![note(0, Step::C, 0, 4), note(1, Step::C, -1, 5)];
        let decoded = StreamDecoder::default().decode(&notes).unwrap();
        assert_eq!(decoded.bytes, vec![0x48]);
    }

    #[test]
    fn test_natural_rejected_by_policy() {
        let decoder = StreamDecoder::new(DecoderConfig { validate: true, naturals: NaturalPolicy::Reject });
        let notes = vec![note(0, Step::C, 0, 4), note(1, Step::C, -1, 5)];
        let decoded = decoder.decode(&notes).unwrap();
        assert_eq!(decoded.bytes, vec![0x80]);
        assert!(matches!(
            decoded.warnings[0],
            DecodeWarning::SkippedNote { reason: NoteError::NaturalAccidental, .. }
        ));
    }

    #[test]
    fn test_pack_nibbles() {
        assert_eq!(pack_nibbles(&[]), Vec::<u8>::new());
        assert_eq!(pack_nibbles(&[1]), vec![0x10]);
        assert_eq!(pack_nibbles(&[1, 2, 3, 4, 5]), vec![0x12, 0x34, 0x50]);
    }
}
