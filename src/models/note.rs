//! Note and measure descriptors
//!
//! These are the units exchanged between the codec and the notation layer.
//! On encode they are produced by the stream encoder; on decode they are
//! read back out of a parsed document's first part.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Diatonic step letter as written in a MusicXML `<step>` element
///
/// The codec alphabet only uses C, D, E and F. The remaining letters exist so
/// foreign documents can be represented faithfully and rejected per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a step letter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a step letter (A-G)")]
pub struct InvalidStep(pub String);

impl FromStr for Step {
    type Err = InvalidStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" => Ok(Step::C),
            "D" => Ok(Step::D),
            "E" => Ok(Step::E),
            "F" => Ok(Step::F),
            "G" => Ok(Step::G),
            "A" => Ok(Step::A),
            "B" => Ok(Step::B),
            other => Err(InvalidStep(other.to_string())),
        }
    }
}

/// Pitch fields of a note: the part of a descriptor that carries data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotePitch {
    pub step: Step,
    /// Semitone alteration (-1 = flat, 0 = natural, 1 = sharp)
    pub alter: i8,
    /// Scientific octave (4 = the octave starting at middle C)
    pub octave: i8,
}

impl NotePitch {
    pub fn new(step: Step, alter: i8, octave: i8) -> Self {
        Self { step, alter, octave }
    }
}

impl fmt::Display for NotePitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.alter {
            a if a < 0 => "b",
            0 => "",
            _ => "#",
        };
        write!(f, "{}{}{}", self.step, accidental, self.octave)
    }
}

/// One sounding note event
///
/// `start_tick`/`end_tick` form a half-open interval in document divisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDescriptor {
    /// Sequence label (`n0`, `n1`, ...). Traceability only.
    pub id: String,
    pub step: Step,
    pub alter: i8,
    pub octave: i8,
    pub voice: u8,
    pub start_tick: u64,
    pub end_tick: u64,
}

impl NoteDescriptor {
    pub fn new(id: impl Into<String>, pitch: NotePitch, start_tick: u64, end_tick: u64) -> Self {
        Self {
            id: id.into(),
            step: pitch.step,
            alter: pitch.alter,
            octave: pitch.octave,
            voice: 1,
            start_tick,
            end_tick,
        }
    }

    pub fn pitch(&self) -> NotePitch {
        NotePitch::new(self.step, self.alter, self.octave)
    }

    pub fn duration(&self) -> u64 {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

/// A bar grouping consecutive notes
///
/// The span is the nominal bar length (`notes_per_measure` quarters), so a
/// partially filled final measure still reports the full span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDescriptor {
    /// 1-based measure number
    pub number: u32,
    pub start_tick: u64,
    pub end_tick: u64,
    /// Index of the first note of this measure in the stream's note list
    pub first_note: usize,
    pub note_count: usize,
}

impl MeasureDescriptor {
    /// Slice of `notes` belonging to this measure
    pub fn notes<'a>(&self, notes: &'a [NoteDescriptor]) -> &'a [NoteDescriptor] {
        let end = (self.first_note + self.note_count).min(notes.len());
        let start = self.first_note.min(end);
        &notes[start..end]
    }
}
