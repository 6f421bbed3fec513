//! Stream-level musical attributes
//!
//! Every encoded document carries the same attributes, applied once at tick 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        }
    }
}

/// Key signature as a circle of fifths position (-7 to +7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    pub fifths: i8,
    pub mode: KeyMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clef {
    /// Clef sign letter (`G`, `F`, `C`)
    pub sign: char,
    pub line: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAttributes {
    pub time: TimeSignature,
    pub key: KeySignature,
    pub clef: Clef,
    pub start_tick: u64,
}

impl Default for StreamAttributes {
    /// 4/4, C major, treble clef
    fn default() -> Self {
        Self {
            time: TimeSignature { beats: 4, beat_type: 4 },
            key: KeySignature { fifths: 0, mode: KeyMode::Major },
            clef: Clef { sign: 'G', line: 2 },
            start_tick: 0,
        }
    }
}
