//! Data models for the nibble codec
//!
//! - `note`: pitch and timed note/measure descriptors
//! - `attributes`: stream-level time, key and clef

pub mod note;
pub mod attributes;

pub use note::{InvalidStep, MeasureDescriptor, NoteDescriptor, NotePitch, Step};
pub use attributes::{Clef, KeyMode, KeySignature, StreamAttributes, TimeSignature};
