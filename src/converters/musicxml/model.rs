//! Lean parse result for MusicXML -> bytes decoding
//!
//! Only what the nibble decoder needs: part identity and the ordered,
//! tie-resolved sounding notes of each part.
use crate::models::NoteDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScore {
    pub parts: Vec<ParsedPart>,
}

impl ParsedScore {
    /// The part that carries encoded data (single-part convention)
    pub fn first_part(&self) -> Option<&ParsedPart> {
        self.parts.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPart {
    pub id: String,
    /// `<part-name>` from the part list, empty if absent
    pub name: String,
    /// First `<divisions>` seen in the part (ticks per quarter)
    pub divisions: u32,
    /// One entry per sounding event in document order; ticks are in divisions
    pub notes: Vec<NoteDescriptor>,
}
