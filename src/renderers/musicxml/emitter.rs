//! MusicXML emitter
//!
//! Walks an [`EncodedStream`] measure by measure and feeds the builder.

use super::builder::MusicXmlBuilder;
use crate::codec::EncodedStream;

/// Render an encoded stream as a MusicXML 3.1 partwise document
pub fn emit_musicxml(stream: &EncodedStream) -> String {
    let mut builder = MusicXmlBuilder::new(stream.quarter_duration);
    builder.set_part_name(&stream.part_name);
    builder.set_attributes(stream.attributes);

    for measure in &stream.measures {
        builder.start_measure();
        for note in measure.notes(&stream.notes) {
            builder.write_note(note);
        }
        builder.end_measure();
    }

    let xml = builder.finalize();
    log::debug!(
        "MusicXML emitted: {} measures, {} notes, {} bytes",
        stream.measures.len(),
        stream.notes.len(),
        xml.len()
    );
    xml
}
