// MusicXML builder state machine

use crate::models::{NoteDescriptor, StreamAttributes};

/// State machine for building MusicXML documents
pub struct MusicXmlBuilder {
    buffer: String,
    measure_number: u32,
    measure_started: bool,
    attributes_written: bool,
    part_id: String,
    part_name: String,
    divisions: u32,
    attributes: StreamAttributes,
}

impl MusicXmlBuilder {
    /// Create a new MusicXML builder
    ///
    /// `divisions` is the number of ticks per quarter note.
    pub fn new(divisions: u32) -> Self {
        Self {
            buffer: String::new(),
            measure_number: 1,
            measure_started: false,
            attributes_written: false,
            part_id: "P1".to_string(),
            part_name: String::new(),
            divisions,
            attributes: StreamAttributes::default(),
        }
    }

    pub fn set_part_name(&mut self, name: &str) {
        self.part_name = name.to_string();
    }

    pub fn set_attributes(&mut self, attributes: StreamAttributes) {
        self.attributes = attributes;
    }

    pub fn measure_number(&self) -> u32 {
        self.measure_number
    }

    /// Start a new measure; the first one carries the attributes
    pub fn start_measure(&mut self) {
        if self.measure_started {
            self.end_measure();
        }
        self.buffer
            .push_str(&format!("    <measure number=\"{}\">\n", self.measure_number));
        self.measure_started = true;

        if !self.attributes_written {
            self.write_attributes();
            self.attributes_written = true;
        }
    }

    /// Close current measure and increment number
    pub fn end_measure(&mut self) {
        if !self.measure_started {
            return;
        }
        self.buffer.push_str("    </measure>\n");
        self.measure_number += 1;
        self.measure_started = false;
    }

    /// Write one note with its pitch, duration and voice
    pub fn write_note(&mut self, note: &NoteDescriptor) {
        let duration = note.duration();

        self.buffer.push_str(&format!("      <note id=\"{}\">\n", xml_escape(&note.id)));
        self.buffer.push_str("        <pitch>\n");
        self.buffer.push_str(&format!("          <step>{}</step>\n", note.step));
        if note.alter != 0 {
            self.buffer.push_str(&format!("          <alter>{}</alter>\n", note.alter));
        }
        self.buffer.push_str(&format!("          <octave>{}</octave>\n", note.octave));
        self.buffer.push_str("        </pitch>\n");
        self.buffer.push_str(&format!("        <duration>{}</duration>\n", duration));
        self.buffer.push_str(&format!("        <voice>{}</voice>\n", note.voice));
        if let Some(note_type) = note_type(duration, self.divisions) {
            self.buffer.push_str(&format!("        <type>{}</type>\n", note_type));
        }
        if let Some(accidental) = accidental_name(note.alter) {
            self.buffer.push_str(&format!("        <accidental>{}</accidental>\n", accidental));
        }
        self.buffer.push_str("      </note>\n");
    }

    /// Finalize and return complete MusicXML string
    pub fn finalize(mut self) -> String {
        if self.measure_number == 1 && !self.measure_started {
            // A part needs at least one measure to carry its attributes
            self.start_measure();
        }
        self.end_measure();

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n");
        xml.push_str("<score-partwise version=\"3.1\">\n");
        xml.push_str("  <part-list>\n");
        xml.push_str(&format!("    <score-part id=\"{}\">\n", self.part_id));
        xml.push_str(&format!("      <part-name>{}</part-name>\n", xml_escape(&self.part_name)));
        xml.push_str("    </score-part>\n");
        xml.push_str("  </part-list>\n");
        xml.push_str(&format!("  <part id=\"{}\">\n", self.part_id));
        xml.push_str(&self.buffer);
        xml.push_str("  </part>\n");
        xml.push_str("</score-partwise>\n");
        xml
    }

    /// Write MusicXML attributes (divisions, key, time, clef)
    fn write_attributes(&mut self) {
        let attrs = self.attributes;
        self.buffer.push_str("      <attributes>\n");
        self.buffer.push_str(&format!("        <divisions>{}</divisions>\n", self.divisions));
        self.buffer.push_str(&format!(
            "        <key><fifths>{}</fifths><mode>{}</mode></key>\n",
            attrs.key.fifths,
            attrs.key.mode.as_str()
        ));
        self.buffer.push_str(&format!(
            "        <time><beats>{}</beats><beat-type>{}</beat-type></time>\n",
            attrs.time.beats, attrs.time.beat_type
        ));
        self.buffer.push_str(&format!(
            "        <clef><sign>{}</sign><line>{}</line></clef>\n",
            attrs.clef.sign, attrs.clef.line
        ));
        self.buffer.push_str("      </attributes>\n");
    }
}

/// Note type name for a duration in divisions, if it is a plain note value
fn note_type(duration: u64, divisions: u32) -> Option<&'static str> {
    let quarter = u64::from(divisions);
    if quarter == 0 {
        return None;
    }
    match duration {
        d if d == quarter * 4 => Some("whole"),
        d if d == quarter * 2 => Some("half"),
        d if d == quarter => Some("quarter"),
        d if d * 2 == quarter => Some("eighth"),
        d if d * 4 == quarter => Some("16th"),
        _ => None,
    }
}

fn accidental_name(alter: i8) -> Option<&'static str> {
    match alter {
        -2 => Some("flat-flat"),
        -1 => Some("flat"),
        1 => Some("sharp"),
        2 => Some("double-sharp"),
        _ => None,
    }
}

/// Escape special XML characters
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
