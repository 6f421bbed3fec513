use crate::converters::musicxml::{model::*, MxError, Result};
use crate::models::{NoteDescriptor, NotePitch, Step};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse MusicXML bytes into parts of tie-resolved notes
pub fn parse_musicxml(xml: &[u8]) -> Result<ParsedScore> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut score = ParsedScore::default();
    let mut part_names: HashMap<String, String> = HashMap::new();
    let mut current_part: Option<PartState> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"score-partwise" => saw_root = true,
                b"score-timewise" => {
                    return Err(MxError::Invalid("score-timewise documents are not supported".to_string()));
                }
                b"score-part" => {
                    let id = attribute(&e, b"id")?.unwrap_or_default();
                    let name = parse_score_part(&mut reader)?;
                    part_names.insert(id, name);
                }
                b"part" => {
                    let id = attribute(&e, b"id")?
                        .unwrap_or_else(|| format!("P{}", score.parts.len() + 1));
                    current_part = Some(PartState::new(id));
                }
                b"attributes" => {
                    let divisions = parse_attributes(&mut reader)?;
                    if let (Some(part), Some(divisions)) = (current_part.as_mut(), divisions) {
                        if part.divisions == 0 {
                            part.divisions = divisions;
                        }
                    }
                }
                b"note" => {
                    let id = attribute(&e, b"id")?;
                    let note = parse_note(&mut reader, id)?;
                    if let Some(part) = current_part.as_mut() {
                        part.push(note);
                    }
                }
                b"backup" => {
                    let duration = parse_duration_block(&mut reader, b"backup")?;
                    if let Some(part) = current_part.as_mut() {
                        part.tick = part.tick.saturating_sub(duration);
                    }
                }
                b"forward" => {
                    let duration = parse_duration_block(&mut reader, b"forward")?;
                    if let Some(part) = current_part.as_mut() {
                        part.tick = part.tick.saturating_add(duration);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"part" {
                    if let Some(part) = current_part.take() {
                        score.parts.push(part.finish(&part_names));
                    }
                }
            }
            Ok(Event::Eof) => {
                // Truncated document: keep what the open part collected
                if let Some(part) = current_part.take() {
                    score.parts.push(part.finish(&part_names));
                }
                break;
            }
            Err(e) => {
                return Err(MxError::Xml(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(MxError::Invalid("missing <score-partwise> root element".to_string()));
    }

    log::debug!(
        "parsed {} parts ({} notes in first part)",
        score.parts.len(),
        score.first_part().map_or(0, |p| p.notes.len())
    );

    Ok(score)
}

/// Raw contents of one `<note>` element
#[derive(Debug, Default)]
struct RawNote {
    id: Option<String>,
    pitch: Option<NotePitch>,
    duration: u64,
    voice: u8,
    chord: bool,
    grace: bool,
    tie_start: bool,
    tie_stop: bool,
}

/// Per-part timing and tie bookkeeping
struct PartState {
    id: String,
    divisions: u32,
    tick: u64,
    last_onset: u64,
    notes: Vec<NoteDescriptor>,
    // (pitch, voice) -> index of the note the tie started on
    open_ties: HashMap<(NotePitch, u8), usize>,
}

impl PartState {
    fn new(id: String) -> Self {
        Self {
            id,
            divisions: 0,
            tick: 0,
            last_onset: 0,
            notes: Vec::new(),
            open_ties: HashMap::new(),
        }
    }

    fn push(&mut self, raw: RawNote) {
        let duration = if raw.grace { 0 } else { raw.duration };

        // Chord members share the onset of the note before them
        let start = if raw.chord {
            self.last_onset
        } else {
            self.last_onset = self.tick;
            self.tick = self.tick.saturating_add(duration);
            self.last_onset
        };

        // Rests and unpitched notes only move time
        let Some(pitch) = raw.pitch else {
            return;
        };
        let end = start.saturating_add(duration);
        let key = (pitch, raw.voice);

        if raw.tie_stop {
            if let Some(&index) = self.open_ties.get(&key) {
                self.notes[index].end_tick = end;
                if !raw.tie_start {
                    self.open_ties.remove(&key);
                }
                return;
            }
        }

        let id = raw.id.unwrap_or_else(|| format!("n{}", self.notes.len()));
        let mut note = NoteDescriptor::new(id, pitch, start, end);
        note.voice = raw.voice;

        if raw.tie_start {
            self.open_ties.insert(key, self.notes.len());
        }
        self.notes.push(note);
    }

    fn finish(self, part_names: &HashMap<String, String>) -> ParsedPart {
        if !self.open_ties.is_empty() {
            log::debug!("part {}: {} ties left open at end of part", self.id, self.open_ties.len());
        }
        ParsedPart {
            name: part_names.get(&self.id).cloned().unwrap_or_default(),
            id: self.id,
            divisions: self.divisions,
            notes: self.notes,
        }
    }
}

fn parse_note(reader: &mut XmlReader<'_>, id: Option<String>) -> Result<RawNote> {
    let mut note = RawNote {
        id,
        voice: 1,
        ..RawNote::default()
    };

    loop {
        let (e, empty) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(e)) if e.name().as_ref() == b"note" => break,
            Ok(Event::Eof) => return Err(MxError::Invalid("unexpected end of document inside <note>".to_string())),
            Err(e) => return Err(MxError::Xml(format!("Error parsing note: {}", e))),
            _ => continue,
        };

        match e.name().as_ref() {
            b"pitch" if !empty => note.pitch = Some(parse_pitch(reader)?),
            b"duration" if !empty => {
                note.duration = parse_text_content(reader)?.trim().parse().unwrap_or(0);
            }
            b"voice" if !empty => {
                note.voice = parse_text_content(reader)?.trim().parse().unwrap_or(1);
            }
            b"chord" => note.chord = true,
            b"grace" => note.grace = true,
            b"tie" => match attribute(&e, b"type")?.as_deref() {
                Some("start") => note.tie_start = true,
                Some("stop") => note.tie_stop = true,
                _ => {}
            },
            _ => {}
        }
    }

    Ok(note)
}

fn parse_pitch(reader: &mut XmlReader<'_>) -> Result<NotePitch> {
    let mut step: Option<Step> = None;
    let mut alter = 0i8;
    let mut octave: Option<i8> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"step" => {
                    let text = parse_text_content(reader)?;
                    step = Some(text.parse().map_err(|e| MxError::Invalid(format!("{}", e)))?);
                }
                b"alter" => {
                    alter = parse_alter(&parse_text_content(reader)?);
                }
                b"octave" => {
                    let text = parse_text_content(reader)?;
                    let value: i64 = text.trim().parse().map_err(|_| {
                        MxError::Invalid(format!("octave '{}' is not an integer", text.trim()))
                    })?;
                    // Out-of-range octaves are clamped; the decoder rejects them per note
                    octave = Some(i8::try_from(value).unwrap_or(if value < 0 { i8::MIN } else { i8::MAX }));
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"pitch" => break,
            Ok(Event::Eof) => return Err(MxError::Invalid("unexpected end of document inside <pitch>".to_string())),
            Err(e) => return Err(MxError::Xml(format!("Error parsing pitch: {}", e))),
            _ => {}
        }
    }

    match (step, octave) {
        (Some(step), Some(octave)) => Ok(NotePitch::new(step, alter, octave)),
        (None, _) => Err(MxError::Invalid("<pitch> without <step>".to_string())),
        (_, None) => Err(MxError::Invalid("<pitch> without <octave>".to_string())),
    }
}

/// Semitone alteration, rounded to the nearest integer (microtones keep their sign)
fn parse_alter(text: &str) -> i8 {
    text.trim()
        .parse::<f32>()
        .map(|a| a.round().clamp(i8::MIN as f32, i8::MAX as f32) as i8)
        .unwrap_or(0)
}

/// Read `<attributes>`, returning `<divisions>` if present
fn parse_attributes(reader: &mut XmlReader<'_>) -> Result<Option<u32>> {
    let mut divisions = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"divisions" => {
                divisions = parse_text_content(reader)?.trim().parse().ok();
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"attributes" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(MxError::Xml(format!("Error parsing attributes: {}", e))),
            _ => {}
        }
    }

    Ok(divisions)
}

/// Read `<score-part>`, returning its `<part-name>`
fn parse_score_part(reader: &mut XmlReader<'_>) -> Result<String> {
    let mut name = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"part-name" => {
                name = parse_text_content(reader)?;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"score-part" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(MxError::Xml(format!("Error parsing score-part: {}", e))),
            _ => {}
        }
    }

    Ok(name)
}

/// Read the `<duration>` of a `<backup>` or `<forward>` element
fn parse_duration_block(reader: &mut XmlReader<'_>, end: &[u8]) -> Result<u64> {
    let mut duration = 0u64;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"duration" => {
                duration = parse_text_content(reader)?.trim().parse().unwrap_or(0);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(MxError::Xml(format!("Error parsing duration: {}", e))),
            _ => {}
        }
    }

    Ok(duration)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MxError::Xml(format!("Invalid attribute: {}", e)))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| MxError::Xml(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_text_content(reader: &mut XmlReader<'_>) -> Result<String> {
    match reader.read_event() {
        Ok(Event::Text(e)) => e
            .unescape()
            .map(|s| s.into_owned())
            .map_err(|e| MxError::Xml(format!("Invalid text: {}", e))),
        Ok(_) => Ok(String::new()),
        Err(e) => Err(MxError::Xml(format!("Error reading text: {}", e))),
    }
}
