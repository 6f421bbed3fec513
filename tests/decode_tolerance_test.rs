use nibble_notes::codec::{DecodeWarning, EmptyInput, NaturalPolicy, NoteError};
use nibble_notes::{musicxml_to_bytes, CodecError, DecoderConfig, NotationError, Step};

/// Helper to build a one-part score from note fragments
fn score(notes: &[&str]) -> String {
    let body: String = notes.iter().map(|n| format!("      {}\n", n)).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Found</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
{}    </measure>
  </part>
</score-partwise>"#,
        body
    )
}

fn note(step: &str, alter: Option<i8>, octave: u8) -> String {
    let alter = alter.map(|a| format!("<alter>{}</alter>", a)).unwrap_or_default();
    format!(
        "<note><pitch><step>{}</step>{}<octave>{}</octave></pitch><duration>1</duration></note>",
        step, alter, octave
    )
}

#[test]
fn test_foreign_step_is_skipped_with_warning() {
    // C#4 (4), G4 (skipped), Cb5 (8)
    let notes = [note("C", Some(1), 4), note("G", None, 4), note("C", Some(-1), 5)];
    let refs: Vec<&str> = notes.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();

    assert_eq!(decoded.bytes, vec![0x48]);
    assert_eq!(decoded.nibble_count, 2);
    assert_eq!(decoded.warnings.len(), 1);
    assert!(matches!(
        &decoded.warnings[0],
        DecodeWarning::SkippedNote { index: 1, reason: NoteError::UnknownStep(Step::G), .. }
    ));
}

#[test]
fn test_unsupported_octave_is_skipped() {
    let notes = [note("D", Some(1), 3), note("D", Some(1), 4), note("D", Some(-1), 4)];
    let refs: Vec<&str> = notes.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();

    // D#4 = 0b0101, Db4 = 0b0001
    assert_eq!(decoded.bytes, vec![0x51]);
    assert!(matches!(
        &decoded.warnings[0],
        DecodeWarning::SkippedNote { reason: NoteError::UnsupportedOctave(3), .. }
    ));
}

#[test]
fn test_natural_reads_as_sharp_by_default() {
    let refs = [note("E", None, 4), note("E", Some(1), 4)];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.bytes, vec![0x66]);
    assert!(decoded.warnings.is_empty());
}

#[test]
fn test_strict_naturals_skip_the_note() {
    let refs = [note("E", None, 4), note("E", Some(1), 4), note("F", Some(-1), 5)];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let config = DecoderConfig {
        naturals: NaturalPolicy::Reject,
        ..DecoderConfig::default()
    };
    let decoded = musicxml_to_bytes(&score(&refs), &config).unwrap();

    // E#4 = 6, Fb5 = 0b1011
    assert_eq!(decoded.bytes, vec![0x6B]);
    assert!(matches!(
        &decoded.warnings[0],
        DecodeWarning::SkippedNote { index: 0, reason: NoteError::NaturalAccidental, .. }
    ));
}

#[test]
fn test_odd_nibble_count_is_padded() {
    let refs = [note("F", Some(1), 5)];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();

    assert_eq!(decoded.bytes, vec![0xF0]);
    assert_eq!(decoded.warnings, vec![DecodeWarning::OddNibbleCount { count: 1 }]);
}

#[test]
fn test_no_validate_suppresses_warnings() {
    let refs = [note("A", None, 4), note("F", Some(1), 5)];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let config = DecoderConfig {
        validate: false,
        ..DecoderConfig::default()
    };
    let decoded = musicxml_to_bytes(&score(&refs), &config).unwrap();
    assert_eq!(decoded.bytes, vec![0xF0]);
    assert!(decoded.warnings.is_empty());
}

#[test]
fn test_only_foreign_notes_yield_no_bytes() {
    let refs = [note("G", None, 4), note("B", Some(-1), 4)];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();
    assert!(decoded.bytes.is_empty());
    assert_eq!(decoded.nibble_count, 0);
    assert!(decoded.warnings.contains(&DecodeWarning::NoValidNibbles));
}

#[test]
fn test_rests_carry_no_nibbles() {
    let sharp = note("C", Some(1), 4);
    let flat = note("C", Some(-1), 5);
    let refs = [sharp.as_str(), "<note><rest/><duration>1</duration></note>", flat.as_str()];
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.bytes, vec![0x48]);
    assert!(decoded.warnings.is_empty());
}

#[test]
fn test_tied_note_contributes_one_nibble() {
    let refs = [
        "<note><pitch><step>D</step><alter>1</alter><octave>5</octave></pitch><duration>1</duration><tie type=\"start\"/></note>",
        "<note><pitch><step>D</step><alter>1</alter><octave>5</octave></pitch><duration>1</duration><tie type=\"stop\"/></note>",
        "<note><pitch><step>D</step><alter>-1</alter><octave>4</octave></pitch><duration>1</duration></note>",
    ];
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();
    // D#5 = 0b1101, Db4 = 0b0001
    assert_eq!(decoded.bytes, vec![0xD1]);
}

#[test]
fn test_huge_forward_does_not_abort_decode() {
    let sharp = note("C", Some(1), 4);
    let flat = note("C", Some(-1), 5);
    let refs = [
        sharp.as_str(),
        "<forward><duration>18446744073709551615</duration></forward>",
        flat.as_str(),
    ];
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.bytes, vec![0x48]);
    assert!(decoded.warnings.is_empty());
}

#[test]
fn test_octave_beyond_range_is_skipped() {
    let refs = [
        note("C", Some(1), 4),
        "<note><pitch><step>D</step><octave>300</octave></pitch><duration>1</duration></note>".to_string(),
        note("C", Some(-1), 5),
    ];
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    let decoded = musicxml_to_bytes(&score(&refs), &DecoderConfig::default()).unwrap();

    assert_eq!(decoded.bytes, vec![0x48]);
    assert!(matches!(
        &decoded.warnings[0],
        DecodeWarning::SkippedNote { index: 1, reason: NoteError::UnsupportedOctave(i8::MAX), .. }
    ));
}

#[test]
fn test_only_first_part_is_decoded() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Data</part-name></score-part>
    <score-part id="P2"><part-name>Noise</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <note><pitch><step>C</step><alter>1</alter><octave>4</octave></pitch><duration>1</duration></note>
      <note><pitch><step>C</step><alter>-1</alter><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <note><pitch><step>F</step><alter>1</alter><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
  </part>
</score-partwise>"#;
    let decoded = musicxml_to_bytes(xml, &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.bytes, vec![0x48]);
}

#[test]
fn test_part_without_notes() {
    let xml = score(&[]);
    assert_eq!(
        musicxml_to_bytes(&xml, &DecoderConfig::default()),
        Err(NotationError::Codec(CodecError::EmptyInput(EmptyInput::NoNotes)))
    );
}
