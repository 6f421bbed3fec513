use nibble_notes::codec::EncoderConfig;
use nibble_notes::bytes_to_musicxml;
use roxmltree::{Document, Node, ParsingOptions};

/// Helper to parse emitted MusicXML (it carries a DOCTYPE)
fn with_document<F: FnOnce(&Document)>(xml: &str, check: F) {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options).unwrap();
    check(&doc);
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children().find(|c| c.has_tag_name(name)).and_then(|c| c.text())
}

fn elements<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.descendants().filter(|n| n.has_tag_name(name)).collect()
}

#[test]
fn test_document_skeleton() {
    let xml = bytes_to_musicxml(b"Hi", &EncoderConfig::default()).unwrap();
    assert!(xml.contains("<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\""));

    with_document(&xml, |doc| {
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "score-partwise");
        assert_eq!(root.attribute("version"), Some("3.1"));

        let score_part = elements(root, "score-part")[0];
        assert_eq!(score_part.attribute("id"), Some("P1"));
        assert_eq!(child_text(score_part, "part-name"), Some("Encoded Bytes"));

        let parts = elements(root, "part");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].attribute("id"), Some("P1"));
    });
}

#[test]
fn test_attributes_only_in_first_measure() {
    let config = EncoderConfig {
        notes_per_measure: 2,
        ..EncoderConfig::default()
    };
    let xml = bytes_to_musicxml(b"abc", &config).unwrap();

    with_document(&xml, |doc| {
        let measures = elements(doc.root_element(), "measure");
        assert_eq!(measures.len(), 3);
        let numbers: Vec<_> = measures.iter().map(|m| m.attribute("number").unwrap()).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);

        let attributes = elements(doc.root_element(), "attributes");
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].parent(), Some(measures[0]));

        let attrs = attributes[0];
        assert_eq!(child_text(attrs, "divisions"), Some("480"));
        let key = elements(attrs, "key")[0];
        assert_eq!(child_text(key, "fifths"), Some("0"));
        assert_eq!(child_text(key, "mode"), Some("major"));
        let time = elements(attrs, "time")[0];
        assert_eq!(child_text(time, "beats"), Some("4"));
        assert_eq!(child_text(time, "beat-type"), Some("4"));
        let clef = elements(attrs, "clef")[0];
        assert_eq!(child_text(clef, "sign"), Some("G"));
        assert_eq!(child_text(clef, "line"), Some("2"));
    });
}

#[test]
fn test_notes_carry_pitch_duration_and_accidental() {
    // 0x48 -> C#4 then Cb5
    let xml = bytes_to_musicxml(&[0x48], &EncoderConfig::default()).unwrap();

    with_document(&xml, |doc| {
        let notes = elements(doc.root_element(), "note");
        assert_eq!(notes.len(), 2);

        let ids: Vec<_> = notes.iter().map(|n| n.attribute("id").unwrap()).collect();
        assert_eq!(ids, vec!["n0", "n1"]);

        let pitch = elements(notes[0], "pitch")[0];
        assert_eq!(child_text(pitch, "step"), Some("C"));
        assert_eq!(child_text(pitch, "alter"), Some("1"));
        assert_eq!(child_text(pitch, "octave"), Some("4"));
        assert_eq!(child_text(notes[0], "accidental"), Some("sharp"));

        let pitch = elements(notes[1], "pitch")[0];
        assert_eq!(child_text(pitch, "alter"), Some("-1"));
        assert_eq!(child_text(pitch, "octave"), Some("5"));
        assert_eq!(child_text(notes[1], "accidental"), Some("flat"));

        for note in &notes {
            assert_eq!(child_text(*note, "duration"), Some("480"));
            assert_eq!(child_text(*note, "voice"), Some("1"));
            assert_eq!(child_text(*note, "type"), Some("quarter"));
        }
    });
}

#[test]
fn test_part_name_is_escaped() {
    let config = EncoderConfig {
        part_name: "Bytes & <Bits>".to_string(),
        ..EncoderConfig::default()
    };
    let xml = bytes_to_musicxml(b"x", &config).unwrap();
    assert!(xml.contains("<part-name>Bytes &amp; &lt;Bits&gt;</part-name>"));

    with_document(&xml, |doc| {
        let name = elements(doc.root_element(), "part-name")[0];
        assert_eq!(name.text(), Some("Bytes & <Bits>"));
    });
}

#[test]
fn test_empty_input_renders_attributes_only_measure() {
    let xml = bytes_to_musicxml(b"", &EncoderConfig::default()).unwrap();

    with_document(&xml, |doc| {
        let measures = elements(doc.root_element(), "measure");
        assert_eq!(measures.len(), 1);
        assert_eq!(elements(doc.root_element(), "note").len(), 0);
        assert_eq!(elements(measures[0], "attributes").len(), 1);
    });
}
