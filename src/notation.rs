//! Notation backends
//!
//! The codec never touches document syntax. A backend renders an encoded
//! stream to document text and parses document text back into the ordered,
//! tie-resolved notes of its first part.

use thiserror::Error;

use crate::codec::{
    CodecError, Decoded, DecoderConfig, EmptyInput, EncodedStream, EncoderConfig, StreamDecoder,
    StreamEncoder,
};
use crate::converters::musicxml::{parse_musicxml, MxError};
use crate::models::NoteDescriptor;
use crate::renderers::musicxml::emit_musicxml;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("MusicXML error: {0}")]
    MusicXml(#[from] MxError),
}

pub trait NotationBackend {
    /// Render attributes, measures and notes to document text
    fn render(&self, stream: &EncodedStream) -> Result<String, NotationError>;

    /// Parse document text into the notes of its first part
    fn parse(&self, document: &str) -> Result<Vec<NoteDescriptor>, NotationError>;
}

/// MusicXML 3.1 partwise backend
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicXmlBackend;

impl NotationBackend for MusicXmlBackend {
    fn render(&self, stream: &EncodedStream) -> Result<String, NotationError> {
        Ok(emit_musicxml(stream))
    }

    fn parse(&self, document: &str) -> Result<Vec<NoteDescriptor>, NotationError> {
        let mut score = parse_musicxml(document.as_bytes())?;
        if score.parts.is_empty() {
            return Err(CodecError::EmptyInput(EmptyInput::NoParts).into());
        }
        if score.parts.len() > 1 {
            log::debug!("ignoring {} additional parts", score.parts.len() - 1);
        }
        Ok(score.parts.swap_remove(0).notes)
    }
}

/// Encode bytes and render them with `backend`
pub fn encode_with<B: NotationBackend>(
    backend: &B,
    data: &[u8],
    config: &EncoderConfig,
) -> Result<String, NotationError> {
    let stream = StreamEncoder::new(config.clone())?.encode(data)?;
    backend.render(&stream)
}

/// Parse a document with `backend` and decode its notes
pub fn decode_with<B: NotationBackend>(
    backend: &B,
    document: &str,
    config: &DecoderConfig,
) -> Result<Decoded, NotationError> {
    let notes = backend.parse(document)?;
    Ok(StreamDecoder::new(*config).decode(&notes)?)
}

/// Convert arbitrary bytes into a MusicXML document
pub fn bytes_to_musicxml(data: &[u8], config: &EncoderConfig) -> Result<String, NotationError> {
    encode_with(&MusicXmlBackend, data, config)
}

/// Recover the bytes carried by a MusicXML document
pub fn musicxml_to_bytes(xml: &str, config: &DecoderConfig) -> Result<Decoded, NotationError> {
    decode_with(&MusicXmlBackend, xml, config)
}
