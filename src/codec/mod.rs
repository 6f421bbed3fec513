//! Nibble codec
//!
//! Maps bytes onto notes and back:
//!
//! - **nibble**: 4-bit value <-> (step, alter, octave)
//! - **encoder**: bytes -> attributes, measures and notes
//! - **decoder**: notes -> bytes, tolerant of foreign notes
//! - **errors**: fatal and per-note error types

pub mod errors;
pub mod nibble;
pub mod encoder;
pub mod decoder;

pub use errors::{CodecError, EmptyInput, NoteError};
pub use nibble::{decode_nibble, decode_nibble_with, encode_nibble, join_nibbles, split_byte, NaturalPolicy};
pub use encoder::{encode_bytes, EncodedStream, EncoderConfig, SpanWarning, StreamEncoder};
pub use decoder::{decode_notes, pack_nibbles, DecodeWarning, Decoded, DecoderConfig, StreamDecoder};
