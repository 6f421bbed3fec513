//! Nibble codec WASM API
//!
//! JavaScript-facing functions for encoding bytes into MusicXML and back.
//!
//! # Module Structure
//!
//! - `helpers`: console logging, serialization and error conversion
//! - `codec`: encode, decode and nibble lookup entry points

pub mod helpers;
pub mod codec;

pub use codec::{decode_musicxml_report, decode_musicxml_to_bytes, encode_bytes_to_musicxml, nibble_to_note};
