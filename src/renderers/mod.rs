//! Renderers module
//!
//! Export logic for turning an encoded stream into notation documents.

pub mod musicxml;

pub use musicxml::{emit_musicxml, MusicXmlBuilder};
