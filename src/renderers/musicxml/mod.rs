//! MusicXML export module
//!
//! Provides MusicXML 3.1 export for encoded note streams.
//!
//! # Module Structure
//!
//! - **builder**: MusicXML XML structure building
//! - **emitter**: Walks an encoded stream and drives the builder

pub mod builder;
pub mod emitter;

pub use builder::MusicXmlBuilder;
pub use emitter::emit_musicxml;
