//! Format converters
//!
//! This module contains converters from music notation formats into the
//! codec's note descriptors.

pub mod musicxml;

pub use musicxml::{parse_musicxml, MxError, ParsedPart, ParsedScore};
