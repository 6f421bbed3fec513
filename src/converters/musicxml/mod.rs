//! MusicXML import
//!
//! Streams a MusicXML document with quick-xml and collects, per part, the
//! ordered sounding notes the nibble decoder consumes.

mod model;
mod parse;

pub use model::*;
pub use parse::parse_musicxml;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MxError {
    #[error("xml parse error: {0}")]
    Xml(String),
    #[error("invalid musicxml: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, MxError>;
