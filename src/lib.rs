//! Nibble Notes WASM Module
//!
//! Encodes arbitrary bytes as a single-part melody (one note per 4-bit
//! nibble) and recovers the bytes from the notated score.

pub mod models;
pub mod codec;
pub mod converters;
pub mod renderers;
pub mod notation;
pub mod config;
pub mod lilypond_renderer;
pub mod api;

// Re-export commonly used types
pub use models::{MeasureDescriptor, NoteDescriptor, NotePitch, Step};
pub use codec::{
    decode_nibble, encode_nibble, CodecError, DecodeWarning, Decoded, DecoderConfig, EncodedStream,
    EncoderConfig, NaturalPolicy, NoteError, StreamDecoder, StreamEncoder,
};
pub use notation::{bytes_to_musicxml, musicxml_to_bytes, MusicXmlBackend, NotationBackend, NotationError};
pub use config::{CodecConfig, ConfigError};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            api::helpers::log_warn("logger already initialized");
        }
    }

    log::info!("Nibble Notes WASM module initialized");
}
