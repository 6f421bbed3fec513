//! Codec operations for the WASM API
//!
//! - Encode: bytes -> MusicXML document
//! - Decode: MusicXML document -> bytes (plain or with a warning report)
//! - Nibble lookup: inspect the note a single nibble maps to

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize_or_default, serialize, to_js_error};
use crate::codec::{encode_nibble, DecoderConfig, EncoderConfig};
use crate::notation::{bytes_to_musicxml, musicxml_to_bytes};
use crate::{wasm_info, wasm_warn};

/// Report returned to JavaScript by `decodeMusicXMLReport`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeReport {
    bytes: Vec<u8>,
    nibble_count: usize,
    warnings: Vec<String>,
}

// ============================================================================
// Encode
// ============================================================================

/// Encode bytes as a MusicXML document
///
/// # Parameters
/// * `data` - bytes to carry (a `Uint8Array` on the JS side)
/// * `options` - optional `EncoderConfig` object (kebab-case keys)
#[wasm_bindgen(js_name = encodeBytesToMusicXML)]
pub fn encode_bytes_to_musicxml(data: &[u8], options: JsValue) -> Result<String, JsValue> {
    let config: EncoderConfig = deserialize_or_default(options, "Invalid encoder options")?;
    wasm_info!("encodeBytesToMusicXML: {} bytes", data.len());

    let xml = bytes_to_musicxml(data, &config).map_err(|e| to_js_error("Encode failed", e))?;

    wasm_info!("  MusicXML generated: {} bytes", xml.len());
    Ok(xml)
}

// ============================================================================
// Decode
// ============================================================================

/// Decode the bytes carried by a MusicXML document
#[wasm_bindgen(js_name = decodeMusicXMLToBytes)]
pub fn decode_musicxml_to_bytes(xml: &str, validate: bool) -> Result<js_sys::Uint8Array, JsValue> {
    let config = DecoderConfig {
        validate,
        ..DecoderConfig::default()
    };
    let decoded = musicxml_to_bytes(xml, &config).map_err(|e| to_js_error("Decode failed", e))?;

    for warning in &decoded.warnings {
        wasm_warn!("{}", warning);
    }
    wasm_info!("decodeMusicXMLToBytes: {} bytes recovered", decoded.bytes.len());

    Ok(js_sys::Uint8Array::from(decoded.bytes.as_slice()))
}

/// Decode and return `{ bytes, nibbleCount, warnings }`
#[wasm_bindgen(js_name = decodeMusicXMLReport)]
pub fn decode_musicxml_report(xml: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let config: DecoderConfig = deserialize_or_default(options, "Invalid decoder options")?;
    let decoded = musicxml_to_bytes(xml, &config).map_err(|e| to_js_error("Decode failed", e))?;

    let report = DecodeReport {
        nibble_count: decoded.nibble_count,
        warnings: decoded.warnings.iter().map(|w| w.to_string()).collect(),
        bytes: decoded.bytes,
    };
    serialize(&report, "Failed to serialize decode report")
}

// ============================================================================
// Nibble lookup
// ============================================================================

/// Return `{ step, alter, octave }` for a nibble (0-15)
#[wasm_bindgen(js_name = nibbleToNote)]
pub fn nibble_to_note(nibble: u8) -> Result<JsValue, JsValue> {
    let pitch = encode_nibble(nibble).map_err(|e| to_js_error("Invalid nibble", e))?;
    serialize(&pitch, "Failed to serialize note")
}
