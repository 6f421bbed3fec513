//! Byte stream -> note descriptors
//!
//! Each byte becomes two quarter notes (high nibble first). Notes are grouped
//! into measures of `notes_per_measure`; the last measure is left partially
//! filled when the note count is not a multiple of it.

use serde::{Deserialize, Serialize};

use super::errors::CodecError;
use super::nibble::{encode_nibble, split_byte};
use crate::models::{MeasureDescriptor, NoteDescriptor, StreamAttributes};

pub const DEFAULT_QUARTER_DURATION: u32 = 480;
pub const DEFAULT_NOTES_PER_MEASURE: usize = 16;
pub const DEFAULT_PART_NAME: &str = "Encoded Bytes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EncoderConfig {
    /// Ticks per quarter note; also written as the document's `<divisions>`
    pub quarter_duration: u32,
    pub notes_per_measure: usize,
    pub part_name: String,
    /// Run the span self-check after encoding
    pub validate: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            quarter_duration: DEFAULT_QUARTER_DURATION,
            notes_per_measure: DEFAULT_NOTES_PER_MEASURE,
            part_name: DEFAULT_PART_NAME.to_string(),
            validate: true,
        }
    }
}

impl EncoderConfig {
    pub fn check(&self) -> Result<(), CodecError> {
        if self.quarter_duration == 0 {
            return Err(CodecError::InvalidConfiguration { parameter: "quarter_duration" });
        }
        if self.notes_per_measure == 0 {
            return Err(CodecError::InvalidConfiguration { parameter: "notes_per_measure" });
        }
        Ok(())
    }
}

/// Structural problem found by [`EncodedStream::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanWarning {
    EmptyNote { id: String, start_tick: u64, end_tick: u64 },
    EmptyMeasure { number: u32, start_tick: u64, end_tick: u64 },
}

impl std::fmt::Display for SpanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanWarning::EmptyNote { id, start_tick, end_tick } => {
                write!(f, "note {} has non-positive span {}..{}", id, start_tick, end_tick)
            }
            SpanWarning::EmptyMeasure { number, start_tick, end_tick } => {
                write!(f, "measure {} has non-positive span {}..{}", number, start_tick, end_tick)
            }
        }
    }
}

/// Result of one encode pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedStream {
    pub attributes: StreamAttributes,
    pub measures: Vec<MeasureDescriptor>,
    pub notes: Vec<NoteDescriptor>,
    pub quarter_duration: u32,
    pub notes_per_measure: usize,
    pub part_name: String,
}

impl EncodedStream {
    /// Check every note and measure has a positive span
    ///
    /// Never mutates the stream; an empty result means the stream is sound.
    pub fn validate(&self) -> Vec<SpanWarning> {
        let notes = self
            .notes
            .iter()
            .filter(|n| n.end_tick <= n.start_tick)
            .map(|n| SpanWarning::EmptyNote {
                id: n.id.clone(),
                start_tick: n.start_tick,
                end_tick: n.end_tick,
            });

        let measures = self
            .measures
            .iter()
            .filter(|m| m.end_tick <= m.start_tick)
            .map(|m| SpanWarning::EmptyMeasure {
                number: m.number,
                start_tick: m.start_tick,
                end_tick: m.end_tick,
            });

        notes.chain(measures).collect()
    }

    pub fn total_ticks(&self) -> u64 {
        self.notes.last().map_or(0, |n| n.end_tick)
    }
}

#[derive(Debug, Clone)]
pub struct StreamEncoder {
    config: EncoderConfig,
}

impl StreamEncoder {
    /// Create an encoder, rejecting non-positive parameters up front
    pub fn new(config: EncoderConfig) -> Result<Self, CodecError> {
        config.check()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn encode(&self, data: &[u8]) -> Result<EncodedStream, CodecError> {
        let duration = u64::from(self.config.quarter_duration);
        let per_measure = self.config.notes_per_measure;
        // Nominal measure span; saturates for very large measure sizes
        let measure_span = u64::try_from(per_measure)
            .unwrap_or(u64::MAX)
            .saturating_mul(duration);

        let mut notes = Vec::with_capacity(data.len() * 2);
        let mut measures: Vec<MeasureDescriptor> = Vec::new();
        let mut tick = 0u64;
        let mut notes_in_measure = 0usize;

        for &byte in data {
            let (high, low) = split_byte(byte);

            for nibble in [high, low] {
                if notes_in_measure == 0 {
                    let number = measures.len() as u32 + 1;
                    measures.push(MeasureDescriptor {
                        number,
                        start_tick: tick,
                        end_tick: tick.saturating_add(measure_span),
                        first_note: notes.len(),
                        note_count: 0,
                    });
                    log::debug!("measure {} opened at tick {}", number, tick);
                }

                let pitch = encode_nibble(nibble)?;
                let id = format!("n{}", notes.len());
                log::trace!("{} = nibble {:#x} -> {} at tick {}", id, nibble, pitch, tick);
                notes.push(NoteDescriptor::new(id, pitch, tick, tick + duration));

                if let Some(measure) = measures.last_mut() {
                    measure.note_count += 1;
                }
                tick += duration;
                notes_in_measure += 1;

                if notes_in_measure >= per_measure {
                    notes_in_measure = 0;
                }
            }
        }

        let stream = EncodedStream {
            attributes: StreamAttributes::default(),
            measures,
            notes,
            quarter_duration: self.config.quarter_duration,
            notes_per_measure: per_measure,
            part_name: self.config.part_name.clone(),
        };

        log::debug!(
            "encoded {} bytes into {} notes across {} measures",
            data.len(),
            stream.notes.len(),
            stream.measures.len()
        );

        if self.config.validate {
            for warning in stream.validate() {
                log::warn!("{}", warning);
            }
        }

        Ok(stream)
    }
}

/// Encode with the given configuration
pub fn encode_bytes(data: &[u8], config: &EncoderConfig) -> Result<EncodedStream, CodecError> {
    StreamEncoder::new(config.clone())?.encode(data)
}
