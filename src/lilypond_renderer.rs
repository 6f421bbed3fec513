//! LilyPond engraving of generated MusicXML
//!
//! Converts a MusicXML file with `musicxml2ly`, turns on the `\midi` block
//! that musicxml2ly leaves commented out, then runs `lilypond` to produce the
//! typeset score (and MIDI) next to the input file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngraveConfig {
    /// Directory holding `musicxml2ly` and `lilypond`; `PATH` lookup when unset
    pub lilypond_dir: Option<PathBuf>,
    pub midi: bool,
}

impl Default for EngraveConfig {
    fn default() -> Self {
        Self {
            lilypond_dir: None,
            midi: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngraveError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of [`enable_midi_block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiPatch {
    /// The commented hint was uncommented
    Enabled,
    /// An active `\midi` block was already there
    AlreadyPresent,
    /// No `\midi` hint to uncomment
    HintMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngraveOutput {
    pub ly_path: PathBuf,
    /// Base path handed to `lilypond -o`; outputs are `<base>.pdf`, `<base>.midi`
    pub output_base: PathBuf,
    pub midi: Option<MidiPatch>,
}

/// Uncomment the `\midi` line musicxml2ly writes into the score block
pub fn enable_midi_block(source: &str) -> (String, MidiPatch) {
    let is_comment = |line: &str| line.trim_start().starts_with('%');

    if source.lines().any(|line| line.contains("\\midi") && !is_comment(line)) {
        return (source.to_string(), MidiPatch::AlreadyPresent);
    }

    let mut patched = Vec::new();
    let mut status = MidiPatch::HintMissing;

    for line in source.lines() {
        if status == MidiPatch::HintMissing && is_comment(line) && line.contains("\\midi") {
            let indent = &line[..line.len() - line.trim_start().len()];
            let body = line.trim_start().trim_start_matches('%').trim_start();
            // The explanatory comment right above the hint goes too
            if patched
                .last()
                .map_or(false, |prev: &String| is_comment(prev.as_str()) && prev.contains("MIDI output"))
            {
                patched.pop();
            }
            patched.push(format!("{}{}", indent, body));
            status = MidiPatch::Enabled;
        } else {
            patched.push(line.to_string());
        }
    }

    let mut text = patched.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }
    (text, status)
}

/// Path of a LilyPond tool, honoring the configured `bin` directory
pub fn tool_path(config: &EngraveConfig, program: &str) -> PathBuf {
    match &config.lilypond_dir {
        Some(dir) => dir.join(program),
        None => PathBuf::from(program),
    }
}

fn run_tool(config: &EngraveConfig, program: &str, args: &[&Path]) -> Result<(), EngraveError> {
    let path = tool_path(config, program);
    log::info!("running {} {:?}", path.display(), args);

    let output = Command::new(&path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| EngraveError::Spawn {
            program: path.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(EngraveError::Failed {
            program: path.display().to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Engrave a MusicXML file into a score next to it
pub fn engrave(musicxml_path: &Path, config: &EngraveConfig) -> Result<EngraveOutput, EngraveError> {
    let ly_path = musicxml_path.with_extension("ly");
    let output_base = musicxml_path.with_extension("");

    run_tool(config, "musicxml2ly", &[Path::new("-o"), ly_path.as_path(), musicxml_path])?;

    let midi = if config.midi {
        let io_err = |source| EngraveError::Io {
            path: ly_path.display().to_string(),
            source,
        };
        let source = std::fs::read_to_string(&ly_path).map_err(io_err)?;
        let (patched, status) = enable_midi_block(&source);
        match status {
            MidiPatch::Enabled => std::fs::write(&ly_path, patched).map_err(io_err)?,
            MidiPatch::AlreadyPresent => log::info!("MIDI block already present in {}", ly_path.display()),
            MidiPatch::HintMissing => log::warn!("no \\midi hint in {}; MIDI will not be produced", ly_path.display()),
        }
        Some(status)
    } else {
        None
    };

    run_tool(config, "lilypond", &[Path::new("-o"), output_base.as_path(), ly_path.as_path()])?;

    Ok(EngraveOutput {
        ly_path,
        output_base,
        midi,
    })
}
