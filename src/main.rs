//! nibble-notes - encode bytes as sheet music and back
//!
//! Writes MusicXML from a file, a string or stdin, decodes the bytes carried
//! by a MusicXML score, and engraves scores with LilyPond.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use nibble_notes::codec::NaturalPolicy;
use nibble_notes::lilypond_renderer::{engrave, MidiPatch};
use nibble_notes::{bytes_to_musicxml, musicxml_to_bytes, CodecConfig};

#[derive(Parser)]
#[command(name = "nibble-notes")]
#[command(about = "Encode arbitrary bytes as a MusicXML melody and decode them back")]
#[command(version)]
struct Cli {
    /// YAML config file (command-line flags win over its values)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode bytes into a MusicXML score
    Encode(EncodeArgs),

    /// Decode the bytes carried by a MusicXML score
    Decode(DecodeArgs),

    /// Engrave a MusicXML score with musicxml2ly and lilypond
    Engrave {
        /// Input MusicXML file
        input: PathBuf,

        /// Directory holding the LilyPond binaries
        #[arg(long)]
        lilypond_dir: Option<PathBuf>,

        /// Do not enable MIDI output
        #[arg(long)]
        no_midi: bool,
    },
}

#[derive(Args)]
struct EncodeArgs {
    /// Input file (stdin when neither a file nor --text is given)
    #[arg(conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Encode this string's UTF-8 bytes
    #[arg(short, long)]
    text: Option<String>,

    /// Output MusicXML file (stdout by default)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ticks per quarter note
    #[arg(long)]
    quarter_duration: Option<u32>,

    /// Notes per measure
    #[arg(long)]
    notes_per_measure: Option<usize>,

    /// Part name written to the part list
    #[arg(long)]
    part_name: Option<String>,

    /// Skip the span consistency check
    #[arg(long)]
    no_validate: bool,
}

#[derive(Args)]
struct DecodeArgs {
    /// Input MusicXML file
    input: PathBuf,

    /// Write the raw bytes here instead of printing them
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not report skipped notes
    #[arg(long)]
    no_validate: bool,

    /// Reject natural accidentals instead of reading them as sharps
    #[arg(long)]
    strict_naturals: bool,

    /// Print the decode result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Commands::Encode(args) => run_encode(args, &mut config),
        Commands::Decode(args) => run_decode(args, &mut config),
        Commands::Engrave {
            input,
            lilypond_dir,
            no_midi,
        } => {
            if lilypond_dir.is_some() {
                config.engrave.lilypond_dir = lilypond_dir;
            }
            if no_midi {
                config.engrave.midi = false;
            }

            let output = engrave(&input, &config.engrave)
                .with_context(|| format!("failed to engrave {}", input.display()))?;
            eprintln!("Wrote {}", output.ly_path.display());
            if output.midi == Some(MidiPatch::HintMissing) {
                eprintln!("No MIDI block found; only the typeset score was produced");
            }
            eprintln!("Output base: {}", output.output_base.display());
            Ok(())
        }
    }
}

fn run_encode(args: EncodeArgs, config: &mut CodecConfig) -> Result<()> {
    let encoder = &mut config.encoder;
    if let Some(quarter_duration) = args.quarter_duration {
        encoder.quarter_duration = quarter_duration;
    }
    if let Some(notes_per_measure) = args.notes_per_measure {
        encoder.notes_per_measure = notes_per_measure;
    }
    if let Some(part_name) = args.part_name {
        encoder.part_name = part_name;
    }
    if args.no_validate {
        encoder.validate = false;
    }

    let data = match (&args.text, &args.input) {
        (Some(text), _) => text.as_bytes().to_vec(),
        (None, Some(path)) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        (None, None) => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    let xml = bytes_to_musicxml(&data, &config.encoder)?;
    log::info!("encoded {} bytes into {} notes", data.len(), data.len() * 2);

    match &args.output {
        Some(path) => {
            write_file(path, xml.as_bytes())?;
            eprintln!("Encoded {} bytes -> {}", data.len(), path.display());
        }
        None => std::io::stdout().write_all(xml.as_bytes())?,
    }
    Ok(())
}

fn run_decode(args: DecodeArgs, config: &mut CodecConfig) -> Result<()> {
    let decoder = &mut config.decoder;
    if args.no_validate {
        decoder.validate = false;
    }
    if args.strict_naturals {
        decoder.naturals = NaturalPolicy::Reject;
    }

    let xml = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let decoded = musicxml_to_bytes(&xml, &config.decoder)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    for warning in &decoded.warnings {
        log::warn!("{}", warning);
    }

    if let Some(path) = &args.output {
        write_file(path, &decoded.bytes)?;
        eprintln!("Decoded {} bytes -> {}", decoded.bytes.len(), path.display());
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    println!("Bytes: {}", decoded.bytes.len());
    println!("Hex:   {}", hex_string(&decoded.bytes));
    println!("Text:  {}", String::from_utf8_lossy(&decoded.bytes));
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
