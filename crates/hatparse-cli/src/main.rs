use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use hatparse_core::render::{StdoutSink, render_record};
use hatparse_core::{DecodeError, LoadError, Report, report_file};
use log::{debug, info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("HATPARSE_BUILD_COMMIT"),
    ", ",
    env!("HATPARSE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  hatparse eeprom decode board.eep\n  hatparse eeprom decode board.eep -o report.json\n  hatparse eeprom parse dump.bin --stdout --pretty";

#[derive(Parser, Debug)]
#[command(name = "hatparse")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Raspberry Pi HAT EEPROM images.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on HAT EEPROM images.
    Eeprom {
        #[command(subcommand)]
        command: EepromCommands,
    },
}

#[derive(Subcommand, Debug)]
enum EepromCommands {
    /// Decode an image and print it as text, or write a JSON report.
    #[command(alias = "parse")]
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to an .eep or .bin image (a glob matching one file is accepted)
    input: PathBuf,

    /// Write a JSON report to this path instead of printing text
    #[arg(short = 'o', long)]
    report: Option<PathBuf>,

    /// Write the JSON report to stdout instead of printing text
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error status output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if an atom fails its CRC or the atom table is truncated
    #[arg(long)]
    strict: bool,

    /// List decoded atoms on stderr
    #[arg(long)]
    list_atoms: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Eeprom { command } => match command {
            EepromCommands::Decode(args) => cmd_eeprom_decode(args),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_eeprom_decode(args: DecodeArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;
    if let Some(report_path) = args.report.as_ref() {
        ensure_distinct_output(&input, report_path)?;
    }

    let report = report_file(&input).map_err(|err| load_error(&input, err))?;
    info!(
        "decoded {} atom(s) from {} ({} bytes)",
        report.eeprom.atoms.len(),
        input.display(),
        report.input.bytes
    );

    if args.stdout {
        print!("{}", serialize_report(&report, args.pretty, args.compact)?);
    } else if let Some(report_path) = args.report.as_ref() {
        let json = serialize_report(&report, args.pretty, args.compact)?;
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(report_path, json)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        if !args.quiet {
            eprintln!("OK: report written -> {}", report_path.display());
        }
    } else {
        render_record(&report.eeprom, &mut StdoutSink);
    }

    if args.list_atoms && !args.quiet {
        print_atoms(&report);
    }
    if args.strict && report.eeprom.has_integrity_issues() {
        return Err(CliError::new(
            "integrity issues detected (CRC mismatch or truncated atom table)",
            Some("use --list-atoms to inspect".to_string()),
        ));
    }
    Ok(())
}

fn load_error(input: &Path, err: LoadError) -> CliError {
    match err {
        LoadError::Source(err) => CliError::new(
            format!("Failed to read input file: {}: {}", input.display(), err),
            None,
        ),
        LoadError::Decode(err) => {
            let hint = match err {
                DecodeError::InvalidSignature => {
                    "HAT EEPROM images start with the ASCII signature 'R-Pi'"
                }
                DecodeError::InvalidData { .. } => "the image is shorter than the 12-byte header",
                DecodeError::BufferTooSmall { .. } => {
                    "the image looks truncated; read back the whole EEPROM"
                }
                DecodeError::UnsupportedVersion { .. } => "only format version 0x02 is supported",
            };
            CliError::new(
                format!(
                    "cannot decode {}: {} (status {})",
                    input.display(),
                    err,
                    err.code()
                ),
                Some(hint.to_string()),
            )
        }
    }
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    json.context("JSON serialization failed")
        .map_err(Into::into)
}

fn print_atoms(rep: &Report) {
    eprintln!("Atoms:");
    for (index, atom) in rep.eeprom.atoms.iter().enumerate() {
        eprintln!(
            "  #{} {} 0x{:04x} @{} ({} bytes, crc {})",
            index,
            atom.kind.name(),
            atom.atom_type,
            atom.offset,
            atom.data_len,
            atom.crc.label()
        );
    }
    if let Some(offset) = rep.eeprom.truncated_at {
        eprintln!("  atom table truncated at offset {}", offset);
    }
}

fn ensure_distinct_output(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // The output directory may not exist yet; nothing to collide with then.
    let Ok(parent_abs) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report.display()))?;
    if parent_abs.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass an .eep or .bin EEPROM image".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass an .eep or .bin EEPROM image".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "eep" && ext != "bin" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected an .eep or .bin file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }
    debug!("pattern '{}' matched {} file(s)", pattern, matches.len());

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .eep or .bin".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if count > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, count, listed, more
                ),
                Some("pass a single image file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
