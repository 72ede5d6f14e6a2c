//! rcpad CLI: drive a remote-controlled vehicle from the terminal.
//!
//! `drive` runs an interactive session against a simulated vehicle; the other
//! commands inspect replay files and key bindings.

// CLI-specific lint allowances (CLI binary, not library)
#![allow(missing_docs)]
#![allow(clippy::print_stdout)] // CLI must print to stdout
#![allow(clippy::print_stderr)] // CLI must print to stderr
#![allow(clippy::exit)] // CLI uses exit codes

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use rcpad::config::load_config_file;
use rcpad::model::KEY_BINDINGS;
use rcpad::{ControllerConfig, ControllerError, ReplaySequence};
use std::io;
use std::path::{Path, PathBuf};

mod logging;
mod record;
mod session;
mod sim;

/// Color output mode
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and `NO_COLOR` env
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(
    name = "rcpad",
    version,
    about = "Drive a remote-controlled vehicle from the terminal"
)]
struct Cli {
    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start an interactive driving session
    Drive(DriveArgs),
    /// Parse a replay file and print the resulting sequence
    CheckReplay {
        /// Replay file to parse
        file: PathBuf,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// List the live key bindings
    Keys {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
struct DriveArgs {
    #[arg(long, help = "Load settings from a JSON or YAML config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Replay file to load (default: movements.txt)")]
    replay_file: Option<PathBuf>,
    #[arg(
        long,
        conflicts_with_all = ["replay_file", "require_replay"],
        help = "Run without a replay sequence"
    )]
    no_replay: bool,
    #[arg(long, help = "Fail instead of disabling replay when the file is missing")]
    require_replay: bool,
    #[arg(long, help = "Pause between replay elements in milliseconds")]
    replay_delay_ms: Option<u64>,
    #[arg(long, help = "Dispatches per held replay element")]
    hold_repeats: Option<u32>,
    #[arg(long, help = "Bounded wait per key poll in milliseconds")]
    poll_interval_ms: Option<u64>,
    #[arg(long, help = "Append dispatched movement commands to this file as NDJSON")]
    record: Option<PathBuf>,
    #[arg(long, help = "Write logs to this file (filter with RCPAD_LOG)")]
    log_file: Option<PathBuf>,
}

/// Configure color output based on CLI flag and environment
fn configure_colors(mode: ColorMode) {
    let use_color = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                supports_color::on(supports_color::Stream::Stderr).is_some()
            }
        }
    };

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .color(use_color)
                .unicode(use_color)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_colors(cli.color);
    match cli.command {
        Commands::Drive(args) => cmd_drive(args),
        Commands::CheckReplay { file, json } => cmd_check_replay(&file, json),
        Commands::Keys { json } => cmd_keys(json),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

/// Handle the drive command.
fn cmd_drive(args: DriveArgs) -> Result<()> {
    let config = resolve_config(&args).unwrap_or_else(|err| exit_with(err, false));
    logging::init(args.log_file.as_deref())?;
    let recorder = args
        .record
        .as_deref()
        .map(record::EventRecorder::create)
        .transpose()
        .into_diagnostic()?;
    match session::run(config, recorder) {
        Ok(summary) => {
            eprintln!("{summary}");
            Ok(())
        }
        Err(err) => exit_with(err, false),
    }
}

/// Handle the check-replay command.
fn cmd_check_replay(file: &Path, json: bool) -> Result<()> {
    let sequence = ReplaySequence::load(file).unwrap_or_else(|err| exit_with(err, json));
    if json {
        let payload = serde_json::json!({
            "path": file.display().to_string(),
            "len": sequence.len(),
            "sequence": sequence.to_string(),
            "commands": sequence.as_slice(),
        });
        println!("{}", serde_json::to_string(&payload).into_diagnostic()?);
    } else {
        println!("{} ({} commands)", sequence, sequence.len());
        for (index, command) in sequence.iter().enumerate() {
            println!("  {:>2}. {command}", index + 1);
        }
    }
    Ok(())
}

/// Handle the keys command.
fn cmd_keys(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(KEY_BINDINGS).into_diagnostic()?);
    } else {
        for binding in KEY_BINDINGS {
            println!("  {:<8} {}", binding.key, binding.action);
        }
    }
    Ok(())
}

/// Handle the completions command.
#[allow(clippy::unnecessary_wraps)] // Consistent with other command handlers
fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn resolve_config(args: &DriveArgs) -> Result<ControllerConfig, ControllerError> {
    let mut config = match args.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => ControllerConfig::default(),
    };
    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut ControllerConfig, args: &DriveArgs) {
    if args.no_replay {
        config.replay_file = None;
        config.replay_required = false;
    }
    if let Some(path) = args.replay_file.as_ref() {
        config.replay_file = Some(path.clone());
    }
    if args.require_replay {
        config.replay_required = true;
    }
    if let Some(delay) = args.replay_delay_ms {
        config.replay_delay_ms = delay;
    }
    if let Some(repeats) = args.hold_repeats {
        config.hold_repeats = repeats;
    }
    if let Some(interval) = args.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
}

/// Report `err` and exit with its code. In JSON mode the report is a
/// `{code, message}` object on stdout.
fn exit_with(err: ControllerError, json: bool) -> ! {
    let code = err.exit_code();
    if json {
        let payload = serde_json::json!({
            "code": err.code().as_str(),
            "message": err.to_string(),
        });
        println!("{payload}");
    } else {
        eprintln!("{:?}", miette::Report::new(err));
    }
    std::process::exit(code);
}
