mod cancel;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chirp_config::SyncSettings;
use chirp_core::{OutputPolicy, SYNCED_SAMPLE_RATE, SyncJob, SyncService, Termination};
use chirp_fs::FsLogSink;
use chirp_sync::CommandSynchronizer;

use crate::cancel::CtrlCCancellation;
use crate::reporter::TerminalReporter;

#[derive(Parser)]
#[command(name = "chirp", version, about = "Batch-synchronizes acoustic recorder WAV files")]
struct Cli {
  #[command(subcommand)]
  command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
  /// Sync recordings from explicit files and/or selected folders.
  Sync(SyncArgs),
  /// Print the persisted sync settings.
  Config,
}

#[derive(Args)]
struct SyncArgs {
  /// Recording files to sync.
  files: Vec<PathBuf>,

  /// Folder whose recordings are synced; may be repeated.
  #[arg(long = "folder")]
  folders: Vec<PathBuf>,

  /// Write output under this directory instead of alongside the inputs.
  #[arg(long)]
  destination: Option<PathBuf>,

  /// Create one subdirectory per selected folder under the destination.
  #[arg(long)]
  mirror: bool,

  /// Prefix prepended to output file names.
  #[arg(long)]
  prefix: Option<String>,

  /// Resample output to 192 kHz.
  #[arg(long)]
  resample: bool,

  /// Let the engine auto-resolve ambiguous timestamps.
  #[arg(long)]
  auto_resolve: bool,

  /// Sync engine binary to use instead of searching PATH.
  #[arg(long)]
  engine: Option<PathBuf>,

  /// Print the batch result as JSON on stdout.
  #[arg(long)]
  json: bool,
}

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  init_tracing();

  let cli = Cli::parse();
  match cli.command {
    CliCommand::Sync(args) => run_sync(args).await,
    CliCommand::Config => show_config(),
  }
}

fn show_config() -> Result<ExitCode> {
  let settings = SyncSettings::load().context("failed to load settings")?;
  println!("{}", serde_json::to_string_pretty(&settings)?);
  Ok(ExitCode::SUCCESS)
}

/// Merges CLI flags over the persisted settings and builds the job. Mirrored
/// output only applies when at least one folder was selected, matching the
/// desktop app's folder-selection rule.
fn build_job(args: &SyncArgs, settings: &SyncSettings) -> Result<SyncJob> {
  let mut files = args.files.clone();
  let from_folders = !args.folders.is_empty();

  if from_folders {
    files.extend(chirp_fs::collect_recordings(&args.folders)?);
  }

  if files.is_empty() {
    bail!("no recordings selected; pass files or --folder");
  }

  let destination = args.destination.clone().or_else(|| settings.destination.clone());
  let mirror = args.mirror || settings.mirror_subdirectories;

  let output = match destination {
    None => OutputPolicy::InPlace,
    Some(dir) if mirror && from_folders => OutputPolicy::CustomMirrored(dir),
    Some(dir) => OutputPolicy::Custom(dir),
  };

  let prefix =
    args.prefix.clone().or_else(|| settings.prefix.clone()).filter(|p| !p.is_empty());
  let resample = args.resample || settings.resample;

  Ok(SyncJob {
    files,
    output,
    prefix,
    resample_hz: resample.then_some(SYNCED_SAMPLE_RATE),
    auto_resolve: args.auto_resolve || settings.auto_resolve,
  })
}

async fn run_sync(args: SyncArgs) -> Result<ExitCode> {
  let settings = SyncSettings::load().context("failed to load settings")?;
  let job = build_job(&args, &settings)?;

  let engine = match args.engine.clone().or_else(|| settings.engine.clone()) {
    Some(path) => CommandSynchronizer::new(path),
    None => CommandSynchronizer::locate().context("no sync engine available")?,
  };

  let reporter = TerminalReporter::new(job.files.len());
  let cancel = CtrlCCancellation::install();
  let service = SyncService::new(engine, reporter, cancel, FsLogSink::new());

  let result = service.run(&job).await;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&result)?);
  }

  Ok(match result.termination {
    Termination::Completed => ExitCode::SUCCESS,
    Termination::AbortedOnLogFailure => ExitCode::from(2),
    Termination::Cancelled => ExitCode::from(130),
  })
}
