use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use rossi_strand::app::App;
use rossi_strand::config::{ConfigLoader, ConfigOverrides};
use rossi_strand::domain::TfName;
use rossi_strand::error::RossiError;
use rossi_strand::output::{JsonOutput, OutputMode, TextOutput};
use rossi_strand::remote::HttpRemoteClient;

#[derive(Parser)]
#[command(name = "rossi-strand")]
#[command(about = "Annotate ChExMix reference peaks with the strand of the YEP motif they fall in")]
#[command(version, author)]
struct Cli {
    /// JSON config file (defaults to ./rossi-strand.json when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Metadata workbook (.xlsx) or CSV/TSV export
    #[arg(long, global = true)]
    metadata: Option<String>,

    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Where archives and reference peak files are cached
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[arg(long, global = true)]
    output_dir: Option<String>,

    /// Print reports as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the pipeline for one transcription factor")]
    Run { tf: String },
    #[command(about = "Run the pipeline for every transcription factor in the metadata")]
    RunAll,
    #[command(about = "List transcription factors found in the metadata")]
    ListTfs,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<RossiError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &RossiError) -> u8 {
    if error.is_not_found() {
        2
    } else if error.is_network() {
        3
    } else {
        1
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let overrides = ConfigOverrides {
        metadata: cli.metadata,
        sheet: cli.sheet,
        data_dir: cli.data_dir,
        output_dir: cli.output_dir,
    };
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;
    let client = HttpRemoteClient::new()?;
    let app = App::from_config(&config, client);

    match cli.command {
        Commands::Run { tf } => {
            let tf: TfName = tf.parse()?;
            let report = app.run_tf(&tf)?;
            match output_mode {
                OutputMode::Json => JsonOutput::print_tf(&report).into_diagnostic(),
                OutputMode::Text => TextOutput::print_tf(&report).into_diagnostic(),
            }
        }
        Commands::RunAll => {
            let report = app.run_all()?;
            match output_mode {
                OutputMode::Json => JsonOutput::print_run(&report).into_diagnostic(),
                OutputMode::Text => TextOutput::print_run(&report).into_diagnostic(),
            }
        }
        Commands::ListTfs => {
            let tfs = app.list_tfs()?;
            match output_mode {
                OutputMode::Json => JsonOutput::print_tfs(&tfs).into_diagnostic(),
                OutputMode::Text => TextOutput::print_tfs(&tfs).into_diagnostic(),
            }
        }
    }
}
