use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hydrad_cli::output::OutputFormat;

mod commands;

use commands::LoadOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "HYDRAD loop-model configuration utilities")]
struct Cli {
    /// Configuration file (`.json` or generated `config.h`). Defaults to
    /// `HYDRAD_CONFIG`, then the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore `HYDRAD_*` environment overrides.
    #[arg(long, global = true)]
    no_env: bool,

    /// Reject unknown `#define` names in headers instead of skipping them.
    #[arg(long, global = true)]
    strict: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the configuration and report every error and warning.
    Validate,
    /// Load the configuration and print it.
    Show,
    /// Write the loaded configuration as JSON or as a `config.h` tree.
    Export {
        /// Target representation.
        #[arg(long = "to", value_enum)]
        to: ExportTarget,
        /// Output file for JSON, or root directory for the header tree.
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the reference configuration shipped with the solver.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportTarget {
    Json,
    Header,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let options = LoadOptions {
        config: cli.config,
        use_env: !cli.no_env,
        strict: cli.strict,
    };

    match cli.command {
        Command::Validate => commands::validate::handle_validate(&options, cli.format),
        Command::Show => commands::show::handle_show(&options, cli.format),
        Command::Export { to, output } => match to {
            ExportTarget::Json => commands::export::handle_export_json(&options, &output),
            ExportTarget::Header => commands::export::handle_export_header(&options, &output),
        },
        Command::Reference => commands::show::handle_reference(cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
