mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "solguard")]
#[command(about = "Heuristic security auditing for ERC-20 token contracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a contract source file (or directory of .sol files)
    Audit {
        /// Path to a .sol file or a directory containing the contract sources
        path: PathBuf,

        /// Deployed runtime bytecode (hex, 0x-prefixed); enables bytecode checks
        #[arg(short, long)]
        bytecode: Option<String>,

        /// The audited contract's own address, excluded from hardcoded-address findings
        #[arg(short, long)]
        address: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Minimum severity to report
        #[arg(short, long, default_value = "info")]
        severity: SeverityFilter,

        /// Run only these detectors (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        detectors: Option<Vec<String>>,

        /// Exclude these detectors (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Report size cap (overrides config)
        #[arg(short, long)]
        max_findings: Option<usize>,

        /// Path to config file (default: .solguard.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress banner and summary
        #[arg(short, long)]
        quiet: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// List all available detectors
    List,
    /// Generate a default .solguard.toml config file
    Init,
}

#[derive(ValueEnum, Clone)]
enum OutputFormat {
    Text,
    Json,
    Sarif,
}

#[derive(ValueEnum, Clone)]
enum SeverityFilter {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            path,
            bytecode,
            address,
            format,
            severity,
            detectors,
            exclude,
            max_findings,
            config,
            quiet,
            no_color,
        } => commands::audit::run(
            &path,
            bytecode,
            address,
            format,
            severity,
            detectors,
            exclude,
            max_findings,
            config,
            quiet,
            no_color,
        ),
        Commands::List => commands::list::run(),
        Commands::Init => commands::init::run(),
    }
}
