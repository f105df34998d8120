use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sarcdec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recursively decompile SARC game archives into readable YAML/JSON trees")]
#[command(
    long_about = "Sarcdec opens a SARC container (optionally Yaz0 compressed), recursively \
                  extracts every nested archive, and converts each recognized member \
                  (AAMP, BYML, BARS, BFEVFL, BFRES, Havok, MSBT) into a text or JSON \
                  artifact, mirroring the archive's directory structure."
)]
#[command(after_help = "EXAMPLES:\n  \
    sarcdec TitleBG.pack\n  \
    sarcdec Enemy_Lizalfos.sbactorpack --output lizalfos --verbose\n  \
    sarcdec Bootup.pack --dry-run\n  \
    sarcdec Bootup.pack --config my-tools.toml --timeout 300")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Root archive to decompile (SARC container, optionally Yaz0 compressed)
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Output directory (defaults to decomp_{archive stem})
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// External decoder timeout in seconds
    #[arg(long, help = "Timeout for each external decoder invocation (seconds)")]
    pub timeout: Option<u64>,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output directory
    #[arg(long, help = "Overwrite existing output directory")]
    pub force: bool,

    /// Dry run (list members and their routing without extracting)
    #[arg(long, help = "Show what would be decompiled without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,

    /// Skip writing the JSON run report into the output tree
    #[arg(long, help = "Do not persist the run report inside the output directory")]
    pub no_report: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let output_dir = self.output.as_ref().map(|o| {
            if o.contains('/') || o.contains('\\') {
                PathBuf::from(o)
            } else {
                std::env::current_dir().unwrap_or_default().join(o)
            }
        });

        CliOverrides::new()
            .with_output_dir(output_dir)
            .with_timeout(self.timeout)
            .with_force_overwrite(self.force.then_some(true))
            .with_write_report(self.no_report.then_some(false))
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
