pub mod cli;
pub mod config;
pub mod decoders;
pub mod error;
pub mod extract;
pub mod report;
pub mod router;
pub mod signature;
pub mod ui;

pub use cli::Cli;
pub use config::Config;
pub use error::{DecompError, Result, UserFriendlyError};
pub use report::RunReport;

use crate::cli::OutputFormat;
use crate::decoders::ToolRunner;
use crate::extract::ExtractContext;
use crate::ui::{OutputFormatter, OutputMode, ProgressManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// One planned action for a top-level archive member, produced by dry runs.
#[derive(Debug)]
pub struct MemberPlan {
    pub name: String,
    pub size: usize,
    pub kind: &'static str,
}

/// Orchestrates a whole decompilation run: output lifecycle, the recursive
/// extraction tree, and the final report.
pub struct Decompiler {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Decompiler {
    pub fn new(config: Config, mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(mode, verbose, quiet);
        // Progress bars and JSON output do not mix.
        let progress_enabled = mode == OutputMode::Human && !quiet;

        Self {
            config,
            output_formatter,
            progress_manager: ProgressManager::new(progress_enabled),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = cli.load_config()?;
        let mode = match cli.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };
        Ok(Self::new(config, mode, cli.verbosity_level(), cli.quiet))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Decompile `input` into a fresh output tree and return the run report.
    pub async fn decompile(&self, input: &Path) -> Result<RunReport> {
        let started = Instant::now();

        let data = self.read_input(input).await?;
        let output_root = self.config.output_root_for(input);
        extract::prepare_output_root(&output_root, self.config.output.force_overwrite).await?;

        self.output_formatter.start_operation(&format!(
            "Decompiling {} -> {}",
            input.display(),
            output_root.display()
        ));

        let progress = self.progress_manager.create_extract_progress();
        let ctx = Arc::new(ExtractContext::new(
            ToolRunner::new(self.config.tools.clone()),
            progress.clone(),
            self.output_formatter.verbose_level() >= 2,
        ));

        let outcome = extract::extract_container(Arc::clone(&ctx), data, output_root.clone()).await;
        progress.finish_and_clear();
        self.progress_manager.clear();
        outcome?;

        let report = RunReport::new(
            input,
            &output_root,
            &ctx.counters,
            ctx.warnings.snapshot(),
            started,
        );

        if self.config.output.write_report && output_root.is_dir() {
            self.persist_report(&report, &output_root).await?;
        }

        for warning in &report.warnings {
            self.output_formatter.warning(&warning.to_string());
        }
        self.output_formatter.print_run_summary(&report);

        Ok(report)
    }

    /// List the root archive's members and how each would be routed,
    /// without touching the filesystem.
    pub async fn plan(&self, input: &Path) -> Result<Vec<MemberPlan>> {
        let data = self.read_input(input).await?;

        let payload = match signature::validate(&data, &[signature::SARC_MAGIC])? {
            Some(payload) => payload,
            None => {
                return Err(DecompError::Corrupt {
                    format: "SARC",
                    message: format!("{} is not a SARC archive", input.display()),
                })
            }
        };

        let sarc = roead::sarc::Sarc::new(payload.as_ref()).map_err(|e| DecompError::Corrupt {
            format: "SARC",
            message: e.to_string(),
        })?;

        Ok(sarc
            .files()
            .map(|file| {
                let name = file.name.unwrap_or("<unnamed>").to_string();
                let kind = router::classify_path(Path::new(&name)).describe();
                MemberPlan {
                    name,
                    size: file.data.len(),
                    kind,
                }
            })
            .collect())
    }

    pub fn generate_sample_config(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(DecompError::Config {
                message: format!("configuration file already exists: {}", path.display()),
            });
        }
        std::fs::write(path, Config::create_sample_config())?;
        self.output_formatter
            .success(&format!("Sample configuration written to {}", path.display()));
        Ok(())
    }

    pub fn handle_error(&self, error: &DecompError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }

    async fn read_input(&self, input: &Path) -> Result<Vec<u8>> {
        if !input.is_file() {
            return Err(DecompError::InputNotFound {
                path: input.display().to_string(),
            });
        }
        Ok(tokio::fs::read(input).await?)
    }

    async fn persist_report(&self, report: &RunReport, output_root: &Path) -> Result<()> {
        let report_dir = output_root.join(".sarcdec");
        tokio::fs::create_dir_all(&report_dir).await?;
        let json = serde_json::to_string_pretty(report).map_err(|e| DecompError::Task {
            message: format!("could not serialize run report: {}", e),
        })?;
        tokio::fs::write(report_dir.join("report.json"), json).await?;
        Ok(())
    }
}

/// Report path helper shared with the CLI tests.
pub fn report_path(output_root: &Path) -> PathBuf {
    output_root.join(".sarcdec").join("report.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roead::sarc::SarcWriter;
    use roead::Endian;
    use tempfile::TempDir;

    fn quiet_decompiler(output_dir: PathBuf) -> Decompiler {
        let mut config = Config::new();
        config.output.directory_name = Some(
            output_dir
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
        );
        config.output.base_directory = output_dir.parent().unwrap().to_path_buf();
        Decompiler::new(config, OutputMode::Plain, 0, true)
    }

    fn sample_archive() -> Vec<u8> {
        let byml = roead::byml::Byml::from_text("{IsValid: true, Level: 12}")
            .unwrap()
            .to_binary(Endian::Little);
        let mut writer = SarcWriter::new(Endian::Little);
        writer.add_file("Actor/Tag.bgyml", byml);
        writer.add_file("Readme.txt", b"hello".to_vec());
        writer.to_binary()
    }

    #[tokio::test]
    async fn test_decompile_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("Bootup.pack");
        std::fs::write(&input, sample_archive()).unwrap();

        let out = tmp.path().join("out");
        let decompiler = quiet_decompiler(out.clone());
        let report = decompiler.decompile(&input).await.unwrap();

        assert_eq!(report.containers_extracted, 1);
        assert_eq!(report.artifacts_decoded, 1);
        assert_eq!(report.files_copied, 1);
        assert!(report.is_clean());
        assert!(out.join("Actor/Tag.bgyml.yml").is_file());
        assert!(out.join("Readme.txt").is_file());
        assert!(report_path(&out).is_file());
    }

    #[tokio::test]
    async fn test_decompile_missing_input() {
        let tmp = TempDir::new().unwrap();
        let decompiler = quiet_decompiler(tmp.path().join("out"));
        let err = decompiler
            .decompile(&tmp.path().join("nope.pack"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecompError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_decompile_refuses_existing_output() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("Bootup.pack");
        std::fs::write(&input, sample_archive()).unwrap();

        let out = tmp.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let decompiler = quiet_decompiler(out);
        let err = decompiler.decompile(&input).await.unwrap_err();
        assert!(matches!(err, DecompError::OutputDirectoryExists { .. }));
    }

    #[tokio::test]
    async fn test_plan_lists_members_without_writing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("Bootup.pack");
        std::fs::write(&input, sample_archive()).unwrap();

        let out = tmp.path().join("out");
        let decompiler = quiet_decompiler(out.clone());
        let mut plan = decompiler.plan(&input).await.unwrap();
        plan.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].name, "Actor/Tag.bgyml");
        assert_eq!(plan[0].kind, "BYML");
        assert_eq!(plan[1].name, "Readme.txt");
        assert_eq!(plan[1].kind, "copy");
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_plan_rejects_non_sarc_input() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("garbage.pack");
        std::fs::write(&input, b"not an archive at all").unwrap();

        let decompiler = quiet_decompiler(tmp.path().join("out"));
        let err = decompiler.plan(&input).await.unwrap_err();
        assert!(matches!(err, DecompError::Corrupt { format: "SARC", .. }));
    }

    #[test]
    fn test_generate_sample_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sarcdec.toml");
        let decompiler = quiet_decompiler(tmp.path().join("out"));

        decompiler.generate_sample_config(&path).unwrap();
        assert!(path.is_file());

        let err = decompiler.generate_sample_config(&path).unwrap_err();
        assert!(matches!(err, DecompError::Config { .. }));
    }
}
