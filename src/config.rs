use crate::error::{DecompError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// External decoder programs. Formats without an in-process decoder are
/// handed to these executables; each receives `(input, output)`-shaped
/// arguments and signals failure by a nonzero exit code.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub bars: String,
    pub evfl: String,
    pub bfres: String,
    pub havok: String,
    pub msbt: String,
    /// Per-invocation timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the output tree is created under.
    pub base_directory: PathBuf,
    /// Output directory name; defaults to `decomp_{input stem}`.
    pub directory_name: Option<String>,
    /// Remove a pre-existing output directory instead of refusing.
    pub force_overwrite: bool,
    /// Persist the run report as JSON inside the output tree.
    pub write_report: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bars: "bars-extract".to_string(),
            evfl: "evfl-to-json".to_string(),
            bfres: "decompile-bfres".to_string(),
            havok: "hkx-to-json".to_string(),
            msbt: "msyt".to_string(),
            timeout: 120,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            directory_name: None,
            force_overwrite: false,
            write_report: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DecompError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DecompError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| DecompError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["sarcdec.toml", ".sarcdec.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.output.base_directory.clone());
            if let Some(name) = output_dir.file_name() {
                self.output.directory_name = Some(name.to_string_lossy().to_string());
            }
        }

        if let Some(timeout) = cli_args.timeout {
            self.tools.timeout = timeout;
        }

        if let Some(force) = cli_args.force_overwrite {
            self.output.force_overwrite = force;
        }

        if let Some(write_report) = cli_args.write_report {
            self.output.write_report = write_report;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| DecompError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| DecompError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tools.timeout == 0 {
            return Err(DecompError::Config {
                message: "Tool timeout must be greater than 0".to_string(),
            });
        }

        for (name, program) in [
            ("bars", &self.tools.bars),
            ("evfl", &self.tools.evfl),
            ("bfres", &self.tools.bfres),
            ("havok", &self.tools.havok),
            ("msbt", &self.tools.msbt),
        ] {
            if program.trim().is_empty() {
                return Err(DecompError::Config {
                    message: format!("Tool '{}' must not be empty", name),
                });
            }
        }

        if let Some(ref name) = self.output.directory_name {
            if name.is_empty() {
                return Err(DecompError::Config {
                    message: "Output directory name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn tool_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.tools.timeout)
    }

    /// Resolve the output root for a given input archive.
    pub fn output_root_for(&self, input: &Path) -> PathBuf {
        let name = match self.output.directory_name {
            Some(ref name) => name.clone(),
            None => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "archive".to_string());
                format!("decomp_{}", stem)
            }
        };
        self.output.base_directory.join(name)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub force_overwrite: Option<bool>,
    pub write_report: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_force_overwrite(mut self, force: Option<bool>) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn with_write_report(mut self, write_report: Option<bool>) -> Self {
        self.write_report = write_report;
        self
    }
}
