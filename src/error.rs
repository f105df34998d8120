use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecompError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("[{format}] corrupt data: {message}")]
    Corrupt {
        format: &'static str,
        message: String,
    },

    #[error("External tool '{tool}' exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("Failed to launch external tool '{tool}': {message}")]
    ToolLaunch { tool: String, message: String },

    #[error("External tool '{tool}' timed out after {seconds} seconds")]
    ToolTimeout { tool: String, seconds: u64 },

    #[error("External tool '{tool}' reported success but produced no output at {path}")]
    ToolMissingOutput { tool: String, path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output directory already exists: {path}")]
    OutputDirectoryExists { path: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Task join failed: {message}")]
    Task { message: String },
}

impl DecompError {
    /// Whether the error should abort the whole run instead of being
    /// converted to a per-entry warning.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DecompError::Corrupt { .. }
                | DecompError::ToolFailed { .. }
                | DecompError::ToolLaunch { .. }
                | DecompError::ToolTimeout { .. }
                | DecompError::ToolMissingOutput { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DecompError {
    fn user_message(&self) -> String {
        match self {
            DecompError::Io(e) => format!("Filesystem error: {}", e),
            DecompError::InputNotFound { path } => {
                format!("Input file not found: {}", path)
            }
            DecompError::OutputDirectoryExists { path } => {
                format!("Output directory already exists: {}", path)
            }
            DecompError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DecompError::OutputDirectoryExists { .. } => Some(
                "Remove the existing directory, choose a different output name with --output, or use --force to overwrite.".to_string()
            ),
            DecompError::InputNotFound { .. } => Some(
                "Check the archive path. The input must be a SARC container (optionally Yaz0 compressed).".to_string()
            ),
            DecompError::Config { .. } => Some(
                "Check your configuration file syntax. Run with --generate-config to produce a valid sample.".to_string()
            ),
            DecompError::ToolLaunch { tool, .. } => Some(format!(
                "Ensure '{}' is installed and on PATH, or set its location in the [tools] section of the configuration file.",
                tool
            )),
            DecompError::ToolTimeout { .. } => Some(
                "The decoder took longer than expected. Increase the timeout with --timeout or in the [tools] section.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DecompError {
    fn from(error: toml::de::Error) -> Self {
        DecompError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecompError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let corrupt = DecompError::Corrupt {
            format: "BYML",
            message: "truncated".to_string(),
        };
        assert!(!corrupt.is_fatal());

        let tool = DecompError::ToolFailed {
            tool: "msyt".to_string(),
            status: 1,
            stderr: "bad input".to_string(),
        };
        assert!(!tool.is_fatal());

        let io = DecompError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(io.is_fatal());

        let config = DecompError::Config {
            message: "bad".to_string(),
        };
        assert!(config.is_fatal());
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = DecompError::OutputDirectoryExists {
            path: "out".to_string(),
        };
        assert!(error.user_message().contains("already exists"));
        assert!(error.suggestion().unwrap().contains("--force"));
    }

    #[test]
    fn test_tool_launch_suggestion_names_tool() {
        let error = DecompError::ToolLaunch {
            tool: "msyt".to_string(),
            message: "No such file".to_string(),
        };
        assert!(error.suggestion().unwrap().contains("msyt"));
    }
}
