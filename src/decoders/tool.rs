use super::{suffixed, DecodeStatus};
use crate::config::ToolsConfig;
use crate::error::{DecompError, Result};
use crate::extract::materialize;
use crate::router::LeafFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const STDERR_LIMIT: usize = 400;

/// Runs format decoders that live outside the process. The member bytes are
/// staged to a transient file (tools consume paths, not pipes), the tool is
/// invoked with captured output and a timeout, and the staged file plus any
/// partial artifact are removed on failure.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    config: ToolsConfig,
}

/// One resolved tool command: program, argument list, and the artifact the
/// tool is expected to produce.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub artifact: PathBuf,
    pub artifact_is_dir: bool,
}

impl ToolRunner {
    pub fn new(config: ToolsConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout)
    }

    /// Build the command line for one format. Most tools take
    /// `(input, output)` positionally; the message-table exporter uses an
    /// `export -o` subcommand shape.
    pub fn invocation(
        &self,
        format: LeafFormat,
        staged: &Path,
        out_base: &Path,
    ) -> ToolInvocation {
        match format {
            LeafFormat::Bars => ToolInvocation {
                program: self.config.bars.clone(),
                args: vec![staged.into(), out_base.into()],
                artifact: out_base.to_path_buf(),
                artifact_is_dir: true,
            },
            LeafFormat::Evfl => {
                let artifact = suffixed(out_base, "json");
                ToolInvocation {
                    program: self.config.evfl.clone(),
                    args: vec![staged.into(), artifact.clone().into()],
                    artifact,
                    artifact_is_dir: false,
                }
            }
            LeafFormat::Bfres => ToolInvocation {
                program: self.config.bfres.clone(),
                args: vec![staged.into(), out_base.into()],
                artifact: out_base.to_path_buf(),
                artifact_is_dir: true,
            },
            LeafFormat::Havok => {
                let artifact = suffixed(out_base, "json");
                ToolInvocation {
                    program: self.config.havok.clone(),
                    args: vec![staged.into(), artifact.clone().into()],
                    artifact,
                    artifact_is_dir: false,
                }
            }
            LeafFormat::Msbt => {
                let artifact = suffixed(out_base, "yml");
                ToolInvocation {
                    program: self.config.msbt.clone(),
                    args: vec![
                        OsString::from("export"),
                        OsString::from("-o"),
                        artifact.clone().into(),
                        staged.into(),
                    ],
                    artifact,
                    artifact_is_dir: false,
                }
            }
            LeafFormat::Aamp | LeafFormat::Byml => {
                unreachable!("decoded in-process, never dispatched to a tool")
            }
        }
    }

    pub async fn decode(
        &self,
        format: LeafFormat,
        data: &[u8],
        out_base: &Path,
    ) -> Result<DecodeStatus> {
        let staged = suffixed(out_base, "raw");
        materialize::ensure_parent(&staged).await?;
        tokio::fs::write(&staged, data).await?;

        let invocation = self.invocation(format, &staged, out_base);
        if invocation.artifact_is_dir {
            materialize::ensure_dir(&invocation.artifact).await?;
        }

        let result = self.run(&invocation).await;

        // The staged input is transient no matter how the tool fared.
        tokio::fs::remove_file(&staged).await.ok();

        match result {
            Ok(()) => {
                if !invocation.artifact_is_dir {
                    let exists = tokio::fs::try_exists(&invocation.artifact)
                        .await
                        .unwrap_or(false);
                    if !exists {
                        return Err(DecompError::ToolMissingOutput {
                            tool: invocation.program,
                            path: invocation.artifact,
                        });
                    }
                }
                Ok(DecodeStatus::Artifact(invocation.artifact))
            }
            Err(e) => {
                remove_partial(&invocation.artifact, invocation.artifact_is_dir).await;
                Err(e)
            }
        }
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| DecompError::ToolLaunch {
            tool: invocation.program.clone(),
            message: e.to_string(),
        })?;

        let output = match tokio::time::timeout(self.timeout(), child.wait_with_output()).await {
            Err(_) => {
                return Err(DecompError::ToolTimeout {
                    tool: invocation.program.clone(),
                    seconds: self.config.timeout,
                })
            }
            Ok(Err(e)) => {
                return Err(DecompError::ToolLaunch {
                    tool: invocation.program.clone(),
                    message: e.to_string(),
                })
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(DecompError::ToolFailed {
                tool: invocation.program.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: truncate_output(&output.stderr),
            });
        }

        Ok(())
    }
}

/// Remove whatever a failed tool left behind at the artifact path.
async fn remove_partial(artifact: &Path, is_dir: bool) {
    if is_dir {
        tokio::fs::remove_dir_all(artifact).await.ok();
    } else {
        tokio::fs::remove_file(artifact).await.ok();
    }
}

fn truncate_output(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_LIMIT {
        trimmed.to_string()
    } else {
        let mut end = STDERR_LIMIT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
