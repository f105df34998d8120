use crate::decoders::{self, DecodeStatus, ToolRunner};
use crate::error::{DecompError, Result};
use crate::extract::materialize;
use crate::report::{RunCounters, Warning, WarningSink};
use crate::router::{self, FormatKind};
use crate::signature;
use indicatif::ProgressBar;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinSet;

/// State shared by every task in one extraction tree.
pub struct ExtractContext {
    pub tools: ToolRunner,
    pub warnings: WarningSink,
    pub counters: RunCounters,
    pub progress: ProgressBar,
    /// Emit a `[COPY]` line for every pass-through member.
    pub verbose: bool,
}

impl ExtractContext {
    pub fn new(tools: ToolRunner, progress: ProgressBar, verbose: bool) -> Self {
        Self {
            tools,
            warnings: WarningSink::new(),
            counters: RunCounters::new(),
            progress,
            verbose,
        }
    }
}

type ExtractFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Recursively unpack one SARC container into `out_dir`.
///
/// Member raw bytes are written sequentially in table order; decode and
/// sub-container work is spawned concurrently and joined before returning.
/// Every per-entry failure is converted to a warning at this boundary, so
/// one corrupt member never aborts its siblings; only filesystem and join
/// errors propagate out.
///
/// Decode tasks take ownership of the member bytes in memory. Only
/// pass-through members and external-tool inputs ever touch disk in raw
/// form, and the tool staging file is removed once the tool exits.
pub fn extract_container(
    ctx: Arc<ExtractContext>,
    data: Vec<u8>,
    out_dir: std::path::PathBuf,
) -> ExtractFuture {
    Box::pin(async move {
        let payload = match signature::validate(&data, &[signature::SARC_MAGIC]) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                ctx.warnings.push(Warning::new(
                    "SARC",
                    &out_dir,
                    "not a valid SARC archive",
                ));
                return Ok(());
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                ctx.warnings.push(Warning::new("SARC", &out_dir, e.to_string()));
                return Ok(());
            }
        };

        materialize::ensure_dir(&out_dir).await?;

        // Copy the member table out so the parse borrow ends before any task
        // is spawned; spawned work needs owned bytes anyway.
        let members: Vec<(String, Vec<u8>)> = {
            let sarc = match roead::sarc::Sarc::new(payload.as_ref()) {
                Ok(sarc) => sarc,
                Err(e) => {
                    ctx.warnings.push(Warning::new("SARC", &out_dir, e.to_string()));
                    return Ok(());
                }
            };
            sarc.files()
                .filter_map(|file| match file.name {
                    Some(name) => Some((name.to_string(), file.data.to_vec())),
                    None => {
                        ctx.warnings.push(Warning::new(
                            "SARC",
                            &out_dir,
                            "skipped member without a name",
                        ));
                        None
                    }
                })
                .collect()
        };
        ctx.counters.record_container();

        let mut tasks: JoinSet<Result<()>> = JoinSet::new();

        for (name, bytes) in members {
            let member_path = out_dir.join(&name);
            materialize::ensure_parent(&member_path).await?;

            match router::classify_path(&member_path) {
                FormatKind::PassThrough => {
                    tokio::fs::write(&member_path, &bytes).await?;
                    ctx.counters.record_copied();
                    if ctx.verbose {
                        ctx.progress.suspend(|| println!("[COPY] {}", name));
                    }
                }
                FormatKind::Leaf(format) => {
                    let ctx = Arc::clone(&ctx);
                    tasks.spawn(async move {
                        decode_member(ctx, format, bytes, member_path).await
                    });
                }
                FormatKind::Container => {
                    let ctx = Arc::clone(&ctx);
                    tasks.spawn(extract_container(ctx, bytes, member_path));
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| DecompError::Task {
                message: e.to_string(),
            })?;
            result?;
        }

        Ok(())
    })
}

/// Decode one leaf member, converting every non-fatal failure into a
/// warning tagged with the format name.
async fn decode_member(
    ctx: Arc<ExtractContext>,
    format: router::LeafFormat,
    bytes: Vec<u8>,
    out_base: std::path::PathBuf,
) -> Result<()> {
    if let Some(name) = out_base.file_name() {
        ctx.progress.set_message(name.to_string_lossy().to_string());
    }

    match decoders::decode(format, bytes, out_base.clone(), &ctx.tools).await {
        Ok(DecodeStatus::Artifact(_)) => {
            ctx.counters.record_decoded();
            ctx.progress.inc(1);
            Ok(())
        }
        Ok(DecodeStatus::NotThisFormat) => {
            ctx.warnings.push(Warning::new(
                format.tag(),
                &out_base,
                format!("not a valid {} file", format.tag()),
            ));
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            ctx.warnings.push(Warning::new(format.tag(), &out_base, e.to_string()));
            Ok(())
        }
    }
}
