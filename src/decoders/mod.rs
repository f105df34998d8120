pub mod aamp;
pub mod byml;
pub mod tool;

pub use tool::ToolRunner;

use crate::error::Result;
use crate::router::LeafFormat;
use std::path::{Path, PathBuf};

/// Explicit outcome of one decode attempt. `NotThisFormat` means the magic
/// check rejected the content; the caller warns and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// An artifact (file or directory) was written at the contained path.
    Artifact(PathBuf),
    NotThisFormat,
}

/// Decode one member's bytes into a human-readable artifact rooted at
/// `out_base`. The decoder owns the bytes; nothing is re-read from disk.
pub async fn decode(
    format: LeafFormat,
    data: Vec<u8>,
    out_base: PathBuf,
    tools: &ToolRunner,
) -> Result<DecodeStatus> {
    match format {
        LeafFormat::Aamp => aamp::decode(&data, &out_base).await,
        LeafFormat::Byml => byml::decode(&data, &out_base).await,
        LeafFormat::Bars
        | LeafFormat::Evfl
        | LeafFormat::Bfres
        | LeafFormat::Havok
        | LeafFormat::Msbt => tools.decode(format, &data, &out_base).await,
    }
}

/// Append a suffix to the full file name: `Tag.bgyml` + `yml` →
/// `Tag.bgyml.yml`. The input path stays visible in the artifact name.
pub(crate) fn suffixed(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
