use super::{suffixed, DecodeStatus};
use crate::error::{DecompError, Result};
use crate::extract::materialize;
use crate::signature;
use roead::aamp::ParameterIO;
use std::path::Path;

/// Decompile a parameter archive (AAMP) to YAML at `{out_base}.yml`.
pub async fn decode(data: &[u8], out_base: &Path) -> Result<DecodeStatus> {
    let payload = match signature::validate(data, &[signature::AAMP_MAGIC])? {
        Some(payload) => payload,
        None => return Ok(DecodeStatus::NotThisFormat),
    };

    let pio = ParameterIO::from_binary(payload.as_ref()).map_err(|e| DecompError::Corrupt {
        format: "AAMP",
        message: e.to_string(),
    })?;
    let text = pio.to_text();

    let out = suffixed(out_base, "yml");
    materialize::ensure_parent(&out).await?;
    tokio::fs::write(&out, text).await?;

    Ok(DecodeStatus::Artifact(out))
}
