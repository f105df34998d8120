use super::{suffixed, DecodeStatus};
use crate::error::{DecompError, Result};
use crate::extract::materialize;
use crate::signature;
use roead::byml::Byml;
use std::path::Path;

/// Decompile a binary-YAML (BYML) file to YAML at `{out_base}.yml`.
pub async fn decode(data: &[u8], out_base: &Path) -> Result<DecodeStatus> {
    let payload = match signature::validate(data, &signature::BYML_MAGICS)? {
        Some(payload) => payload,
        None => return Ok(DecodeStatus::NotThisFormat),
    };

    let byml = Byml::from_binary(payload.as_ref()).map_err(|e| DecompError::Corrupt {
        format: "BYML",
        message: e.to_string(),
    })?;
    let text = byml.to_text();

    let out = suffixed(out_base, "yml");
    materialize::ensure_parent(&out).await?;
    tokio::fs::write(&out, text).await?;

    Ok(DecodeStatus::Artifact(out))
}
