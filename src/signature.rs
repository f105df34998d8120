use crate::error::{DecompError, Result};
use std::borrow::Cow;

/// Yaz0 compression wrapper marker. Any buffer starting with it is
/// decompressed before the real magic check.
pub const YAZ0_MAGIC: &[u8] = b"Yaz0";

pub const SARC_MAGIC: &[u8] = b"SARC";
pub const AAMP_MAGIC: &[u8] = b"AAMP";
/// BYML carries one of two magics depending on byte order.
pub const BYML_MAGICS: [&[u8]; 2] = [b"BY", b"YB"];

/// Validate the leading bytes of a buffer against an allowed set of magics,
/// stripping an outer Yaz0 wrapper first.
///
/// Returns the (possibly decompressed) payload on a match and `None` when the
/// buffer does not carry any of the expected magics. Empty or too-short input
/// is a mismatch, not an error. A malformed Yaz0 stream is an error: unlike
/// a wrong extension, a broken compressed blob is never silently skippable.
pub fn validate<'a>(data: &'a [u8], expected: &[&[u8]]) -> Result<Option<Cow<'a, [u8]>>> {
    let payload: Cow<'a, [u8]> = if data.len() >= YAZ0_MAGIC.len() && &data[..YAZ0_MAGIC.len()] == YAZ0_MAGIC {
        let decompressed = roead::yaz0::decompress(data).map_err(|e| DecompError::Corrupt {
            format: "Yaz0",
            message: e.to_string(),
        })?;
        Cow::Owned(decompressed)
    } else {
        Cow::Borrowed(data)
    };

    let matched = expected
        .iter()
        .any(|magic| payload.len() >= magic.len() && &payload[..magic.len()] == *magic);

    Ok(matched.then_some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_magic_match() {
        let data = b"SARC\x14\x00\xff\xfe";
        let result = validate(data, &[SARC_MAGIC]).unwrap();
        assert_eq!(result.unwrap().as_ref(), data);
    }

    #[test]
    fn test_magic_mismatch_is_none_not_error() {
        let data = b"AAMP\x02\x00\x00\x00";
        assert!(validate(data, &[SARC_MAGIC]).unwrap().is_none());
    }

    #[test]
    fn test_allowed_set_accepts_either_byte_order() {
        assert!(validate(b"BY\x00\x02rest", &BYML_MAGICS).unwrap().is_some());
        assert!(validate(b"YB\x00\x02rest", &BYML_MAGICS).unwrap().is_some());
        assert!(validate(b"XX\x00\x02rest", &BYML_MAGICS).unwrap().is_none());
    }

    #[test]
    fn test_empty_and_short_input_mismatch() {
        assert!(validate(b"", &[SARC_MAGIC]).unwrap().is_none());
        assert!(validate(b"SA", &[SARC_MAGIC]).unwrap().is_none());
        assert!(validate(b"SAR", &[SARC_MAGIC]).unwrap().is_none());
        // Two-byte magics still match two-byte input
        assert!(validate(b"BY", &BYML_MAGICS).unwrap().is_some());
    }

    #[test]
    fn test_yaz0_wrapper_is_stripped() {
        let inner = roead::byml::Byml::from_text("{Level: 3}")
            .unwrap()
            .to_binary(roead::Endian::Little);
        let compressed = roead::yaz0::compress(&inner);

        let payload = validate(&compressed, &BYML_MAGICS).unwrap().unwrap();
        assert_eq!(payload.as_ref(), inner.as_slice());
    }

    #[test]
    fn test_yaz0_strip_then_mismatch() {
        let compressed = roead::yaz0::compress(b"plain text, not BYML");
        assert!(validate(&compressed, &BYML_MAGICS).unwrap().is_none());
    }

    #[test]
    fn test_malformed_yaz0_is_hard_error() {
        // Yaz0 magic followed by a truncated header/stream
        let result = validate(b"Yaz0\xff\xff", &[SARC_MAGIC]);
        match result {
            Err(DecompError::Corrupt { format, .. }) => assert_eq!(format, "Yaz0"),
            other => panic!("expected Corrupt error, got {:?}", other.map(|c| c.is_some())),
        }
    }
}
