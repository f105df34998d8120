use std::ffi::OsStr;
use std::path::Path;

/// Routing decision for one archive member, derived purely from its
/// extension. The extension is a hint, not a guarantee: content mismatches
/// are caught by the signature check inside the decoder, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// A nested SARC container; extraction recurses into it.
    Container,
    /// A recognized leaf format handled by one decoder.
    Leaf(LeafFormat),
    /// Unrecognized; the raw bytes are kept as the final artifact.
    PassThrough,
}

impl FormatKind {
    /// Human-readable label used by dry-run listings.
    pub fn describe(&self) -> &'static str {
        match self {
            FormatKind::Container => "container",
            FormatKind::Leaf(format) => format.tag(),
            FormatKind::PassThrough => "copy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafFormat {
    /// Parameter archive (AAMP), decompiled to YAML.
    Aamp,
    /// Binary YAML markup (BYML), decompiled to YAML.
    Byml,
    /// Audio bank archive, extracted to a directory.
    Bars,
    /// Event flow script, converted to JSON.
    Evfl,
    /// Model/material resource archive, extracted to a directory.
    Bfres,
    /// Havok physics container, converted to JSON.
    Havok,
    /// Message/text table, exported to YAML.
    Msbt,
}

impl LeafFormat {
    pub const ALL: [LeafFormat; 7] = [
        LeafFormat::Aamp,
        LeafFormat::Byml,
        LeafFormat::Bars,
        LeafFormat::Evfl,
        LeafFormat::Bfres,
        LeafFormat::Havok,
        LeafFormat::Msbt,
    ];

    /// Short tag used in warnings, mirroring the format's canonical name.
    pub fn tag(&self) -> &'static str {
        match self {
            LeafFormat::Aamp => "AAMP",
            LeafFormat::Byml => "BYML",
            LeafFormat::Bars => "BARS",
            LeafFormat::Evfl => "EVFL",
            LeafFormat::Bfres => "BFRES",
            LeafFormat::Havok => "HAVOK",
            LeafFormat::Msbt => "MSBT",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LeafFormat::Aamp => AAMP_EXTENSIONS,
            LeafFormat::Byml => BYML_EXTENSIONS,
            LeafFormat::Bars => BARS_EXTENSIONS,
            LeafFormat::Evfl => EVFL_EXTENSIONS,
            LeafFormat::Bfres => BFRES_EXTENSIONS,
            LeafFormat::Havok => HAVOK_EXTENSIONS,
            LeafFormat::Msbt => MSBT_EXTENSIONS,
        }
    }
}

/// Extensions the games use for SARC containers, compressed variants
/// included (the `s` prefix marks a Yaz0-wrapped archive).
pub const CONTAINER_EXTENSIONS: &[&str] = &[
    "sarc",
    "pack",
    "bactorpack",
    "bmodelsh",
    "beventpack",
    "stera",
    "stats",
    "ssarc",
    "spack",
    "sbactorpack",
    "sbmodelsh",
    "sbeventpack",
    "sstera",
    "sstats",
    "blarc",
    "sblarc",
    "genvb",
    "sgenvb",
];

const AAMP_EXTENSIONS: &[&str] = &[
    "bxml",
    "baiprog",
    "baslist",
    "batcl",
    "bchemical",
    "bdmgparam",
    "bdrop",
    "bgparamlist",
    "bphysics",
    "brecipe",
    "bshop",
    "bas",
    "bassetting",
    "bawareness",
    "blifecondition",
    "blod",
    "bmodellist",
    "brgconfiglist",
    "bumii",
];

const BYML_EXTENSIONS: &[&str] = &[
    "byml",
    "sbyml",
    "bgyml",
    "byaml",
    "bgdata",
    "bgsvdata",
    "baischedule",
    "baniminfo",
    "mubin",
    "smubin",
];

const BARS_EXTENSIONS: &[&str] = &["bars"];
const EVFL_EXTENSIONS: &[&str] = &["bfevfl"];
const BFRES_EXTENSIONS: &[&str] = &["bfres", "sbfres"];
const HAVOK_EXTENSIONS: &[&str] = &["hkcl", "hkrb", "hksc", "hktmrb", "hknm2"];
const MSBT_EXTENSIONS: &[&str] = &["msbt"];

/// Classify a file extension (without leading dot). Deterministic, pure,
/// exactly one branch taken; anything unmatched is PassThrough.
pub fn classify(extension: &str) -> FormatKind {
    let ext = extension.to_ascii_lowercase();
    if CONTAINER_EXTENSIONS.contains(&ext.as_str()) {
        return FormatKind::Container;
    }
    for format in LeafFormat::ALL {
        if format.extensions().contains(&ext.as_str()) {
            return FormatKind::Leaf(format);
        }
    }
    FormatKind::PassThrough
}

/// Classify from a full path. No extension means PassThrough.
pub fn classify_path(path: &Path) -> FormatKind {
    path.extension()
        .and_then(OsStr::to_str)
        .map(classify)
        .unwrap_or(FormatKind::PassThrough)
}
