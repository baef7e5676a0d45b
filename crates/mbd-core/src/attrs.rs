//! Build-attribute parsing for MinGW-w64 asset file names.
//!
//! Asset names encode their build configuration as hyphen-delimited tokens,
//! e.g. `x86_64-13.0.0-release-posix-seh-ucrt-rt_v13-rev1.7z`. Each field is
//! parsed independently; a token that is absent leaves the field at
//! `Unknown`, never an error.

use std::fmt;
use std::str::FromStr;

/// Target architecture. Decided by name prefix only, never by a mid-string
/// token (`x86_64-...` names contain `i686`-free tails, but the reverse is
/// not guaranteed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    I686,
    X86_64,
    /// Not detected in the name.
    Unknown,
}

/// Thread model runtime (posix / win32 / mcf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadModel {
    Posix,
    Win32,
    Mcf,
    Unknown,
}

/// Exception handling model (SEH / DWARF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionModel {
    Seh,
    Dwarf,
    Unknown,
}

/// C runtime flavor (UCRT / MSVCRT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CRuntime {
    Ucrt,
    Msvcrt,
    Unknown,
}

/// MinGW-w64 runtime library version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeVersion {
    V13,
    Unknown,
}

/// The five-field classification derived once from an asset's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSet {
    pub arch: Arch,
    pub threads: ThreadModel,
    pub exceptions: ExceptionModel,
    pub crt: CRuntime,
    pub runtime: RuntimeVersion,
}

impl AttributeSet {
    /// An all-`Unknown` set (what unrelated file names parse to).
    pub const UNKNOWN: AttributeSet = AttributeSet {
        arch: Arch::Unknown,
        threads: ThreadModel::Unknown,
        exceptions: ExceptionModel::Unknown,
        crt: CRuntime::Unknown,
        runtime: RuntimeVersion::Unknown,
    };
}

fn has_token(name: &str, token: &str) -> bool {
    name.contains(token)
}

/// Parses an asset file name into its attribute set. Total: unmatched or
/// partially matching tokens leave the corresponding field at `Unknown`.
pub fn parse(name: &str) -> AttributeSet {
    let arch = if name.starts_with("i686-") {
        Arch::I686
    } else if name.starts_with("x86_64-") {
        Arch::X86_64
    } else {
        Arch::Unknown
    };

    let threads = if has_token(name, "-posix-") {
        ThreadModel::Posix
    } else if has_token(name, "-win32-") {
        ThreadModel::Win32
    } else if has_token(name, "-mcf-") {
        ThreadModel::Mcf
    } else {
        ThreadModel::Unknown
    };

    let exceptions = if has_token(name, "-seh-") {
        ExceptionModel::Seh
    } else if has_token(name, "-dwarf-") {
        ExceptionModel::Dwarf
    } else {
        ExceptionModel::Unknown
    };

    let crt = if has_token(name, "-ucrt-") {
        CRuntime::Ucrt
    } else if has_token(name, "-msvcrt-") {
        CRuntime::Msvcrt
    } else {
        CRuntime::Unknown
    };

    // The runtime tag appears either mid-name (`-rt_v13-`) or right before
    // the archive extension (`-rt_v13.7z`).
    let runtime = if has_token(name, "-rt_v13-") || has_token(name, "-rt_v13.") {
        RuntimeVersion::V13
    } else {
        RuntimeVersion::Unknown
    };

    AttributeSet {
        arch,
        threads,
        exceptions,
        crt,
        runtime,
    }
}

macro_rules! impl_str_conv {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $($ty::$variant => $text,)+
                    $ty::Unknown => "unknown",
                };
                f.write_str(s)
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    "unknown" => Ok($ty::Unknown),
                    other => Err(format!(
                        "unrecognized {}: {:?} (expected one of: {}, unknown)",
                        stringify!($ty),
                        other,
                        [$($text),+].join(", "),
                    )),
                }
            }
        }
    };
}

impl_str_conv!(Arch { I686 => "i686", X86_64 => "x86_64" });
impl_str_conv!(ThreadModel { Posix => "posix", Win32 => "win32", Mcf => "mcf" });
impl_str_conv!(ExceptionModel { Seh => "seh", Dwarf => "dwarf" });
impl_str_conv!(CRuntime { Ucrt => "ucrt", Msvcrt => "msvcrt" });
impl_str_conv!(RuntimeVersion { V13 => "rt_v13" });
