//! Attributes attached to declarations, loops and prototypes.

use std::fmt;

use fftgen_dtype::Endianness;
use itertools::Itertools;

/// `__attribute__((...))` payloads understood by the kernel language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    WorkGroupSizeHint([u32; 3]),
    ReqdWorkGroupSize([u32; 3]),
    IntelReqdSubGroupSize(u32),
    OpenclUnrollHint(Option<u32>),
    Aligned(Option<u32>),
    Packed,
    Endian(Option<Endianness>),
}

impl Attribute {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WorkGroupSizeHint(_) => "work_group_size_hint",
            Self::ReqdWorkGroupSize(_) => "reqd_work_group_size",
            Self::IntelReqdSubGroupSize(_) => "intel_reqd_sub_group_size",
            Self::OpenclUnrollHint(_) => "opencl_unroll_hint",
            Self::Aligned(_) => "aligned",
            Self::Packed => "packed",
            Self::Endian(_) => "endian",
        }
    }
}

/// Prints the inner `name(args)` part; the printer adds the `__attribute__((..))` wrapper.
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            Self::WorkGroupSizeHint(size) | Self::ReqdWorkGroupSize(size) => {
                write!(f, "({})", size.iter().join(","))
            }
            Self::IntelReqdSubGroupSize(n) => write!(f, "({n})"),
            Self::OpenclUnrollHint(Some(n)) | Self::Aligned(Some(n)) => write!(f, "({n})"),
            Self::Endian(Some(e)) => write!(f, "({})", e.as_str()),
            Self::OpenclUnrollHint(None) | Self::Aligned(None) | Self::Endian(None) | Self::Packed => Ok(()),
        }
    }
}
