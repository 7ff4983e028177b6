//! Qualifier sets and enumerated builtin constants.

use enumset::EnumSet;
use itertools::Itertools;

/// Qualifier applied to a type (`const`, `restrict`, `volatile`).
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[derive(enumset::EnumSetType)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[enumset(repr = "u8")]
#[strum(serialize_all = "lowercase")]
pub enum TypeQualifier {
    Const,
    Restrict,
    Volatile,
}

/// Qualifier applied to a function prototype.
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[derive(enumset::EnumSetType)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[enumset(repr = "u8")]
#[strum(serialize_all = "lowercase")]
pub enum FunctionQualifier {
    Extern,
    Inline,
    Kernel,
}

/// Space-separated spelling of a qualifier set in declaration order; empty sets give "".
pub fn qualifiers_to_string<T>(set: EnumSet<T>) -> String
where
    T: enumset::EnumSetType + Into<&'static str>,
{
    set.iter().map(Into::<&'static str>::into).join(" ")
}

/// Memory-fence flag passed to barriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemFenceFlag {
    #[strum(serialize = "CLK_GLOBAL_MEM_FENCE")]
    Global,
    #[strum(serialize = "CLK_LOCAL_MEM_FENCE")]
    Local,
    #[strum(serialize = "CLK_IMAGE_MEM_FENCE")]
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryScope {
    #[strum(serialize = "memory_scope_work_item")]
    WorkItem,
    #[strum(serialize = "memory_scope_sub_group")]
    SubGroup,
    #[strum(serialize = "memory_scope_work_group")]
    WorkGroup,
    #[strum(serialize = "memory_scope_device")]
    Device,
    #[strum(serialize = "memory_scope_all_svm_devices")]
    AllSvmDevices,
    #[strum(serialize = "memory_scope_all_devices")]
    AllDevices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryOrder {
    #[strum(serialize = "memory_order_relaxed")]
    Relaxed,
    #[strum(serialize = "memory_order_acquire")]
    Acquire,
    #[strum(serialize = "memory_order_release")]
    Release,
    #[strum(serialize = "memory_order_acq_rel")]
    AcqRel,
    #[strum(serialize = "memory_order_seq_cst")]
    SeqCst,
}

/// Argument of the `endian` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Endianness {
    Device,
    Host,
}

macro_rules! impl_as_str {
    ($($ty:ty),* $(,)?) => {
        $(impl $ty {
            pub fn as_str(&self) -> &'static str {
                self.into()
            }
        })*
    };
}

impl_as_str!(TypeQualifier, FunctionQualifier, MemFenceFlag, MemoryScope, MemoryOrder, Endianness);
