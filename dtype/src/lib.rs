//! Type system of the emitted kernel language.
//!
//! # Module Organization
//!
//! - [`BuiltinType`]: scalar element kinds (`int`, `float`, `atomic_int`, ...)
//! - [`AddrSpace`]: OpenCL address spaces
//! - [`qualifier`]: type/function qualifier sets and enumerated builtin constants
//! - [`DataType`]: scalar, vector, pointer and array type nodes

pub mod qualifier;


use std::rc::Rc;

use enumset::EnumSet;

pub use qualifier::{
    Endianness, FunctionQualifier, MemFenceFlag, MemoryOrder, MemoryScope, TypeQualifier, qualifiers_to_string,
};

/// Address space of a value or of a pointer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddrSpace {
    /// No explicit address space; prints as nothing.
    #[default]
    #[strum(serialize = "")]
    Generic,
    /// Global/device memory.
    #[strum(serialize = "global")]
    Global,
    /// Work-group shared local memory.
    #[strum(serialize = "local")]
    Local,
    /// Read-only constant memory.
    #[strum(serialize = "constant")]
    Constant,
    /// Work-item private memory.
    #[strum(serialize = "private")]
    Private,
}

impl AddrSpace {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Builtin element kinds of the kernel language.
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray, strum::FromRepr, strum::IntoStaticStr)]
#[derive(enumset::EnumSetType)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[enumset(repr = "u64")]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinType {
    Bool = 0,
    Char = 1,
    Uchar = 2,
    Short = 3,
    Ushort = 4,
    Int = 5,
    Uint = 6,
    Long = 7,
    Ulong = 8,
    Float = 9,
    Double = 10,
    Half = 11,
    #[strum(serialize = "size_t")]
    SizeT = 12,
    #[strum(serialize = "ptrdiff_t")]
    PtrdiffT = 13,
    #[strum(serialize = "intptr_t")]
    IntptrT = 14,
    #[strum(serialize = "uintptr_t")]
    UintptrT = 15,
    Void = 16,
    #[strum(serialize = "cl_mem_fence_flags")]
    ClMemFenceFlags = 17,
    MemoryScope = 18,
    MemoryOrder = 19,
    AtomicFlag = 20,
    AtomicInt = 21,
    AtomicUint = 22,
    AtomicLong = 23,
    AtomicUlong = 24,
    AtomicFloat = 25,
    AtomicDouble = 26,
    #[strum(serialize = "atomic_intptr_t")]
    AtomicIntptrT = 27,
    #[strum(serialize = "atomic_uintptr_t")]
    AtomicUintptrT = 28,
    #[strum(serialize = "atomic_size_t")]
    AtomicSizeT = 29,
    #[strum(serialize = "atomic_ptrdiff_t")]
    AtomicPtrdiffT = 30,
    AtomicHalf = 31,
}

impl BuiltinType {
    /// Kernel-language spelling.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Size in bytes on the device, `None` for kinds without a fixed size.
    pub const fn bytes(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::Uchar => Some(1),
            Self::Short | Self::Ushort | Self::Half => Some(2),
            Self::Int | Self::Uint | Self::Float => Some(4),
            Self::Long | Self::Ulong | Self::Double => Some(8),
            Self::SizeT | Self::PtrdiffT | Self::IntptrT | Self::UintptrT => Some(8),
            _ => None,
        }
    }

    /// Only the plain arithmetic kinds have vector forms.
    pub const fn is_vectorizable(&self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::Uchar
                | Self::Short
                | Self::Ushort
                | Self::Int
                | Self::Uint
                | Self::Long
                | Self::Ulong
                | Self::Float
                | Self::Double
                | Self::Half
        )
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Char | Self::Short | Self::Int | Self::Long | Self::PtrdiffT | Self::IntptrT)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::Bool | Self::Uchar | Self::Ushort | Self::Uint | Self::Ulong | Self::SizeT | Self::UintptrT)
    }

    pub const fn is_int(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Half | Self::Float | Self::Double)
    }

    pub const fn is_atomic(&self) -> bool {
        (*self as u64) >= (Self::AtomicFlag as u64)
    }
}

/// Type node.
///
/// Pointee and element types are shared through `Rc`, so a type built once can be reused
/// by any number of declarations and casts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Single value of a builtin kind.
    Scalar { ty: BuiltinType, space: AddrSpace, qualifiers: EnumSet<TypeQualifier> },

    /// Short vector such as `float2`.
    Vector { ty: BuiltinType, width: u8, space: AddrSpace, qualifiers: EnumSet<TypeQualifier> },

    /// Pointer to another type; `space` and `qualifiers` apply to the pointer itself.
    Pointer { to: Rc<DataType>, space: AddrSpace, qualifiers: EnumSet<TypeQualifier> },

    /// Fixed-size array.
    Array { of: Rc<DataType>, size: usize },
}

impl DataType {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn scalar(ty: BuiltinType) -> Self {
        Self::Scalar { ty, space: AddrSpace::Generic, qualifiers: EnumSet::empty() }
    }

    pub fn vector(ty: BuiltinType, width: u8) -> Self {
        Self::Vector { ty, width, space: AddrSpace::Generic, qualifiers: EnumSet::empty() }
    }

    /// Scalar for `width == 1`, vector otherwise.
    pub fn with_width(ty: BuiltinType, width: u8, space: AddrSpace) -> Self {
        if width <= 1 {
            Self::Scalar { ty, space, qualifiers: EnumSet::empty() }
        } else {
            Self::Vector { ty, width, space, qualifiers: EnumSet::empty() }
        }
    }

    pub fn pointer_to(to: impl Into<Rc<DataType>>) -> Self {
        Self::Pointer { to: to.into(), space: AddrSpace::Generic, qualifiers: EnumSet::empty() }
    }

    pub fn pointer_in(to: impl Into<Rc<DataType>>, space: AddrSpace, qualifiers: EnumSet<TypeQualifier>) -> Self {
        Self::Pointer { to: to.into(), space, qualifiers }
    }

    pub fn array_of(of: impl Into<Rc<DataType>>, size: usize) -> Self {
        Self::Array { of: of.into(), size }
    }

    pub fn generic(ty: BuiltinType) -> Self {
        Self::scalar(ty)
    }

    pub fn global(ty: BuiltinType) -> Self {
        Self::scalar(ty).in_space(AddrSpace::Global)
    }

    pub fn local(ty: BuiltinType) -> Self {
        Self::scalar(ty).in_space(AddrSpace::Local)
    }

    pub fn constant(ty: BuiltinType) -> Self {
        Self::scalar(ty).in_space(AddrSpace::Constant)
    }

    pub fn private(ty: BuiltinType) -> Self {
        Self::scalar(ty).in_space(AddrSpace::Private)
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Same type placed in another address space. Arrays forward to their element type.
    pub fn in_space(self, new_space: AddrSpace) -> Self {
        match self {
            Self::Scalar { ty, qualifiers, .. } => Self::Scalar { ty, space: new_space, qualifiers },
            Self::Vector { ty, width, qualifiers, .. } => Self::Vector { ty, width, space: new_space, qualifiers },
            Self::Pointer { to, qualifiers, .. } => Self::Pointer { to, space: new_space, qualifiers },
            Self::Array { of, size } => Self::Array { of: Rc::new(of.as_ref().clone().in_space(new_space)), size },
        }
    }

    /// Same type with additional qualifiers. Arrays forward to their element type.
    pub fn qualified(self, extra: impl Into<EnumSet<TypeQualifier>>) -> Self {
        let extra = extra.into();
        match self {
            Self::Scalar { ty, space, qualifiers } => Self::Scalar { ty, space, qualifiers: qualifiers | extra },
            Self::Vector { ty, width, space, qualifiers } => {
                Self::Vector { ty, width, space, qualifiers: qualifiers | extra }
            }
            Self::Pointer { to, space, qualifiers } => Self::Pointer { to, space, qualifiers: qualifiers | extra },
            Self::Array { of, size } => Self::Array { of: Rc::new(of.as_ref().clone().qualified(extra)), size },
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Element kind; pointers and arrays report their innermost kind.
    pub fn builtin(&self) -> BuiltinType {
        match self {
            Self::Scalar { ty, .. } | Self::Vector { ty, .. } => *ty,
            Self::Pointer { to, .. } => to.builtin(),
            Self::Array { of, .. } => of.builtin(),
        }
    }

    /// Lane count of vectors, 1 for everything else.
    pub fn width(&self) -> usize {
        match self {
            Self::Vector { width, .. } => *width as usize,
            _ => 1,
        }
    }

    pub fn space(&self) -> AddrSpace {
        match self {
            Self::Scalar { space, .. } | Self::Vector { space, .. } | Self::Pointer { space, .. } => *space,
            Self::Array { of, .. } => of.space(),
        }
    }

    pub fn qualifiers(&self) -> EnumSet<TypeQualifier> {
        match self {
            Self::Scalar { qualifiers, .. } | Self::Vector { qualifiers, .. } | Self::Pointer { qualifiers, .. } => {
                *qualifiers
            }
            Self::Array { of, .. } => of.qualifiers(),
        }
    }

    /// Type reached by dereferencing or indexing, if any.
    pub fn pointee(&self) -> Option<&DataType> {
        match self {
            Self::Pointer { to, .. } => Some(to),
            Self::Array { of, .. } => Some(of),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Storage size in bytes. Three-lane vectors occupy four lanes.
    pub fn size_in_bytes(&self) -> Option<usize> {
        match self {
            Self::Scalar { ty, .. } => ty.bytes(),
            Self::Vector { ty, width, .. } => {
                let lanes = if *width == 3 { 4 } else { *width as usize };
                ty.bytes().map(|b| b * lanes)
            }
            Self::Pointer { .. } => Some(8),
            Self::Array { of, size } => of.size_in_bytes().map(|b| b * size),
        }
    }
}

impl From<BuiltinType> for DataType {
    fn from(ty: BuiltinType) -> Self {
        Self::scalar(ty)
    }
}
