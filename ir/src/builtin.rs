//! Closed set of builtin functions with arity and owning extension.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{ArityMismatchSnafu, Result};
use crate::{Expr, ExprNode};

/// Extension a builtin function belongs to.
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[derive(enumset::EnumSetType, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[enumset(repr = "u8")]
pub enum Extension {
    /// Always available.
    #[display("builtin")]
    #[strum(serialize = "builtin")]
    Builtin,
    #[display("cl_intel_subgroups")]
    #[strum(serialize = "cl_intel_subgroups")]
    ClIntelSubgroups,
    #[display("cl_intel_subgroups_long")]
    #[strum(serialize = "cl_intel_subgroups_long")]
    ClIntelSubgroupsLong,
    #[display("cl_intel_subgroups_short")]
    #[strum(serialize = "cl_intel_subgroups_short")]
    ClIntelSubgroupsShort,
}

impl Extension {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

macro_rules! builtin_functions {
    ($($(#[$meta:meta])* $variant:ident = $name:literal, $min:expr, $max:expr, $ext:ident;)*) => {
        /// Builtin function callable from emitted kernels.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum BuiltinFunction {
            $($(#[$meta])* $variant,)*
        }

        impl BuiltinFunction {
            /// Name as spelled in kernel source.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Minimum and maximum number of arguments.
            pub const fn arity(&self) -> (usize, usize) {
                match self {
                    $(Self::$variant => ($min, $max),)*
                }
            }

            pub const fn extension(&self) -> Extension {
                match self {
                    $(Self::$variant => Extension::$ext,)*
                }
            }
        }
    };
}

builtin_functions! {
    // Core OpenCL C builtins
    GetWorkDim = "get_work_dim", 0, 0, Builtin;
    GetGlobalSize = "get_global_size", 1, 1, Builtin;
    GetGlobalId = "get_global_id", 1, 1, Builtin;
    GetLocalSize = "get_local_size", 1, 1, Builtin;
    GetEnqueuedLocalSize = "get_enqueued_local_size", 1, 1, Builtin;
    GetLocalId = "get_local_id", 1, 1, Builtin;
    GetNumGroups = "get_num_groups", 1, 1, Builtin;
    GetGroupId = "get_group_id", 1, 1, Builtin;
    GetGlobalOffset = "get_global_offset", 1, 1, Builtin;
    GetGlobalLinearId = "get_global_linear_id", 0, 0, Builtin;
    GetLocalLinearId = "get_local_linear_id", 0, 0, Builtin;
    GetSubGroupSize = "get_sub_group_size", 0, 0, Builtin;
    GetMaxSubGroupSize = "get_max_sub_group_size", 0, 0, Builtin;
    GetNumSubGroups = "get_num_sub_groups", 0, 0, Builtin;
    GetEnqueuedNumSubGroups = "get_enqueued_num_sub_groups", 0, 0, Builtin;
    GetSubGroupId = "get_sub_group_id", 0, 0, Builtin;
    GetSubGroupLocalId = "get_sub_group_local_id", 0, 0, Builtin;
    Acos = "acos", 1, 1, Builtin;
    Acosh = "acosh", 1, 1, Builtin;
    Acospi = "acospi", 1, 1, Builtin;
    Asin = "asin", 1, 1, Builtin;
    Asinh = "asinh", 1, 1, Builtin;
    Asinpi = "asinpi", 1, 1, Builtin;
    Atan = "atan", 1, 1, Builtin;
    Atan2 = "atan2", 2, 2, Builtin;
    Atanh = "atanh", 1, 1, Builtin;
    Atanpi = "atanpi", 1, 1, Builtin;
    Atan2pi = "atan2pi", 2, 2, Builtin;
    Cbrt = "cbrt", 1, 1, Builtin;
    Ceil = "ceil", 1, 1, Builtin;
    Copysign = "copysign", 2, 2, Builtin;
    Cos = "cos", 1, 1, Builtin;
    Cosh = "cosh", 1, 1, Builtin;
    Cospi = "cospi", 1, 1, Builtin;
    Erfc = "erfc", 1, 1, Builtin;
    Erf = "erf", 1, 1, Builtin;
    Exp = "exp", 1, 1, Builtin;
    Exp2 = "exp2", 1, 1, Builtin;
    Exp10 = "exp10", 1, 1, Builtin;
    Expm1 = "expm1", 1, 1, Builtin;
    Fabs = "fabs", 1, 1, Builtin;
    Fdim = "fdim", 2, 2, Builtin;
    Floor = "floor", 1, 1, Builtin;
    Fma = "fma", 3, 3, Builtin;
    Fmax = "fmax", 2, 2, Builtin;
    Fmin = "fmin", 2, 2, Builtin;
    Fmod = "fmod", 2, 2, Builtin;
    Trunc = "trunc", 1, 1, Builtin;
    Fract = "fract", 2, 2, Builtin;
    Frexp = "frexp", 2, 2, Builtin;
    Hypot = "hypot", 2, 2, Builtin;
    Ilogb = "ilogb", 1, 1, Builtin;
    Ldexp = "ldexp", 2, 2, Builtin;
    Lgamma = "lgamma", 1, 1, Builtin;
    LgammaR = "lgamma_r", 2, 2, Builtin;
    Log = "log", 1, 1, Builtin;
    Log2 = "log2", 1, 1, Builtin;
    Log10 = "log10", 1, 1, Builtin;
    Log1p = "log1p", 1, 1, Builtin;
    Logb = "logb", 1, 1, Builtin;
    Mad = "mad", 3, 3, Builtin;
    Maxmag = "maxmag", 2, 2, Builtin;
    Minmag = "minmag", 2, 2, Builtin;
    Modf = "modf", 2, 2, Builtin;
    Nan = "nan", 1, 1, Builtin;
    Nextafter = "nextafter", 2, 2, Builtin;
    Pow = "pow", 2, 2, Builtin;
    Pown = "pown", 2, 2, Builtin;
    Powr = "powr", 2, 2, Builtin;
    Remainder = "remainder", 2, 2, Builtin;
    Remquo = "remquo", 3, 3, Builtin;
    Rint = "rint", 1, 1, Builtin;
    Rootn = "rootn", 2, 2, Builtin;
    Round = "round", 1, 1, Builtin;
    Rsqrt = "rsqrt", 1, 1, Builtin;
    Sin = "sin", 1, 1, Builtin;
    Sincos = "sincos", 2, 2, Builtin;
    Sinh = "sinh", 1, 1, Builtin;
    Sinpi = "sinpi", 1, 1, Builtin;
    Sqrt = "sqrt", 1, 1, Builtin;
    Tan = "tan", 1, 1, Builtin;
    Tanh = "tanh", 1, 1, Builtin;
    Tanpi = "tanpi", 1, 1, Builtin;
    Tgamma = "tgamma", 1, 1, Builtin;
    HalfCos = "half_cos", 1, 1, Builtin;
    HalfDivide = "half_divide", 2, 2, Builtin;
    HalfExp = "half_exp", 1, 1, Builtin;
    HalfExp2 = "half_exp2", 1, 1, Builtin;
    HalfExp10 = "half_exp10", 1, 1, Builtin;
    HalfLog = "half_log", 1, 1, Builtin;
    HalfLog2 = "half_log2", 1, 1, Builtin;
    HalfLog10 = "half_log10", 1, 1, Builtin;
    HalfPowr = "half_powr", 2, 2, Builtin;
    HalfRecip = "half_recip", 1, 1, Builtin;
    HalfRsqrt = "half_rsqrt", 1, 1, Builtin;
    HalfSin = "half_sin", 1, 1, Builtin;
    HalfSqrt = "half_sqrt", 1, 1, Builtin;
    HalfTan = "half_tan", 1, 1, Builtin;
    NativeCos = "native_cos", 1, 1, Builtin;
    NativeDivide = "native_divide", 2, 2, Builtin;
    NativeExp = "native_exp", 1, 1, Builtin;
    NativeExp2 = "native_exp2", 1, 1, Builtin;
    NativeExp10 = "native_exp10", 1, 1, Builtin;
    NativeLog = "native_log", 1, 1, Builtin;
    NativeLog2 = "native_log2", 1, 1, Builtin;
    NativeLog10 = "native_log10", 1, 1, Builtin;
    NativePowr = "native_powr", 2, 2, Builtin;
    NativeRecip = "native_recip", 1, 1, Builtin;
    NativeRsqrt = "native_rsqrt", 1, 1, Builtin;
    NativeSin = "native_sin", 1, 1, Builtin;
    NativeSqrt = "native_sqrt", 1, 1, Builtin;
    NativeTan = "native_tan", 1, 1, Builtin;
    Abs = "abs", 1, 1, Builtin;
    AbsDiff = "abs_diff", 2, 2, Builtin;
    AddSat = "add_sat", 2, 2, Builtin;
    Hadd = "hadd", 2, 2, Builtin;
    Rhadd = "rhadd", 2, 2, Builtin;
    Clamp = "clamp", 3, 3, Builtin;
    Min = "min", 2, 2, Builtin;
    Clz = "clz", 1, 1, Builtin;
    Ctz = "ctz", 1, 1, Builtin;
    MadHi = "mad_hi", 3, 3, Builtin;
    MulHi = "mul_hi", 2, 2, Builtin;
    MadSat = "mad_sat", 3, 3, Builtin;
    Max = "max", 2, 2, Builtin;
    Rotate = "rotate", 2, 2, Builtin;
    SubSat = "sub_sat", 2, 2, Builtin;
    Upsample = "upsample", 2, 2, Builtin;
    Popcount = "popcount", 1, 1, Builtin;
    Mad24 = "mad24", 3, 3, Builtin;
    Mul24 = "mul24", 2, 2, Builtin;
    Degrees = "degrees", 1, 1, Builtin;
    Mix = "mix", 3, 3, Builtin;
    Radians = "radians", 1, 1, Builtin;
    Step = "step", 2, 2, Builtin;
    Smoothstep = "smoothstep", 3, 3, Builtin;
    Sign = "sign", 1, 1, Builtin;
    Cross = "cross", 2, 2, Builtin;
    Dot = "dot", 2, 2, Builtin;
    Distance = "distance", 2, 2, Builtin;
    Length = "length", 1, 1, Builtin;
    Normalize = "normalize", 1, 1, Builtin;
    FastDistance = "fast_distance", 2, 2, Builtin;
    FastLength = "fast_length", 1, 1, Builtin;
    FastNormalize = "fast_normalize", 1, 1, Builtin;
    Isequal = "isequal", 2, 2, Builtin;
    Isnotequal = "isnotequal", 2, 2, Builtin;
    Isgreater = "isgreater", 2, 2, Builtin;
    Isgreaterequal = "isgreaterequal", 2, 2, Builtin;
    Isless = "isless", 2, 2, Builtin;
    Islessequal = "islessequal", 2, 2, Builtin;
    Islessgreater = "islessgreater", 2, 2, Builtin;
    Isfinite = "isfinite", 1, 1, Builtin;
    Isinf = "isinf", 1, 1, Builtin;
    Isnan = "isnan", 1, 1, Builtin;
    Isnormal = "isnormal", 1, 1, Builtin;
    Isordered = "isordered", 2, 2, Builtin;
    Isunordered = "isunordered", 2, 2, Builtin;
    Signbit = "signbit", 1, 1, Builtin;
    Any = "any", 1, 1, Builtin;
    All = "all", 1, 1, Builtin;
    Bitselect = "bitselect", 3, 3, Builtin;
    Select = "select", 3, 3, Builtin;
    Vloadn = "vloadn", 2, 2, Builtin;
    Vstoren = "vstoren", 3, 3, Builtin;
    VloadHalf = "vload_half", 2, 2, Builtin;
    VloadHalfn = "vload_halfn", 2, 2, Builtin;
    VstoreHalf = "vstore_half", 3, 3, Builtin;
    VstoreHalfRte = "vstore_half_rte", 3, 3, Builtin;
    VstoreHalfRtz = "vstore_half_rtz", 3, 3, Builtin;
    VstoreHalfRtp = "vstore_half_rtp", 3, 3, Builtin;
    VstoreHalfRtn = "vstore_half_rtn", 3, 3, Builtin;
    VstoreHalfn = "vstore_halfn", 3, 3, Builtin;
    VstoreHalfnRte = "vstore_halfn_rte", 3, 3, Builtin;
    VstoreHalfnRtz = "vstore_halfn_rtz", 3, 3, Builtin;
    VstoreHalfnRtp = "vstore_halfn_rtp", 3, 3, Builtin;
    VstoreHalfnRtn = "vstore_halfn_rtn", 3, 3, Builtin;
    VloadaHalfn = "vloada_halfn", 2, 2, Builtin;
    VstoreaHalfn = "vstorea_halfn", 3, 3, Builtin;
    VstoreaHalfnRte = "vstorea_halfn_rte", 3, 3, Builtin;
    VstoreaHalfnRtz = "vstorea_halfn_rtz", 3, 3, Builtin;
    VstoreaHalfnRtp = "vstorea_halfn_rtp", 3, 3, Builtin;
    VstoreaHalfnRtn = "vstorea_halfn_rtn", 3, 3, Builtin;
    Barrier = "barrier", 1, 1, Builtin;
    WorkGroupBarrier = "work_group_barrier", 1, 2, Builtin;
    SubGroupBarrier = "sub_group_barrier", 1, 2, Builtin;
    ToGlobal = "to_global", 1, 1, Builtin;
    ToLocal = "to_local", 1, 1, Builtin;
    ToPrivate = "to_private", 1, 1, Builtin;
    GetFence = "get_fence", 1, 1, Builtin;
    AsyncWorkGroupCopy = "async_work_group_copy", 4, 4, Builtin;
    AsyncWorkGroupStridedCopy = "async_work_group_strided_copy", 5, 5, Builtin;
    WaitGroupEvents = "wait_group_events", 2, 2, Builtin;
    Prefetch = "prefetch", 2, 2, Builtin;
    VecStep = "vec_step", 1, 1, Builtin;
    Shuffle = "shuffle", 2, 2, Builtin;
    Shuffle2 = "shuffle2", 3, 3, Builtin;
    SubGroupAll = "sub_group_all", 1, 1, Builtin;
    SubGroupAny = "sub_group_any", 1, 1, Builtin;
    SubGroupBroadcast = "sub_group_broadcast", 2, 2, Builtin;
    SubGroupReduceAdd = "sub_group_reduce_add", 1, 1, Builtin;
    SubGroupReduceMin = "sub_group_reduce_min", 1, 1, Builtin;
    SubGroupReduceMax = "sub_group_reduce_max", 1, 1, Builtin;
    SubGroupScanExclusiveAdd = "sub_group_scan_exclusive_add", 1, 1, Builtin;
    SubGroupScanExclusiveMin = "sub_group_scan_exclusive_min", 1, 1, Builtin;
    SubGroupScanExclusiveMax = "sub_group_scan_exclusive_max", 1, 1, Builtin;
    SubGroupScanInclusiveAdd = "sub_group_scan_inclusive_add", 1, 1, Builtin;
    SubGroupScanInclusiveMin = "sub_group_scan_inclusive_min", 1, 1, Builtin;
    SubGroupScanInclusiveMax = "sub_group_scan_inclusive_max", 1, 1, Builtin;
    AsChar = "as_char", 1, 1, Builtin;
    AsChar2 = "as_char2", 1, 1, Builtin;
    AsChar3 = "as_char3", 1, 1, Builtin;
    AsChar4 = "as_char4", 1, 1, Builtin;
    AsChar8 = "as_char8", 1, 1, Builtin;
    AsChar16 = "as_char16", 1, 1, Builtin;
    AsUchar = "as_uchar", 1, 1, Builtin;
    AsUchar2 = "as_uchar2", 1, 1, Builtin;
    AsUchar3 = "as_uchar3", 1, 1, Builtin;
    AsUchar4 = "as_uchar4", 1, 1, Builtin;
    AsUchar8 = "as_uchar8", 1, 1, Builtin;
    AsUchar16 = "as_uchar16", 1, 1, Builtin;
    AsShort = "as_short", 1, 1, Builtin;
    AsShort2 = "as_short2", 1, 1, Builtin;
    AsShort3 = "as_short3", 1, 1, Builtin;
    AsShort4 = "as_short4", 1, 1, Builtin;
    AsShort8 = "as_short8", 1, 1, Builtin;
    AsShort16 = "as_short16", 1, 1, Builtin;
    AsUshort = "as_ushort", 1, 1, Builtin;
    AsUshort2 = "as_ushort2", 1, 1, Builtin;
    AsUshort3 = "as_ushort3", 1, 1, Builtin;
    AsUshort4 = "as_ushort4", 1, 1, Builtin;
    AsUshort8 = "as_ushort8", 1, 1, Builtin;
    AsUshort16 = "as_ushort16", 1, 1, Builtin;
    AsInt = "as_int", 1, 1, Builtin;
    AsInt2 = "as_int2", 1, 1, Builtin;
    AsInt3 = "as_int3", 1, 1, Builtin;
    AsInt4 = "as_int4", 1, 1, Builtin;
    AsInt8 = "as_int8", 1, 1, Builtin;
    AsInt16 = "as_int16", 1, 1, Builtin;
    AsUint = "as_uint", 1, 1, Builtin;
    AsUint2 = "as_uint2", 1, 1, Builtin;
    AsUint3 = "as_uint3", 1, 1, Builtin;
    AsUint4 = "as_uint4", 1, 1, Builtin;
    AsUint8 = "as_uint8", 1, 1, Builtin;
    AsUint16 = "as_uint16", 1, 1, Builtin;
    AsLong = "as_long", 1, 1, Builtin;
    AsLong2 = "as_long2", 1, 1, Builtin;
    AsLong3 = "as_long3", 1, 1, Builtin;
    AsLong4 = "as_long4", 1, 1, Builtin;
    AsLong8 = "as_long8", 1, 1, Builtin;
    AsLong16 = "as_long16", 1, 1, Builtin;
    AsUlong = "as_ulong", 1, 1, Builtin;
    AsUlong2 = "as_ulong2", 1, 1, Builtin;
    AsUlong3 = "as_ulong3", 1, 1, Builtin;
    AsUlong4 = "as_ulong4", 1, 1, Builtin;
    AsUlong8 = "as_ulong8", 1, 1, Builtin;
    AsUlong16 = "as_ulong16", 1, 1, Builtin;
    AsFloat = "as_float", 1, 1, Builtin;
    AsFloat2 = "as_float2", 1, 1, Builtin;
    AsFloat3 = "as_float3", 1, 1, Builtin;
    AsFloat4 = "as_float4", 1, 1, Builtin;
    AsFloat8 = "as_float8", 1, 1, Builtin;
    AsFloat16 = "as_float16", 1, 1, Builtin;
    AsDouble = "as_double", 1, 1, Builtin;
    AsDouble2 = "as_double2", 1, 1, Builtin;
    AsDouble3 = "as_double3", 1, 1, Builtin;
    AsDouble4 = "as_double4", 1, 1, Builtin;
    AsDouble8 = "as_double8", 1, 1, Builtin;
    AsDouble16 = "as_double16", 1, 1, Builtin;
    Printf = "printf", 0, usize::MAX, Builtin;
    // cl_intel_subgroups
    IntelSubGroupShuffle = "intel_sub_group_shuffle", 2, 2, ClIntelSubgroups;
    IntelSubGroupShuffleDown = "intel_sub_group_shuffle_down", 3, 3, ClIntelSubgroups;
    IntelSubGroupShuffleUp = "intel_sub_group_shuffle_up", 3, 3, ClIntelSubgroups;
    IntelSubGroupShuffleXor = "intel_sub_group_shuffle_xor", 2, 2, ClIntelSubgroups;
    IntelSubGroupBlockRead = "intel_sub_group_block_read", 1, 2, ClIntelSubgroups;
    IntelSubGroupBlockRead2 = "intel_sub_group_block_read2", 1, 2, ClIntelSubgroups;
    IntelSubGroupBlockRead4 = "intel_sub_group_block_read4", 1, 2, ClIntelSubgroups;
    IntelSubGroupBlockRead8 = "intel_sub_group_block_read8", 1, 2, ClIntelSubgroups;
    IntelSubGroupBlockWrite = "intel_sub_group_block_write", 2, 3, ClIntelSubgroups;
    IntelSubGroupBlockWrite2 = "intel_sub_group_block_write2", 2, 3, ClIntelSubgroups;
    IntelSubGroupBlockWrite4 = "intel_sub_group_block_write4", 2, 3, ClIntelSubgroups;
    IntelSubGroupBlockWrite8 = "intel_sub_group_block_write8", 2, 3, ClIntelSubgroups;
    // cl_intel_subgroups_long
    IntelSubGroupBlockReadUl = "intel_sub_group_block_read_ul", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUl2 = "intel_sub_group_block_read_ul2", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUl4 = "intel_sub_group_block_read_ul4", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUl8 = "intel_sub_group_block_read_ul8", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUl = "intel_sub_group_block_write_ul", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUl2 = "intel_sub_group_block_write_ul2", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUl4 = "intel_sub_group_block_write_ul4", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUl8 = "intel_sub_group_block_write_ul8", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUi = "intel_sub_group_block_read_ui", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUi2 = "intel_sub_group_block_read_ui2", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUi4 = "intel_sub_group_block_read_ui4", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockReadUi8 = "intel_sub_group_block_read_ui8", 1, 2, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUi = "intel_sub_group_block_write_ui", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUi2 = "intel_sub_group_block_write_ui2", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUi4 = "intel_sub_group_block_write_ui4", 2, 3, ClIntelSubgroupsLong;
    IntelSubGroupBlockWriteUi8 = "intel_sub_group_block_write_ui8", 2, 3, ClIntelSubgroupsLong;
    // cl_intel_subgroups_short
    IntelSubGroupBlockReadUs = "intel_sub_group_block_read_us", 1, 2, ClIntelSubgroupsShort;
    IntelSubGroupBlockReadUs2 = "intel_sub_group_block_read_us2", 1, 2, ClIntelSubgroupsShort;
    IntelSubGroupBlockReadUs4 = "intel_sub_group_block_read_us4", 1, 2, ClIntelSubgroupsShort;
    IntelSubGroupBlockReadUs8 = "intel_sub_group_block_read_us8", 1, 2, ClIntelSubgroupsShort;
    IntelSubGroupBlockReadUs16 = "intel_sub_group_block_read_us16", 1, 2, ClIntelSubgroupsShort;
    IntelSubGroupBlockWriteUs = "intel_sub_group_block_write_us", 2, 3, ClIntelSubgroupsShort;
    IntelSubGroupBlockWriteUs2 = "intel_sub_group_block_write_us2", 2, 3, ClIntelSubgroupsShort;
    IntelSubGroupBlockWriteUs4 = "intel_sub_group_block_write_us4", 2, 3, ClIntelSubgroupsShort;
    IntelSubGroupBlockWriteUs8 = "intel_sub_group_block_write_us8", 2, 3, ClIntelSubgroupsShort;
    IntelSubGroupBlockWriteUs16 = "intel_sub_group_block_write_us16", 2, 3, ClIntelSubgroupsShort;
}

impl BuiltinFunction {
    /// Call with an arity check.
    pub fn call(self, args: impl IntoIterator<Item = Expr>) -> Result<Expr> {
        let args: SmallVec<[Expr; 4]> = args.into_iter().collect();
        let (min, max) = self.arity();
        ensure!(
            (min..=max).contains(&args.len()),
            ArityMismatchSnafu { function: self.name(), min, max, got: args.len() }
        );
        Ok(Expr::new(ExprNode::CallBuiltin { function: self, args }))
    }

    /// Call with a fixed argument list; used by the typed helpers whose signatures already fix the arity.
    pub(crate) fn call_unchecked<const N: usize>(self, args: [Expr; N]) -> Expr {
        Expr::new(ExprNode::CallBuiltin { function: self, args: SmallVec::from_iter(args) })
    }
}
