//! Typed wrappers over builtin functions used by the kernel generators.
//!
//! Signatures fix the arity, so these skip the run-time arity check of [`BuiltinFunction::call`].

use fftgen_dtype::MemFenceFlag;

use crate::{Expr, ExprNode};
use crate::builtin::BuiltinFunction;

macro_rules! builtin_wrappers {
    ($($(#[$meta:meta])* $name:ident($($arg:ident),*) => $function:ident;)+) => {
        $(
            $(#[$meta])*
            pub fn $name($($arg: impl Into<Expr>),*) -> Expr {
                BuiltinFunction::$function.call_unchecked([$($arg.into()),*])
            }
        )+
    };
}

builtin_wrappers! {
    get_global_id(dim) => GetGlobalId;
    get_global_size(dim) => GetGlobalSize;
    get_local_id(dim) => GetLocalId;
    get_local_size(dim) => GetLocalSize;
    get_group_id(dim) => GetGroupId;
    get_num_groups(dim) => GetNumGroups;
    get_sub_group_size() => GetSubGroupSize;
    get_sub_group_id() => GetSubGroupId;
    get_sub_group_local_id() => GetSubGroupLocalId;

    sin(x) => Sin;
    cos(x) => Cos;
    sqrt(x) => Sqrt;
    fma(a, b, c) => Fma;
    mad(a, b, c) => Mad;
    min(a, b) => Min;
    max(a, b) => Max;
    /// `select(a, b, c)`: component-wise `c ? b : a`.
    select(a, b, c) => Select;

    intel_sub_group_shuffle(x, lane) => IntelSubGroupShuffle;
    intel_sub_group_shuffle_down(current, next, delta) => IntelSubGroupShuffleDown;
    intel_sub_group_shuffle_up(previous, current, delta) => IntelSubGroupShuffleUp;
    intel_sub_group_shuffle_xor(x, mask) => IntelSubGroupShuffleXor;
    intel_sub_group_block_read(p) => IntelSubGroupBlockRead;
    intel_sub_group_block_read_us(p) => IntelSubGroupBlockReadUs;
}

/// `barrier(flags)`
pub fn barrier(flags: MemFenceFlag) -> Expr {
    BuiltinFunction::Barrier.call_unchecked([flags.into()])
}

/// `sub_group_barrier(flags)`
pub fn sub_group_barrier(flags: MemFenceFlag) -> Expr {
    BuiltinFunction::SubGroupBarrier.call_unchecked([flags.into()])
}

/// `printf(format, args...)`
pub fn printf(format: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    let args = std::iter::once(Expr::string(format)).chain(args).collect();
    Expr::new(ExprNode::CallBuiltin { function: BuiltinFunction::Printf, args })
}
