//! Analysis and rewrite passes over the IR.
//!
//! Each pass is a set of free functions with one `match` per node family. Expression passes are
//! pure and return new trees; statement passes mutate the owned statement tree in place.
//!
//! - [`equal`]: structural equality with identity-based variables
//! - [`simplify`]: algebraic identity elimination
//! - [`unique_names`]: scope-aware variable renaming
//! - [`extensions`]: required hardware extension discovery
//! - [`to_imm`]: literal extraction

pub mod equal;
pub mod extensions;
pub mod simplify;
pub mod to_imm;
pub mod unique_names;

pub use equal::is_equal;
pub use extensions::{get_required_extensions, required_extensions_in};
pub use simplify::{unsafe_simplify, unsafe_simplify_block, unsafe_simplify_program};
pub use to_imm::get_imm;
pub use unique_names::{make_names_unique, make_names_unique_in_block};
