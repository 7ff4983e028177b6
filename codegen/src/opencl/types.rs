//! Type declarators.
//!
//! C declarators wrap the declared name: `float* (*p)[10]` has a part before the name and a part
//! after it. [`declarator`] returns both parts; the name (or nothing, for casts) goes in between.

use fftgen_dtype::{AddrSpace, DataType, qualifiers_to_string};

/// `(prefix, suffix)` around the declared name.
pub fn declarator(ty: &DataType) -> (String, String) {
    match ty {
        DataType::Scalar { ty, space, qualifiers } => {
            let mut out = leading(*space, &qualifiers_to_string(*qualifiers));
            out.push_str(ty.as_str());
            (out, String::new())
        }
        DataType::Vector { ty, width, space, qualifiers } => {
            let mut out = leading(*space, &qualifiers_to_string(*qualifiers));
            out.push_str(ty.as_str());
            out.push_str(&width.to_string());
            (out, String::new())
        }
        DataType::Pointer { to, space, qualifiers } => {
            let (mut out, mut suffix) = declarator(to);
            if to.is_array() {
                out.push('(');
                suffix.insert(0, ')');
            }
            out.push('*');
            if *space != AddrSpace::Generic {
                out.push_str(space.as_str());
            }
            if !qualifiers.is_empty() {
                out.push(' ');
                out.push_str(&qualifiers_to_string(*qualifiers));
            }
            (out, suffix)
        }
        DataType::Array { of, size } => {
            let (prefix, suffix) = declarator(of);
            (prefix, format!("[{size}]{suffix}"))
        }
    }
}

fn leading(space: AddrSpace, qualifiers: &str) -> String {
    let mut out = String::new();
    if space != AddrSpace::Generic {
        out.push_str(space.as_str());
        out.push(' ');
    }
    if !qualifiers.is_empty() {
        out.push_str(qualifiers);
        out.push(' ');
    }
    out
}
