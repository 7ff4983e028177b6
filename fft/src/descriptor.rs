//! Parser for the compact FFT descriptor, e.g. `srfi5` or `dcbo16.64x64*3`.

use fftgen_device::{Cursor, ParseError};
use smallvec::SmallVec;
use snafu::ResultExt;

use crate::configuration::{
    Configuration, Direction, MAX_FFT_DIM, MAX_TENSOR_DIM, Shape, TransformKind, default_istride, default_ostride,
};
use crate::error::{MalformedDescriptorSnafu, Result};
use crate::precision::Precision;

/// Parses `<s|d><c|r><f|b><i|o>[M.]N[xN2[xN3]][*K][i<strides>][o<strides>]`.
///
/// `r` combined with `b` yields a c2r transform. Strides not given explicitly are the packed
/// defaults for the requested placement.
pub fn parse_fft_descriptor(desc: &str) -> Result<Configuration> {
    parse(desc).context(MalformedDescriptorSnafu)
}

fn letter<T>(cursor: &mut Cursor<'_>, choices: &[(char, T)], expected: &str) -> Result<T, ParseError>
where
    T: Copy,
{
    let found = cursor.peek().and_then(|c| choices.iter().find(|(l, _)| *l == c));
    match found {
        Some((_, value)) => {
            cursor.bump();
            Ok(*value)
        }
        None => Err(cursor.error(format!("expected {expected}"))),
    }
}

fn parse(desc: &str) -> Result<Configuration, ParseError> {
    let mut cursor = Cursor::new(desc);

    let precision = letter(
        &mut cursor,
        &[('s', Precision::F32), ('d', Precision::F64)],
        "'s' (single) or 'd' (double)",
    )?;
    let real = letter(&mut cursor, &[('c', false), ('r', true)], "'c' (complex) or 'r' (real)")?;
    let direction = letter(
        &mut cursor,
        &[('f', Direction::Forward), ('b', Direction::Backward)],
        "'f' (forward) or 'b' (backward)",
    )?;
    let inplace = letter(&mut cursor, &[('i', true), ('o', false)], "'i' (in-place) or 'o' (out-of-place)")?;
    let kind = match (real, direction) {
        (false, _) => TransformKind::C2c,
        (true, Direction::Forward) => TransformKind::R2c,
        (true, Direction::Backward) => TransformKind::C2r,
    };

    // [M.]N[xN2[xN3]][*K]
    let mut extents = SmallVec::<[usize; MAX_TENSOR_DIM]>::new();
    let mut ops = SmallVec::<[char; MAX_TENSOR_DIM]>::new();
    extents.push(cursor.number()?);
    while let Some(op @ ('.' | 'x' | '*')) = cursor.peek() {
        if extents.len() >= MAX_TENSOR_DIM {
            return Err(cursor
                .error_without_position(format!("tensor dimension must not be larger than {MAX_TENSOR_DIM}")));
        }
        cursor.bump();
        ops.push(op);
        extents.push(cursor.number()?);
    }

    let has_m = ops.first() == Some(&'.');
    let has_k = ops.last() == Some(&'*');
    let inner = &ops[usize::from(has_m)..ops.len() - usize::from(has_k)];
    if inner.iter().any(|&op| op != 'x') {
        return Err(cursor.error_without_position(
            "'.' or '*' must only appear at the beginning or end of the tensor shape, respectively",
        ));
    }
    let dim = 1 + inner.len();
    if dim > MAX_FFT_DIM {
        return Err(cursor.error_without_position(format!("only {} 'x' are supported", MAX_FFT_DIM - 1)));
    }
    if !has_k {
        extents.push(1);
    }
    if !has_m {
        extents.insert(0, 1);
    }
    let mut shape: Shape = [1; MAX_TENSOR_DIM];
    shape[..extents.len()].copy_from_slice(&extents);

    // i<strides> o<strides>
    let mut istride = None;
    let mut ostride = None;
    while let Some(c) = cursor.peek() {
        let target = match c {
            'i' => &mut istride,
            'o' => &mut ostride,
            _ => return Err(cursor.error("expected 'i' (istride) or 'o' (ostride)")),
        };
        cursor.bump();
        let mut stride: Shape = [0; MAX_TENSOR_DIM];
        for d in 0..dim + 2 {
            stride[d] = cursor.number()?;
            if d < dim + 1 {
                cursor.expect(',')?;
            }
        }
        *target = Some(stride);
    }

    Ok(Configuration {
        dim,
        shape,
        precision,
        direction,
        kind,
        istride: istride.unwrap_or_else(|| default_istride(dim, &shape, kind, inplace)),
        ostride: ostride.unwrap_or_else(|| default_ostride(dim, &shape, kind, inplace)),
        callbacks: None,
    })
}
