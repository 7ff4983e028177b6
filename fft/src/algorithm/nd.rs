//! Multi-dimensional transforms as a sequence of 1-D stages.
//!
//! Stage `d` transforms mode `d + 1` and folds all previously transformed modes into `M` and
//! all later modes into `K`. Only the first mode of a real transform is real; every later stage
//! is c2c on the half-spectrum. c2r runs the stages in reverse so that the real stage is last.

use smallvec::SmallVec;

use crate::configuration::{Configuration, MAX_FFT_DIM, MAX_TENSOR_DIM, TransformKind};
use crate::error::{CallbacksUnsupportedSnafu, Result, UnsupportedDimensionSnafu};

pub type Stages = SmallVec<[Configuration; MAX_FFT_DIM]>;

/// 1-D configurations in execution order.
///
/// Multi-dimensional stages always work in place on one buffer; their strides describe the
/// packed in-place layout regardless of the strides in `cfg`.
pub fn plan_stages(cfg: &Configuration) -> Result<Stages> {
    let dim = cfg.dim;
    snafu::ensure!((1..=MAX_FFT_DIM).contains(&dim), UnsupportedDimensionSnafu { dim });
    if dim == 1 {
        return Ok(SmallVec::from_iter([cfg.clone()]));
    }
    snafu::ensure!(!cfg.has_callbacks(), CallbacksUnsupportedSnafu { dim });

    let real = cfg.kind.is_real();
    let nd = |d: usize| cfg.shape[d + 1];
    let nd_complex = |d: usize| if d == 0 && real { nd(0) / 2 + 1 } else { nd(d) };
    let nd_real = |d: usize| if d == 0 && real { 2 * (nd(0) / 2 + 1) } else { nd(d) };

    let mut m = cfg.m();
    let mut k = (0..dim).map(nd_complex).product::<usize>() * cfg.k();
    let mut stages = Stages::new();
    for d in 0..dim {
        k /= nd_complex(d);
        let mut shape = [1; MAX_TENSOR_DIM];
        shape[..3].copy_from_slice(&[m, nd(d), k]);
        let mut istride = [0; MAX_TENSOR_DIM];
        istride[..3].copy_from_slice(&[1, m, m * nd_real(d)]);
        let mut ostride = [0; MAX_TENSOR_DIM];
        ostride[..3].copy_from_slice(&[1, m, m * nd_complex(d)]);
        stages.push(Configuration {
            dim: 1,
            shape,
            precision: cfg.precision,
            direction: cfg.direction,
            kind: if d == 0 { cfg.kind } else { TransformKind::C2c },
            istride,
            ostride,
            callbacks: None,
        });
        m *= nd_complex(d);
    }

    if cfg.kind == TransformKind::C2r {
        stages.reverse();
        for stage in &mut stages {
            std::mem::swap(&mut stage.istride, &mut stage.ostride);
        }
    }
    Ok(stages)
}
