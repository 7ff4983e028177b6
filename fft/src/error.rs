use fftgen_device::ParseError;
use fftgen_ir::Extension;
use snafu::Snafu;

use crate::configuration::{Direction, TransformKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// FFT dimension outside `1..=3`.
    #[snafu(display("unsupported FFT dimension {dim} (expected 1, 2 or 3)"))]
    UnsupportedDimension { dim: usize },

    /// Shape entry is zero or the shape cannot be handled by any kernel family.
    #[snafu(display("invalid shape: {reason}"))]
    InvalidShape { reason: String },

    /// r2c must run forward and c2r backward.
    #[snafu(display("{kind} transforms cannot run in {direction} direction"))]
    DirectionMismatch { kind: TransformKind, direction: Direction },

    /// Callbacks are only wired into one-dimensional kernels.
    #[snafu(display("callbacks are not supported for {dim}-dimensional transforms"))]
    CallbacksUnsupported { dim: usize },

    /// Multi-dimensional plans only run in place.
    #[snafu(display("out-of-place multi-dimensional transforms are not supported"))]
    OutOfPlaceUnsupported,

    /// Real transform whose batch block is smaller than the batch cannot run in place.
    #[snafu(display("kernel '{identifier}' does not support in-place execution"))]
    InplaceUnsupported { identifier: String },

    /// Not even a single batch column fits into shared local memory.
    #[snafu(display("{required} bytes of local memory required, device offers {available}"))]
    InsufficientLocalMemory { required: usize, available: usize },

    /// Two-factor kernels need at least two factors.
    #[snafu(display("length {n} cannot be split into {factors:?} for a two-factor kernel"))]
    FactorizationTooShort { n: usize, factors: Vec<usize> },

    /// Descriptor text could not be parsed.
    #[snafu(display("{source}"))]
    MalformedDescriptor { source: ParseError },

    /// Emitted program needs an extension the device does not advertise.
    #[snafu(display("device lacks required extension {extension}"))]
    MissingExtension { extension: Extension },

    /// Generator produced inconsistent IR.
    #[snafu(display("IR error: {source}"))]
    Ir { source: fftgen_ir::Error },

    #[snafu(display("codegen error: {source}"))]
    Codegen { source: fftgen_codegen::Error },

    #[snafu(display("device error: {source}"))]
    Device { source: fftgen_device::Error },
}
