//! Error types for host execution.

use snafu::Snafu;

use crate::memory::BufferId;

/// Result type for runtime operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Program has no kernel of that name.
    #[snafu(display("kernel '{name}' not found in program"))]
    UnknownKernel { name: String },

    #[snafu(display("kernel '{kernel}' takes {expected} arguments, got {actual}"))]
    ArgumentCount { kernel: String, expected: usize, actual: usize },

    /// Work sizes are inconsistent with each other or with the kernel attributes.
    #[snafu(display("invalid launch range: {reason}"))]
    InvalidRange { reason: String },

    #[snafu(display("variable '{name}' used before its declaration"))]
    UnknownVariable { name: String },

    /// Call to a function that is neither a builtin nor registered with the interpreter.
    #[snafu(display("function '{name}' is not registered"))]
    UnknownFunction { name: String },

    #[snafu(display("builtin '{name}' is not supported by the host interpreter"))]
    UnsupportedBuiltin { name: &'static str },

    #[snafu(display("cannot evaluate expression: {reason}"))]
    UnsupportedExpression { reason: String },

    /// Operand kinds do not fit the operation.
    #[snafu(display("type mismatch: {reason}"))]
    TypeMismatch { reason: String },

    #[snafu(display("integer division by zero"))]
    DivisionByZero,

    #[snafu(display("access to lane {index} of buffer {buffer} with {len} lanes"))]
    OutOfBounds { buffer: BufferId, index: isize, len: usize },

    /// Sub-group operation reads a lane that does not take part in it.
    #[snafu(display("sub-group operation reads inactive work-item {item}"))]
    InactiveLane { item: usize },

    /// Barrier reached while a work-item it synchronizes is on another path.
    #[snafu(display("{name} reached without work-item {item}"))]
    DivergentBarrier { name: &'static str, item: usize },

    /// Host buffers do not match the plan.
    #[snafu(display("invalid plan arguments: {reason}"))]
    PlanArguments { reason: String },

    #[snafu(display("FFT error: {source}"))]
    Fft { source: fftgen_fft::Error },
}
