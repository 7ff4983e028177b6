use snafu::Snafu;

use crate::parse::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Text form of a device description could not be parsed.
    #[snafu(display("{source}"))]
    MalformedDeviceInfo { source: ParseError },

    /// Rendering the program failed before it reached the compiler.
    #[snafu(display("codegen error: {source}"))]
    Codegen { source: fftgen_codegen::Error },

    /// Backend compiler rejected the source.
    #[snafu(display("compilation of '{identifier}' failed: {reason}"))]
    Compilation { identifier: String, reason: String },
}
