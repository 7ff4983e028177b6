use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Misuse of the IR detected while building or walking a tree.
///
/// These indicate a bug in the code that assembles kernels, not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The same variable object was declared twice in the active scope stack.
    #[snafu(display("variable '{name}' is already declared in an enclosing scope"))]
    VariableRedeclared { name: String },

    /// A declaration was visited outside of any scope.
    #[snafu(display("declaration of '{name}' outside of any scope"))]
    MissingScope { name: String },

    /// Builtin called with an unsupported number of arguments.
    #[snafu(display("{function} expects between {min} and {max} arguments, got {got}"))]
    ArityMismatch { function: &'static str, min: usize, max: usize, got: usize },

    /// Vector initializer without elements.
    #[snafu(display("vector initializer needs at least one element"))]
    EmptyVectorInit,
}
