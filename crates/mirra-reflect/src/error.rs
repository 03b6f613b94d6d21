//! Error types for registry lookup, construction, and invocation.
//!
//! Two failure policies coexist: the generic-method lookup path reports an
//! absent result instead of an error (see [`crate::generic`]), while
//! construction and invocation failures propagate through these types.
//! Metadata errors are swallowed only inside the module-scan paths.

/// Argument-list access errors raised by [`crate::Args`] accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    /// The argument list has the wrong number of entries.
    #[error("expected {expected} arguments, got {got}")]
    Arity {
        /// How many arguments the callee requires.
        expected: usize,
        /// How many arguments were supplied.
        got: usize,
    },

    /// An argument is present but holds a different runtime type.
    #[error("argument {index} is not a `{expected}`")]
    Type {
        /// Position of the offending argument.
        index: usize,
        /// Name of the type the callee asked for.
        expected: &'static str,
    },
}

/// Metadata for a module could not be read.
///
/// Models dynamically loaded units that fail on type-metadata access.
/// Module scans swallow this error and treat the module as contributing
/// nothing; it surfaces only through [`crate::Module::types`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("metadata for module `{module}` is unreadable: {reason}")]
pub struct MetadataError {
    /// Name of the affected module.
    pub module: String,
    /// Loader-reported reason.
    pub reason: String,
}

/// Errors raised while constructing an instance.
///
/// These always propagate; there is no soft-failure fallback on any
/// construction path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConstructError {
    /// The supplied argument list does not match the constructor.
    #[error(transparent)]
    Arg(#[from] ArgError),

    /// No generic type is registered under the requested open-type handle.
    #[error("no generic type is registered for the requested base")]
    UnregisteredGeneric,

    /// The generic type exists but has no specialization for the requested
    /// type argument.
    #[error("`{name}` has no specialization for the requested type argument")]
    NoSpecialization {
        /// Name of the open generic type.
        name: String,
    },

    /// The constructed instance does not have the type the caller asked
    /// for.
    #[error("constructed instance does not have the requested type")]
    WrongInstanceType,

    /// The constructor itself failed.
    #[error("constructor failed: {0}")]
    Failed(String),
}

/// Errors raised while invoking a resolved generic method.
///
/// Lookup misses are not errors (the dispatcher reports an absent result);
/// these cover failures after a method was found.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvokeError {
    /// The supplied argument list does not match the method.
    #[error(transparent)]
    Arg(#[from] ArgError),

    /// An instance method was invoked without a receiver.
    #[error("method requires an instance receiver")]
    MissingReceiver,

    /// The receiver does not have the class the method is declared on.
    #[error("receiver does not have the expected type")]
    ReceiverMismatch,

    /// The method body itself failed.
    #[error("invocation failed: {0}")]
    Failed(String),
}
