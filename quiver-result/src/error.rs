use std::fmt;

use arrow::datatypes::Field;
use thiserror::Error;

/// Unified error type for all Quiver operations.
///
/// Errors propagate upward through the call stack with the `?` operator. There
/// is no automatic retry anywhere in the engine: every `update`/`evaluate`
/// failure surfaces synchronously to the immediate caller.
///
/// `Error` implements `Send` and `Sync` so failures can cross thread
/// boundaries during parallel group-by execution.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error during columnar data operations.
    ///
    /// Raised when building output arrays or assembling record batches fails,
    /// typically a schema/array length mismatch.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An aggregate function was bound against a column type it does not
    /// support.
    ///
    /// This is the user-facing dispatch rejection: it names the function, the
    /// offending input field, and the argument index (always 0 for the unary
    /// aggregate family). Dispatch never silently coerces.
    #[error("function {function} does not allow the type of argument {arg}: {input}")]
    NotAllowedType {
        /// Name of the aggregate function that rejected the input.
        function: String,
        /// Rendering of the offending input field (name and data type).
        input: String,
        /// Index of the offending argument.
        arg: usize,
    },

    /// A vector's concrete encoding does not match the type an accumulation
    /// state was specialized for.
    ///
    /// This is a programmer/planner error, not recoverable user input: the
    /// planner handed an accumulator a column it was not built for. The
    /// message names the expected and the actual encoding.
    #[error("compute error: {0}")]
    Compute(String),

    /// An aggregate call failed while being applied to a group.
    ///
    /// Wraps the underlying failure; the group-by operation that was in
    /// flight is aborted, never partially completed. Both the sequential and
    /// the parallel apply path use this policy.
    #[error("task execution failed: {0}")]
    TaskExecution(String),

    /// A worker pool could not be created or handed out.
    #[error("worker pool unavailable: {0}")]
    PoolAcquire(String),

    /// Invalid user input or API parameter.
    ///
    /// Examples: an empty group-by column list, an out-of-range column index,
    /// a group-by key column of an unsupported type.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation. The message includes
    /// details about what invariant was violated.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a dispatch rejection for an unsupported (function, type) pair.
    ///
    /// The input field is rendered as `name (DataType)` so the failing schema
    /// is visible in the message.
    #[inline]
    pub fn not_allowed_type(function: impl Into<String>, input: &Field, arg: usize) -> Self {
        Error::NotAllowedType {
            function: function.into(),
            input: format!("{} ({})", input.name(), input.data_type()),
            arg,
        }
    }

    /// Create a compute error from any displayable error.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiver_result::Error;
    ///
    /// let err = Error::compute("input vector is not Int64, but Float64");
    /// assert!(matches!(err, Error::Compute(msg) if msg.contains("Int64")));
    /// ```
    #[inline]
    pub fn compute<E: fmt::Display>(err: E) -> Self {
        Error::Compute(err.to_string())
    }

    /// Create a task execution error from any displayable error.
    #[inline]
    pub fn task_execution<E: fmt::Display>(err: E) -> Self {
        Error::TaskExecution(err.to_string())
    }
}
