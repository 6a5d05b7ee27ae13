//! Error types and result definitions for the Quiver aggregation engine.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all Quiver crates. All operations that could
//! fail return `Result<T>`, where the error variant carries enough context to
//! diagnose what went wrong.
//!
//! # Error Categories
//!
//! - **Dispatch rejections** ([`Error::NotAllowedType`]): an aggregate function
//!   was asked to bind against a column type it does not support.
//! - **Encoding mismatches** ([`Error::Compute`]): a vector's concrete encoding
//!   does not match the type an accumulation state was specialized for. These
//!   indicate planner bugs, not bad user input.
//! - **Group transform failures** ([`Error::TaskExecution`]): an aggregate call
//!   failed while being applied to a group; the whole group-by aborts.
//! - **Pool failures** ([`Error::PoolAcquire`]): a worker pool could not be
//!   created or handed out.
//! - **Data format errors** ([`Error::Arrow`]): Arrow array or batch
//!   construction issues.
//! - **User input errors** ([`Error::InvalidArgumentError`]) and
//!   **internal errors** ([`Error::Internal`]).

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
