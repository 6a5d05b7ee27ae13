//! Columnar scalar, key, and vector utilities shared across the Quiver
//! aggregation engine.
//!
//! The engine operates on a closed set of primitive column encodings
//! ([`LogicalType`]): bool, int32, int64, float32, float64, and
//! variable-length binary. This crate provides:
//!
//! - [`ScalarValue`]: an owned scalar with *structural* hash/equality
//!   (floats compare by bit pattern, binaries by byte content), suitable as
//!   a hash-map key.
//! - [`GroupKey`]: the projected group-by column values for one row. Unlike
//!   join keys, NULL cells compare equal to each other so that all NULL-keyed
//!   rows land in one group.
//! - [`DistinctValueSet`]: content-based membership tracking for
//!   distinct-wrapped aggregations.
//! - [`ScalarColumnBuilder`]: a type-dispatched Arrow builder that accepts
//!   [`ScalarValue`] slots, used to materialize aggregate outputs and group
//!   key columns.
//! - [`take_rows`]: row-subset extraction over an Arrow array.
#![forbid(unsafe_code)]

pub mod gather;
pub mod group_key;
pub mod logical;
pub mod scalar;
pub mod value_set;

pub use gather::take_rows;
pub use group_key::GroupKey;
pub use logical::LogicalType;
pub use scalar::{ScalarColumnBuilder, ScalarValue};
pub use value_set::DistinctValueSet;
