//! Quiver: a vectorized aggregation engine over Apache Arrow columns.
//!
//! This crate is the primary entrypoint for the Quiver engine. It re-exports
//! the aggregation surface from the underlying `quiver-*` crates, providing
//! a unified API for consumers.
//!
//! # Quick Start
//!
//! Group a batch by one column and sum another per group:
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, RecordBatch};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use quiver::{AggregateCall, AggregateKind, GroupByDriver};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("region", DataType::Int64, false),
//!     Field::new("amount", DataType::Int64, true),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(Int64Array::from(vec![1, 2, 1])) as ArrayRef,
//!         Arc::new(Int64Array::from(vec![Some(10), Some(20), None])) as ArrayRef,
//!     ],
//! )
//! .unwrap();
//!
//! let driver = GroupByDriver::with_defaults().unwrap();
//! let calls = [AggregateCall::new(AggregateKind::Sum, 1)];
//! let result = driver.execute(&batch, &[0], &calls).unwrap();
//! assert_eq!(result.num_rows(), 2);
//! assert_eq!(result.schema().field(1).name(), "sum(amount)");
//! ```
//!
//! # Architecture
//!
//! Quiver is organized as a layered workspace:
//!
//! - **Results** (`quiver-result`): the unified error and result types.
//! - **Compute** (`quiver-compute`): scalar values, group keys, distinct
//!   sets, and row gathering over Arrow arrays.
//! - **Aggregation** (`quiver-aggregate`): accumulation states, unary
//!   accumulators, aggregate dispatch, and the distinct adapter.
//! - **Group-by** (`quiver-groupby`): the threshold-driven sequential or
//!   parallel group-by driver and its worker-pool queue.

// Re-export the driver as the primary user-facing API
pub use quiver_groupby::{GroupByConfig, GroupByDriver, PoolQueue};

// Re-export the aggregation surface for callers that aggregate whole
// columns without grouping
pub use quiver_aggregate::{
    AggregateCall, AggregateKind, AggregateState, BoundAggregate, BoundState, DistinctAccumulator,
    UnaryAccumulator,
};

// Re-export the shared column/scalar vocabulary
pub use quiver_compute::{GroupKey, LogicalType, ScalarValue};

// Re-export result types for error handling
pub use quiver_result::{Error, Result};
