//! Group-by driver for the Quiver aggregation engine.
//!
//! The driver partitions batch rows into groups by a fixed list of key
//! columns, applies each configured aggregate call to every group, and
//! assembles one output row per group: the group's key cells followed by one
//! column per aggregate call.
//!
//! Both the build phase (row bucketing) and the apply phase (per-group
//! aggregate updates) run sequentially below configurable row/group-count
//! thresholds and in parallel above them. Parallel work executes inside a
//! worker pool checked out from a bounded queue of pre-created pools
//! ([`PoolQueue`]); checkout blocks until a pool is free and an RAII guard
//! returns the pool on every exit path, including unwinds.
//!
//! Failures while transforming a group always propagate and abort the whole
//! operation, on the sequential and the parallel path alike.
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod pool;

pub use config::GroupByConfig;
pub use driver::GroupByDriver;
pub use pool::{PoolGuard, PoolQueue};
