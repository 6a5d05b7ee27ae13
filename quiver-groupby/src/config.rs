/// Tuning knobs for the group-by driver.
///
/// Execution is strictly sequential on the calling thread until an input
/// crosses one of the thresholds; parallelism is opt-in by size, never by
/// default.
#[derive(Clone, Copy, Debug)]
pub struct GroupByConfig {
    /// Row count above which the build phase buckets rows in parallel.
    pub parallel_rows_threshold: usize,
    /// Group count above which the apply phase updates groups in parallel.
    pub parallel_groups_threshold: usize,
    /// Number of pre-created worker pools in the bounded queue.
    pub pool_count: usize,
    /// Worker threads per pool.
    pub pool_size: usize,
}

impl Default for GroupByConfig {
    fn default() -> Self {
        Self {
            parallel_rows_threshold: 10_000,
            parallel_groups_threshold: 1_000,
            pool_count: 5,
            pool_size: 5,
        }
    }
}
