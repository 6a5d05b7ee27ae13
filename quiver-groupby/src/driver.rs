use std::ops::Range;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch};
use arrow::datatypes::{Field, Schema, SchemaRef};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use quiver_aggregate::{AggregateCall, BoundAggregate, BoundState};
use quiver_compute::{GroupKey, LogicalType, ScalarColumnBuilder, take_rows};
use quiver_result::{Error, Result};

use crate::config::GroupByConfig;
use crate::pool::PoolQueue;

/// Mapping from group key to the rows that belong to it.
///
/// Keys keep first-seen order in a side list so group iteration, and
/// therefore output row order, is deterministic. Row index lists preserve
/// input order, which the first/last aggregates depend on.
struct GroupTable {
    index: FxHashMap<GroupKey, usize>,
    keys: Vec<GroupKey>,
    rows: Vec<Vec<usize>>,
}

impl GroupTable {
    fn new() -> GroupTable {
        GroupTable {
            index: FxHashMap::default(),
            keys: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn insert(&mut self, key: GroupKey, row: usize) {
        if let Some(&slot) = self.index.get(&key) {
            self.rows[slot].push(row);
        } else {
            let slot = self.keys.len();
            self.index.insert(key.clone(), slot);
            self.keys.push(key);
            self.rows.push(vec![row]);
        }
    }

    /// Append another table built over a later row range. Row lists stay
    /// sorted as long as merges happen in range order.
    fn merge(&mut self, other: GroupTable) {
        for (key, mut rows) in other.keys.into_iter().zip(other.rows) {
            if let Some(&slot) = self.index.get(&key) {
                self.rows[slot].append(&mut rows);
            } else {
                let slot = self.keys.len();
                self.index.insert(key.clone(), slot);
                self.keys.push(key);
                self.rows.push(rows);
            }
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Partitions batch rows into groups and applies aggregate calls per group.
///
/// One driver owns one bounded pool queue; concurrent `execute` calls share
/// it. Each call produces a batch with one row per group: the group-by key
/// columns first (original types preserved), then one column per aggregate
/// call, in call order.
pub struct GroupByDriver {
    config: GroupByConfig,
    pools: PoolQueue,
}

impl GroupByDriver {
    pub fn new(config: GroupByConfig) -> Result<GroupByDriver> {
        let pools = PoolQueue::new(config.pool_count, config.pool_size)?;
        Ok(GroupByDriver { config, pools })
    }

    pub fn with_defaults() -> Result<GroupByDriver> {
        GroupByDriver::new(GroupByConfig::default())
    }

    /// Group `batch` by the given key columns and evaluate every call per
    /// group.
    ///
    /// Zero input rows yield a zero-row batch with the full output schema.
    /// The output schema is fixed by dispatch before any group is touched,
    /// so every group contributes exactly one slot per call.
    pub fn execute(
        &self,
        batch: &RecordBatch,
        key_columns: &[usize],
        calls: &[AggregateCall],
    ) -> Result<RecordBatch> {
        let schema = batch.schema();
        self.validate(batch, &schema, key_columns, calls)?;

        let table = self.build_groups(batch, key_columns)?;
        tracing::debug!(
            rows = batch.num_rows(),
            groups = table.len(),
            "bucketed rows into groups"
        );

        let mut fields: Vec<Field> = key_columns
            .iter()
            .map(|&col| schema.field(col).clone())
            .collect();
        let mut columns = build_key_columns(&table, &schema, key_columns)?;

        for call in calls {
            let input_field = schema.field(call.column);
            let aggregate = BoundAggregate::bind(call, input_field)?;
            let column = self.apply_call(&aggregate, batch.column(call.column), &table)?;
            fields.push(aggregate.output_field().clone());
            columns.push(column);
        }

        let output_schema = Arc::new(Schema::new(fields));
        Ok(RecordBatch::try_new(output_schema, columns)?)
    }

    fn validate(
        &self,
        batch: &RecordBatch,
        schema: &SchemaRef,
        key_columns: &[usize],
        calls: &[AggregateCall],
    ) -> Result<()> {
        if key_columns.is_empty() {
            return Err(Error::InvalidArgumentError(
                "group-by requires at least one key column; aggregate the whole input \
                 through an accumulator instead"
                    .into(),
            ));
        }
        for &col in key_columns {
            if col >= batch.num_columns() {
                return Err(Error::InvalidArgumentError(format!(
                    "group-by key column index {col} out of range for {} columns",
                    batch.num_columns()
                )));
            }
            let field = schema.field(col);
            if LogicalType::from_arrow(field.data_type()).is_none() {
                return Err(Error::InvalidArgumentError(format!(
                    "group-by key column {} has unsupported type {}",
                    field.name(),
                    field.data_type()
                )));
            }
        }
        for call in calls {
            if call.column >= batch.num_columns() {
                return Err(Error::InvalidArgumentError(format!(
                    "aggregate {} targets column index {} out of range for {} columns",
                    call.kind,
                    call.column,
                    batch.num_columns()
                )));
            }
        }
        Ok(())
    }

    /// Build phase: one group key per row, rows bucketed by key.
    ///
    /// The parallel path folds disjoint row ranges into per-range tables and
    /// merges them in range order, so per-group row order always matches
    /// input order and first/last results are identical to the sequential
    /// path.
    fn build_groups(&self, batch: &RecordBatch, key_columns: &[usize]) -> Result<GroupTable> {
        let rows = batch.num_rows();
        let columns = batch.columns();

        if rows <= self.config.parallel_rows_threshold {
            let mut table = GroupTable::new();
            for row in 0..rows {
                let key = GroupKey::from_row(columns, key_columns, row)?;
                table.insert(key, row);
            }
            return Ok(table);
        }

        tracing::debug!(rows, "build phase running in parallel");
        let pool = self.pools.acquire();
        pool.install(|| {
            let chunk = rows.div_ceil(pool.current_num_threads().max(1)).max(1);
            let ranges: Vec<Range<usize>> = (0..rows)
                .step_by(chunk)
                .map(|start| start..(start + chunk).min(rows))
                .collect();
            ranges
                .into_par_iter()
                .map(|range| {
                    let mut table = GroupTable::new();
                    for row in range {
                        let key = GroupKey::from_row(columns, key_columns, row)?;
                        table.insert(key, row);
                    }
                    Ok(table)
                })
                .try_reduce(GroupTable::new, |mut left, right| {
                    left.merge(right);
                    Ok(left)
                })
        })
    }

    /// Apply phase: one fresh state per group, fed that group's row subset,
    /// then all states evaluated into a single output column.
    ///
    /// Any failure while transforming a group aborts the whole operation;
    /// the parallel path surfaces the first error instead of degrading.
    fn apply_call(
        &self,
        aggregate: &BoundAggregate,
        input: &ArrayRef,
        table: &GroupTable,
    ) -> Result<ArrayRef> {
        let transform = |rows: &Vec<usize>| -> Result<BoundState> {
            let mut state = aggregate.new_state();
            let subset = take_rows(input, rows)?;
            aggregate.update(&mut state, &subset)?;
            Ok(state)
        };

        let states: Vec<BoundState> = if table.len() <= self.config.parallel_groups_threshold {
            let mut states = Vec::with_capacity(table.len());
            for rows in &table.rows {
                states.push(transform(rows).map_err(|e| wrap_transform_error(aggregate, e))?);
            }
            states
        } else {
            tracing::debug!(
                groups = table.len(),
                call = aggregate.name(),
                "apply phase running in parallel"
            );
            let pool = self.pools.acquire();
            pool.install(|| {
                table
                    .rows
                    .par_iter()
                    .map(transform)
                    .collect::<Result<Vec<_>>>()
            })
            .map_err(|e| wrap_transform_error(aggregate, e))?
        };

        aggregate.evaluate(states)
    }
}

fn wrap_transform_error(aggregate: &BoundAggregate, err: Error) -> Error {
    Error::TaskExecution(format!(
        "aggregate {} failed while transforming a group: {err}",
        aggregate.name()
    ))
}

/// Rebuild the key columns from the group keys, one row per group, in
/// group-iteration order and with the original column types.
fn build_key_columns(
    table: &GroupTable,
    schema: &SchemaRef,
    key_columns: &[usize],
) -> Result<Vec<ArrayRef>> {
    let mut out = Vec::with_capacity(key_columns.len());
    for (pos, &col) in key_columns.iter().enumerate() {
        let logical = LogicalType::from_arrow(schema.field(col).data_type()).ok_or_else(|| {
            Error::Internal(format!(
                "key column {} passed validation with unsupported type",
                schema.field(col).name()
            ))
        })?;
        let mut builder = ScalarColumnBuilder::with_capacity(logical, table.len());
        for key in &table.keys {
            builder.append(&key.values()[pos])?;
        }
        out.push(builder.finish());
    }
    Ok(out)
}
