use arrow::array::{Array, ArrayRef};
use arrow::datatypes::Field;
use quiver_compute::{DistinctValueSet, ScalarColumnBuilder, ScalarValue};
use quiver_result::Result;

use crate::accumulator::UnaryAccumulator;
use crate::dispatch::AggregateKind;
use crate::state::AggregateState;

/// Wraps a unary accumulation so it deduplicates input values before
/// delegating.
///
/// Each update scans its input row by row, keeping the first occurrence of
/// every distinct non-null value in encounter order, and forwards the
/// collected values to the wrapped accumulation as a single update. If a
/// batch contributes nothing new (all null or all already seen), the
/// delegate is not invoked at all, so it observes no spurious state
/// transitions.
///
/// Min and max bypass deduplication entirely: duplicates cannot change an
/// extremum, so the set bookkeeping would be pure overhead.
pub struct DistinctAccumulator {
    inner: UnaryAccumulator,
    name: String,
    output_field: Field,
    skip_dedup: bool,
}

/// Per-group state: the seen-value set plus the delegate's state.
pub struct DistinctState {
    seen: DistinctValueSet,
    inner: AggregateState,
}

impl DistinctAccumulator {
    pub fn new(kind: AggregateKind, inner: UnaryAccumulator) -> Self {
        let name = format!("{}_distinct", inner.name());
        let output_field = Field::new(
            format!(
                "{}(distinct {})",
                inner.name(),
                inner.input_field().name()
            ),
            inner.output_field().data_type().clone(),
            inner.output_field().is_nullable(),
        )
        .with_metadata(inner.output_field().metadata().clone());
        let skip_dedup = matches!(kind, AggregateKind::Min | AggregateKind::Max);
        Self {
            inner,
            name,
            output_field,
            skip_dedup,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_field(&self) -> &Field {
        &self.output_field
    }

    pub fn new_state(&self) -> DistinctState {
        DistinctState {
            seen: DistinctValueSet::new(),
            inner: self.inner.new_state(),
        }
    }

    pub fn update(&self, state: &mut DistinctState, array: &ArrayRef) -> Result<()> {
        if self.skip_dedup {
            return self.inner.update(&mut state.inner, array);
        }
        self.inner.check_input(array)?;

        // Scratch vector of first occurrences; dropped on every exit path.
        let mut scratch = ScalarColumnBuilder::with_capacity(self.inner.input_type(), array.len());
        for row in 0..array.len() {
            let value = ScalarValue::read(array.as_ref(), row)?;
            if value.is_null() {
                continue;
            }
            if state.seen.insert(value.clone()) {
                scratch.append(&value)?;
            }
        }
        if scratch.is_empty() {
            return Ok(());
        }
        let distinct_rows = scratch.finish();
        self.inner.update(&mut state.inner, &distinct_rows)
    }

    pub fn evaluate(&self, states: Vec<DistinctState>) -> Result<ArrayRef> {
        let inner_states = states.into_iter().map(|s| s.inner).collect();
        self.inner.evaluate(inner_states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::AggregateKind;
    use arrow::array::Int64Array;
    use arrow::datatypes::DataType;
    use std::sync::Arc;

    fn int64_field() -> Field {
        Field::new("v", DataType::Int64, true)
    }

    #[test]
    fn all_duplicate_batch_does_not_reach_the_delegate() {
        let inner = AggregateKind::LastValue.bind(&int64_field()).unwrap();
        let adapter = DistinctAccumulator::new(AggregateKind::LastValue, inner);
        let mut state = adapter.new_state();

        let first: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        adapter.update(&mut state, &first).unwrap();
        // Every value already seen: the delegate must not observe this batch,
        // so last_value stays 2 rather than becoming 1.
        let dups: ArrayRef = Arc::new(Int64Array::from(vec![2, 1]));
        adapter.update(&mut state, &dups).unwrap();

        match &state.inner {
            AggregateState::Select { value, .. } => {
                assert_eq!(value.as_ref(), Some(&ScalarValue::Int64(2)));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn output_field_names_the_distinct_input() {
        let inner = AggregateKind::Count.bind(&int64_field()).unwrap();
        let adapter = DistinctAccumulator::new(AggregateKind::Count, inner);
        assert_eq!(adapter.name(), "count_distinct");
        assert_eq!(adapter.output_field().name(), "count(distinct v)");
    }
}
