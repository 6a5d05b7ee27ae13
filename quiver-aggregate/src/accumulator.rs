use arrow::array::{Array, ArrayRef};
use arrow::datatypes::Field;
use quiver_compute::{LogicalType, ScalarColumnBuilder};
use quiver_result::{Error, Result};

use crate::state::{AggregateState, SelectOp};

/// Recipe for minting fresh per-group states.
#[derive(Clone, Copy, Debug)]
pub(crate) enum StateFactory {
    Count,
    SumInt(LogicalType),
    SumFloat(LogicalType),
    Avg(LogicalType),
    Select(SelectOp, LogicalType),
}

/// Binds one input field and one output field to a state factory.
///
/// The accumulator owns the output buffer it builds during `evaluate` until
/// the finished array is handed to the caller; dropping a half-built column
/// on an error path releases it.
#[derive(Debug)]
pub struct UnaryAccumulator {
    name: &'static str,
    input_field: Field,
    input_type: LogicalType,
    output_field: Field,
    output_type: LogicalType,
    factory: StateFactory,
}

impl UnaryAccumulator {
    pub(crate) fn new(
        name: &'static str,
        input_field: Field,
        input_type: LogicalType,
        output_field: Field,
        output_type: LogicalType,
        factory: StateFactory,
    ) -> Self {
        Self {
            name,
            input_field,
            input_type,
            output_field,
            output_type,
            factory,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn input_field(&self) -> &Field {
        &self.input_field
    }

    pub(crate) fn input_type(&self) -> LogicalType {
        self.input_type
    }

    pub fn output_field(&self) -> &Field {
        &self.output_field
    }

    /// A fresh identity state: nothing seen, count and sums at zero.
    pub fn new_state(&self) -> AggregateState {
        match self.factory {
            StateFactory::Count => AggregateState::Count { value: 0 },
            StateFactory::SumInt(input) => AggregateState::SumInt {
                input,
                value: 0,
                has_value: false,
            },
            StateFactory::SumFloat(input) => AggregateState::SumFloat {
                input,
                value: 0.0,
                has_value: false,
            },
            StateFactory::Avg(input) => AggregateState::Avg {
                input,
                sum: 0.0,
                count: 0,
            },
            StateFactory::Select(op, input) => AggregateState::Select {
                op,
                input,
                value: None,
            },
        }
    }

    /// Reject vectors whose concrete encoding does not match the bound
    /// input type. Guards against planner bugs, not user input.
    pub(crate) fn check_input(&self, array: &ArrayRef) -> Result<()> {
        if array.data_type() != self.input_field.data_type() {
            return Err(Error::Compute(format!(
                "accumulator {} expected {} input, but got {}",
                self.name,
                self.input_field.data_type(),
                array.data_type()
            )));
        }
        Ok(())
    }

    /// Feed one input vector to a state.
    pub fn update(&self, state: &mut AggregateState, array: &ArrayRef) -> Result<()> {
        self.check_input(array)?;
        state.update(array)
    }

    /// Evaluate the given states (one per group, in group-iteration order)
    /// into a freshly allocated output array of the output type. Ownership
    /// of the array passes to the caller.
    pub fn evaluate(&self, states: Vec<AggregateState>) -> Result<ArrayRef> {
        let mut builder = ScalarColumnBuilder::with_capacity(self.output_type, states.len());
        for state in states {
            state.evaluate_into(&mut builder)?;
        }
        Ok(builder.finish())
    }
}
