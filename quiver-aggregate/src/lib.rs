//! The accumulation core of the Quiver aggregation engine.
//!
//! An [`AggregateCall`] pairs an aggregate kind with a target column and a
//! distinct flag. Binding a call against an input field yields a
//! [`BoundAggregate`], which knows how to mint fresh per-group
//! accumulation states, feed them column slices, and materialize one output
//! slot per group:
//!
//! ```text
//! bind(call, field) -> accumulator
//! accumulator.new_state()            // once per group
//! accumulator.update(state, vector)  // zero or more times, null-skipping
//! accumulator.evaluate(states)       // one output array, one slot per group
//! ```
//!
//! States start at the aggregate's identity (count 0, empty sum, nothing
//! found) and are consumed by value at evaluate time, so a state cannot be
//! reused after its result has been written.
#![forbid(unsafe_code)]

pub mod accumulator;
pub mod dispatch;
pub mod distinct;
pub mod state;

pub use accumulator::UnaryAccumulator;
pub use dispatch::{AggregateCall, AggregateKind};
pub use distinct::{DistinctAccumulator, DistinctState};
pub use state::{AggregateState, SelectOp};

use arrow::array::ArrayRef;
use arrow::datatypes::Field;
use quiver_result::{Error, Result};

/// An aggregate call bound against a concrete input field, either plain or
/// wrapped by the distinct adapter.
pub enum BoundAggregate {
    Plain(UnaryAccumulator),
    Distinct(DistinctAccumulator),
}

/// Per-group state for a [`BoundAggregate`].
pub enum BoundState {
    Plain(AggregateState),
    Distinct(DistinctState),
}

impl BoundAggregate {
    /// Bind a call against its input field, routing through the distinct
    /// adapter when the call asks for it.
    pub fn bind(call: &AggregateCall, input_field: &Field) -> Result<BoundAggregate> {
        let inner = call.kind.bind(input_field)?;
        if call.distinct {
            Ok(BoundAggregate::Distinct(DistinctAccumulator::new(
                call.kind, inner,
            )))
        } else {
            Ok(BoundAggregate::Plain(inner))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BoundAggregate::Plain(a) => a.name(),
            BoundAggregate::Distinct(a) => a.name(),
        }
    }

    /// The synthesized output field: `<fn>(<input>)` or
    /// `<fn>(distinct <input>)`.
    pub fn output_field(&self) -> &Field {
        match self {
            BoundAggregate::Plain(a) => a.output_field(),
            BoundAggregate::Distinct(a) => a.output_field(),
        }
    }

    /// A fresh identity state for one group.
    pub fn new_state(&self) -> BoundState {
        match self {
            BoundAggregate::Plain(a) => BoundState::Plain(a.new_state()),
            BoundAggregate::Distinct(a) => BoundState::Distinct(a.new_state()),
        }
    }

    pub fn update(&self, state: &mut BoundState, array: &ArrayRef) -> Result<()> {
        match (self, state) {
            (BoundAggregate::Plain(a), BoundState::Plain(s)) => a.update(s, array),
            (BoundAggregate::Distinct(a), BoundState::Distinct(s)) => a.update(s, array),
            _ => Err(Error::Internal(
                "aggregate state does not belong to this accumulator".into(),
            )),
        }
    }

    /// Evaluate the given states, one output slot per state, in order.
    pub fn evaluate(&self, states: Vec<BoundState>) -> Result<ArrayRef> {
        match self {
            BoundAggregate::Plain(a) => {
                let mut plain = Vec::with_capacity(states.len());
                for state in states {
                    match state {
                        BoundState::Plain(s) => plain.push(s),
                        BoundState::Distinct(_) => {
                            return Err(Error::Internal(
                                "aggregate state does not belong to this accumulator".into(),
                            ));
                        }
                    }
                }
                a.evaluate(plain)
            }
            BoundAggregate::Distinct(a) => {
                let mut wrapped = Vec::with_capacity(states.len());
                for state in states {
                    match state {
                        BoundState::Distinct(s) => wrapped.push(s),
                        BoundState::Plain(_) => {
                            return Err(Error::Internal(
                                "aggregate state does not belong to this accumulator".into(),
                            ));
                        }
                    }
                }
                a.evaluate(wrapped)
            }
        }
    }
}
