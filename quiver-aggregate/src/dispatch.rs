use std::fmt;

use arrow::datatypes::Field;
use quiver_compute::LogicalType;
use quiver_result::{Error, Result};

use crate::accumulator::{StateFactory, UnaryAccumulator};
use crate::state::SelectOp;

/// The closed set of aggregate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Avg,
    Count,
    Sum,
    Min,
    Max,
    FirstValue,
    LastValue,
}

impl AggregateKind {
    pub fn name(self) -> &'static str {
        match self {
            AggregateKind::Avg => "avg",
            AggregateKind::Count => "count",
            AggregateKind::Sum => "sum",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
            AggregateKind::FirstValue => "first_value",
            AggregateKind::LastValue => "last_value",
        }
    }

    /// Select the accumulator specialization for the input field's logical
    /// type.
    ///
    /// This is a pure, exhaustive switch over (function, type): no I/O, no
    /// mutable state. Unsupported pairs fail with a typed rejection naming
    /// the function, the offending field, and argument index 0 — these
    /// aggregates are strictly unary. Output type mapping:
    ///
    /// - `avg`: any numeric input -> nullable Float64
    /// - `sum`: Int32/Int64 -> nullable Int64, Float32/Float64 -> nullable Float64
    /// - `count`: any supported input -> non-nullable Int64
    /// - `min`/`max`/`first_value`/`last_value`: type-preserving, nullable
    pub fn bind(self, input_field: &Field) -> Result<UnaryAccumulator> {
        let input_type = LogicalType::from_arrow(input_field.data_type())
            .ok_or_else(|| Error::not_allowed_type(self.name(), input_field, 0))?;

        let (factory, output_type, nullable) = match self {
            AggregateKind::Avg => match input_type {
                LogicalType::Int32
                | LogicalType::Int64
                | LogicalType::Float32
                | LogicalType::Float64 => {
                    (StateFactory::Avg(input_type), LogicalType::Float64, true)
                }
                LogicalType::Bool | LogicalType::Binary => {
                    return Err(Error::not_allowed_type(self.name(), input_field, 0));
                }
            },
            AggregateKind::Sum => match input_type {
                LogicalType::Int32 | LogicalType::Int64 => {
                    (StateFactory::SumInt(input_type), LogicalType::Int64, true)
                }
                LogicalType::Float32 | LogicalType::Float64 => (
                    StateFactory::SumFloat(input_type),
                    LogicalType::Float64,
                    true,
                ),
                LogicalType::Bool | LogicalType::Binary => {
                    return Err(Error::not_allowed_type(self.name(), input_field, 0));
                }
            },
            AggregateKind::Count => (StateFactory::Count, LogicalType::Int64, false),
            AggregateKind::Min => (
                StateFactory::Select(SelectOp::Min, input_type),
                input_type,
                true,
            ),
            AggregateKind::Max => (
                StateFactory::Select(SelectOp::Max, input_type),
                input_type,
                true,
            ),
            AggregateKind::FirstValue => (
                StateFactory::Select(SelectOp::First, input_type),
                input_type,
                true,
            ),
            AggregateKind::LastValue => (
                StateFactory::Select(SelectOp::Last, input_type),
                input_type,
                true,
            ),
        };

        let output_field = Field::new(
            format!("{}({})", self.name(), input_field.name()),
            output_type.to_arrow(),
            nullable,
        )
        .with_metadata(input_field.metadata().clone());

        Ok(UnaryAccumulator::new(
            self.name(),
            input_field.clone(),
            input_type,
            output_field,
            output_type,
            factory,
        ))
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pairing of aggregate kind, target column index, and distinct flag.
///
/// Constructed once per logical plan node; the execution layer instantiates
/// one fresh accumulation state per group from it.
#[derive(Clone, Copy, Debug)]
pub struct AggregateCall {
    pub kind: AggregateKind,
    /// Resolved index of the input column in the batch schema.
    pub column: usize,
    pub distinct: bool,
}

impl AggregateCall {
    pub fn new(kind: AggregateKind, column: usize) -> Self {
        Self {
            kind,
            column,
            distinct: false,
        }
    }

    pub fn distinct(kind: AggregateKind, column: usize) -> Self {
        Self {
            kind,
            column,
            distinct: true,
        }
    }
}
