use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use quiver_compute::{LogicalType, ScalarColumnBuilder, ScalarValue};
use quiver_result::{Error, Result};

/// Binary combine rule for the select family of aggregates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOp {
    Min,
    Max,
    /// Keep the earliest non-null value seen across updates.
    First,
    /// Keep the most recent non-null value seen across updates.
    Last,
}

impl SelectOp {
    pub fn name(self) -> &'static str {
        match self {
            SelectOp::Min => "min",
            SelectOp::Max => "max",
            SelectOp::First => "first_value",
            SelectOp::Last => "last_value",
        }
    }
}

/// A mutable running aggregate for one (group, aggregate-call) pair.
///
/// Each variant starts at the aggregate's identity and only ever observes
/// the single logical type it was specialized for; feeding it a vector of a
/// different concrete encoding is a [`Error::Compute`] programming-error
/// condition. Null elements are skipped on every path: they never affect
/// sums, counts, extrema, or first/last results.
#[derive(Clone, Debug)]
pub enum AggregateState {
    /// Counts non-null elements. Evaluates to a non-null Int64, 0 included.
    Count { value: i64 },
    /// Integer sum, widened to i64 for Int32 input. Wraps on overflow.
    SumInt {
        input: LogicalType,
        value: i64,
        has_value: bool,
    },
    /// Floating sum, widened to f64 for Float32 input.
    SumFloat {
        input: LogicalType,
        value: f64,
        has_value: bool,
    },
    /// Running (sum, count) over any numeric input, widened to f64.
    Avg {
        input: LogicalType,
        sum: f64,
        count: i64,
    },
    /// Min/Max/First/Last over any supported type. The first non-null value
    /// is stored unconditionally; later values go through `select(new, old)`.
    Select {
        op: SelectOp,
        input: LogicalType,
        value: Option<ScalarValue>,
    },
}

impl AggregateState {
    /// Consume one input vector, skipping null slots.
    pub fn update(&mut self, array: &ArrayRef) -> Result<()> {
        match self {
            AggregateState::Count { value } => {
                *value += (array.len() - array.null_count()) as i64;
                Ok(())
            }
            AggregateState::SumInt {
                input,
                value,
                has_value,
            } => match input {
                LogicalType::Int32 => {
                    let typed = downcast::<Int32Array>(array, "Int32Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *value = value.wrapping_add(typed.value(i) as i64);
                            *has_value = true;
                        }
                    }
                    Ok(())
                }
                LogicalType::Int64 => {
                    let typed = downcast::<Int64Array>(array, "Int64Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *value = value.wrapping_add(typed.value(i));
                            *has_value = true;
                        }
                    }
                    Ok(())
                }
                other => Err(Error::Internal(format!(
                    "integer sum state bound to non-integer type {other}"
                ))),
            },
            AggregateState::SumFloat {
                input,
                value,
                has_value,
            } => match input {
                LogicalType::Float32 => {
                    let typed = downcast::<Float32Array>(array, "Float32Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *value += typed.value(i) as f64;
                            *has_value = true;
                        }
                    }
                    Ok(())
                }
                LogicalType::Float64 => {
                    let typed = downcast::<Float64Array>(array, "Float64Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *value += typed.value(i);
                            *has_value = true;
                        }
                    }
                    Ok(())
                }
                other => Err(Error::Internal(format!(
                    "float sum state bound to non-float type {other}"
                ))),
            },
            AggregateState::Avg { input, sum, count } => match input {
                LogicalType::Int32 => {
                    let typed = downcast::<Int32Array>(array, "Int32Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *sum += typed.value(i) as f64;
                            *count += 1;
                        }
                    }
                    Ok(())
                }
                LogicalType::Int64 => {
                    let typed = downcast::<Int64Array>(array, "Int64Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *sum += typed.value(i) as f64;
                            *count += 1;
                        }
                    }
                    Ok(())
                }
                LogicalType::Float32 => {
                    let typed = downcast::<Float32Array>(array, "Float32Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *sum += typed.value(i) as f64;
                            *count += 1;
                        }
                    }
                    Ok(())
                }
                LogicalType::Float64 => {
                    let typed = downcast::<Float64Array>(array, "Float64Array")?;
                    for i in 0..typed.len() {
                        if !typed.is_null(i) {
                            *sum += typed.value(i);
                            *count += 1;
                        }
                    }
                    Ok(())
                }
                other => Err(Error::Internal(format!(
                    "avg state bound to non-numeric type {other}"
                ))),
            },
            AggregateState::Select { op, input, value } => {
                let op = *op;
                update_select(op, *input, value, array)
            }
        }
    }

    /// Write this state's final value into the output builder, consuming the
    /// state. Empty states write null, except Count which writes 0.
    pub fn evaluate_into(self, builder: &mut ScalarColumnBuilder) -> Result<()> {
        match self {
            AggregateState::Count { value } => builder.append(&ScalarValue::Int64(value)),
            AggregateState::SumInt {
                value, has_value, ..
            } => {
                if has_value {
                    builder.append(&ScalarValue::Int64(value))
                } else {
                    builder.append(&ScalarValue::Null)
                }
            }
            AggregateState::SumFloat {
                value, has_value, ..
            } => {
                if has_value {
                    builder.append(&ScalarValue::Float64(value))
                } else {
                    builder.append(&ScalarValue::Null)
                }
            }
            AggregateState::Avg { sum, count, .. } => {
                if count == 0 {
                    builder.append(&ScalarValue::Null)
                } else {
                    builder.append(&ScalarValue::Float64(sum / count as f64))
                }
            }
            AggregateState::Select { value, .. } => match value {
                Some(v) => builder.append(&v),
                None => builder.append(&ScalarValue::Null),
            },
        }
    }
}

fn update_select(
    op: SelectOp,
    input: LogicalType,
    value: &mut Option<ScalarValue>,
    array: &ArrayRef,
) -> Result<()> {
    match input {
        LogicalType::Bool => {
            let typed = downcast::<BooleanArray>(array, "BooleanArray")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Bool(typed.value(i)));
                }
            }
        }
        LogicalType::Int32 => {
            let typed = downcast::<Int32Array>(array, "Int32Array")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Int32(typed.value(i)));
                }
            }
        }
        LogicalType::Int64 => {
            let typed = downcast::<Int64Array>(array, "Int64Array")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Int64(typed.value(i)));
                }
            }
        }
        LogicalType::Float32 => {
            let typed = downcast::<Float32Array>(array, "Float32Array")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Float32(typed.value(i)));
                }
            }
        }
        LogicalType::Float64 => {
            let typed = downcast::<Float64Array>(array, "Float64Array")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Float64(typed.value(i)));
                }
            }
        }
        LogicalType::Binary => {
            let typed = downcast::<BinaryArray>(array, "BinaryArray")?;
            for i in 0..typed.len() {
                if !typed.is_null(i) {
                    observe(op, value, ScalarValue::Binary(typed.value(i).to_vec()));
                }
            }
        }
    }
    Ok(())
}

fn observe(op: SelectOp, slot: &mut Option<ScalarValue>, new: ScalarValue) {
    match slot.take() {
        None => *slot = Some(new),
        Some(old) => *slot = Some(select(op, new, old)),
    }
}

/// Combine a newly observed value with the stored one.
///
/// Max over bool is logical OR and Min is logical AND; both fall out of the
/// generic ordering below. Binary values are ordered by their text-decoded
/// form, not byte-wise (lossy for non-UTF-8 content).
fn select(op: SelectOp, new: ScalarValue, old: ScalarValue) -> ScalarValue {
    match op {
        SelectOp::First => old,
        SelectOp::Last => new,
        SelectOp::Max => {
            if greater(&new, &old) {
                new
            } else {
                old
            }
        }
        SelectOp::Min => {
            if greater(&new, &old) {
                old
            } else {
                new
            }
        }
    }
}

fn greater(a: &ScalarValue, b: &ScalarValue) -> bool {
    match (a, b) {
        (ScalarValue::Bool(a), ScalarValue::Bool(b)) => *a && !*b,
        (ScalarValue::Int32(a), ScalarValue::Int32(b)) => a > b,
        (ScalarValue::Int64(a), ScalarValue::Int64(b)) => a > b,
        (ScalarValue::Float32(a), ScalarValue::Float32(b)) => a > b,
        (ScalarValue::Float64(a), ScalarValue::Float64(b)) => a > b,
        (ScalarValue::Binary(a), ScalarValue::Binary(b)) => {
            String::from_utf8_lossy(a) > String::from_utf8_lossy(b)
        }
        // A select state never mixes types; anything else was already
        // rejected by the encoding check in update.
        _ => false,
    }
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, expected: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::Compute(format!(
            "input vector is not {expected}, but {}",
            array.data_type()
        ))
    })
}
