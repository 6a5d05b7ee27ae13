use std::hash::{Hash, Hasher};

use arrow::array::{
    Array, ArrayBuilder, ArrayRef, BinaryArray, BinaryBuilder, BooleanArray, BooleanBuilder, Float32Array,
    Float32Builder, Float64Array, Float64Builder, Int32Array, Int32Builder, Int64Array,
    Int64Builder,
};
use arrow::datatypes::DataType;
use quiver_result::{Error, Result};
use std::sync::Arc;

use crate::logical::LogicalType;

/// An owned scalar value for one of the supported logical types.
///
/// Equality and hashing are structural: floats compare and hash by bit
/// pattern (so the value can serve as a hash-map key), and binaries by byte
/// content rather than reference identity. `Null == Null` holds, which is
/// what group-by bucketing and first-occurrence tracking need; callers that
/// want SQL `NULL != NULL` comparison semantics must special-case nulls
/// before comparing.
#[derive(Clone, Debug)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Binary(Vec<u8>),
}

impl ScalarValue {
    /// Read the value at `row` out of an array, as `Null` when the validity
    /// bit is unset regardless of any buffer content at that offset.
    pub fn read(array: &dyn Array, row: usize) -> Result<ScalarValue> {
        if array.is_null(row) {
            return Ok(ScalarValue::Null);
        }
        match array.data_type() {
            DataType::Boolean => {
                let typed = downcast::<BooleanArray>(array, "BooleanArray")?;
                Ok(ScalarValue::Bool(typed.value(row)))
            }
            DataType::Int32 => {
                let typed = downcast::<Int32Array>(array, "Int32Array")?;
                Ok(ScalarValue::Int32(typed.value(row)))
            }
            DataType::Int64 => {
                let typed = downcast::<Int64Array>(array, "Int64Array")?;
                Ok(ScalarValue::Int64(typed.value(row)))
            }
            DataType::Float32 => {
                let typed = downcast::<Float32Array>(array, "Float32Array")?;
                Ok(ScalarValue::Float32(typed.value(row)))
            }
            DataType::Float64 => {
                let typed = downcast::<Float64Array>(array, "Float64Array")?;
                Ok(ScalarValue::Float64(typed.value(row)))
            }
            DataType::Binary => {
                let typed = downcast::<BinaryArray>(array, "BinaryArray")?;
                Ok(ScalarValue::Binary(typed.value(row).to_vec()))
            }
            other => Err(Error::Compute(format!(
                "cannot read scalar from unsupported array type {other}"
            ))),
        }
    }

    /// The logical type of this value, or `None` for `Null`.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            ScalarValue::Null => None,
            ScalarValue::Bool(_) => Some(LogicalType::Bool),
            ScalarValue::Int32(_) => Some(LogicalType::Int32),
            ScalarValue::Int64(_) => Some(LogicalType::Int64),
            ScalarValue::Float32(_) => Some(LogicalType::Float32),
            ScalarValue::Float64(_) => Some(LogicalType::Float64),
            ScalarValue::Binary(_) => Some(LogicalType::Binary),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, expected: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::Compute(format!(
            "input vector is not {expected}, but {}",
            array.data_type()
        ))
    })
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => true,
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => a == b,
            (ScalarValue::Int32(a), ScalarValue::Int32(b)) => a == b,
            (ScalarValue::Int64(a), ScalarValue::Int64(b)) => a == b,
            (ScalarValue::Float32(a), ScalarValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (ScalarValue::Float64(a), ScalarValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (ScalarValue::Binary(a), ScalarValue::Binary(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ScalarValue::Null => state.write_u8(0),
            ScalarValue::Bool(v) => {
                state.write_u8(1);
                v.hash(state);
            }
            ScalarValue::Int32(v) => {
                state.write_u8(2);
                v.hash(state);
            }
            ScalarValue::Int64(v) => {
                state.write_u8(3);
                v.hash(state);
            }
            ScalarValue::Float32(v) => {
                state.write_u8(4);
                v.to_bits().hash(state);
            }
            ScalarValue::Float64(v) => {
                state.write_u8(5);
                v.to_bits().hash(state);
            }
            ScalarValue::Binary(v) => {
                state.write_u8(6);
                v.hash(state);
            }
        }
    }
}

/// A type-dispatched Arrow builder that accepts [`ScalarValue`] slots.
///
/// The builder plays the allocator role for aggregate outputs: each
/// accumulator materializes its result column through one of these, and
/// dropping an unfinished builder releases its buffers on every exit path.
pub enum ScalarColumnBuilder {
    Bool(BooleanBuilder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Binary(BinaryBuilder),
}

impl ScalarColumnBuilder {
    pub fn with_capacity(logical: LogicalType, capacity: usize) -> Self {
        match logical {
            LogicalType::Bool => ScalarColumnBuilder::Bool(BooleanBuilder::with_capacity(capacity)),
            LogicalType::Int32 => ScalarColumnBuilder::Int32(Int32Builder::with_capacity(capacity)),
            LogicalType::Int64 => ScalarColumnBuilder::Int64(Int64Builder::with_capacity(capacity)),
            LogicalType::Float32 => {
                ScalarColumnBuilder::Float32(Float32Builder::with_capacity(capacity))
            }
            LogicalType::Float64 => {
                ScalarColumnBuilder::Float64(Float64Builder::with_capacity(capacity))
            }
            LogicalType::Binary => {
                ScalarColumnBuilder::Binary(BinaryBuilder::with_capacity(capacity, 1024))
            }
        }
    }

    /// The logical type this builder produces.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            ScalarColumnBuilder::Bool(_) => LogicalType::Bool,
            ScalarColumnBuilder::Int32(_) => LogicalType::Int32,
            ScalarColumnBuilder::Int64(_) => LogicalType::Int64,
            ScalarColumnBuilder::Float32(_) => LogicalType::Float32,
            ScalarColumnBuilder::Float64(_) => LogicalType::Float64,
            ScalarColumnBuilder::Binary(_) => LogicalType::Binary,
        }
    }

    pub fn append_null(&mut self) {
        match self {
            ScalarColumnBuilder::Bool(b) => b.append_null(),
            ScalarColumnBuilder::Int32(b) => b.append_null(),
            ScalarColumnBuilder::Int64(b) => b.append_null(),
            ScalarColumnBuilder::Float32(b) => b.append_null(),
            ScalarColumnBuilder::Float64(b) => b.append_null(),
            ScalarColumnBuilder::Binary(b) => b.append_null(),
        }
    }

    /// Append one scalar slot; `Null` appends a null regardless of builder
    /// type, any other mismatch between value and builder is a compute error.
    pub fn append(&mut self, value: &ScalarValue) -> Result<()> {
        match (self, value) {
            (builder, ScalarValue::Null) => {
                builder.append_null();
                Ok(())
            }
            (ScalarColumnBuilder::Bool(b), ScalarValue::Bool(v)) => {
                b.append_value(*v);
                Ok(())
            }
            (ScalarColumnBuilder::Int32(b), ScalarValue::Int32(v)) => {
                b.append_value(*v);
                Ok(())
            }
            (ScalarColumnBuilder::Int64(b), ScalarValue::Int64(v)) => {
                b.append_value(*v);
                Ok(())
            }
            (ScalarColumnBuilder::Float32(b), ScalarValue::Float32(v)) => {
                b.append_value(*v);
                Ok(())
            }
            (ScalarColumnBuilder::Float64(b), ScalarValue::Float64(v)) => {
                b.append_value(*v);
                Ok(())
            }
            (ScalarColumnBuilder::Binary(b), ScalarValue::Binary(v)) => {
                b.append_value(v);
                Ok(())
            }
            (builder, other) => Err(Error::Compute(format!(
                "cannot append {:?} into a {} column builder",
                other,
                builder.logical_type()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScalarColumnBuilder::Bool(b) => b.len(),
            ScalarColumnBuilder::Int32(b) => b.len(),
            ScalarColumnBuilder::Int64(b) => b.len(),
            ScalarColumnBuilder::Float32(b) => b.len(),
            ScalarColumnBuilder::Float64(b) => b.len(),
            ScalarColumnBuilder::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(&mut self) -> ArrayRef {
        match self {
            ScalarColumnBuilder::Bool(b) => Arc::new(b.finish()),
            ScalarColumnBuilder::Int32(b) => Arc::new(b.finish()),
            ScalarColumnBuilder::Int64(b) => Arc::new(b.finish()),
            ScalarColumnBuilder::Float32(b) => Arc::new(b.finish()),
            ScalarColumnBuilder::Float64(b) => Arc::new(b.finish()),
            ScalarColumnBuilder::Binary(b) => Arc::new(b.finish()),
        }
    }
}
