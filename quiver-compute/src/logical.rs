use std::fmt;

use arrow::datatypes::DataType;

/// The closed set of primitive column encodings the engine supports.
///
/// Every dispatch decision in the aggregation core is a total match over
/// this enum; Arrow types outside the set are rejected at the boundary
/// rather than deep inside an update loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Variable-length binary.
    Binary,
}

impl LogicalType {
    /// Map an Arrow data type into the supported set.
    ///
    /// Returns `None` for anything outside the closed set; the caller decides
    /// whether that is a dispatch rejection or an invalid argument.
    pub fn from_arrow(data_type: &DataType) -> Option<LogicalType> {
        match data_type {
            DataType::Boolean => Some(LogicalType::Bool),
            DataType::Int32 => Some(LogicalType::Int32),
            DataType::Int64 => Some(LogicalType::Int64),
            DataType::Float32 => Some(LogicalType::Float32),
            DataType::Float64 => Some(LogicalType::Float64),
            DataType::Binary => Some(LogicalType::Binary),
            _ => None,
        }
    }

    /// The Arrow data type this logical type materializes as.
    pub fn to_arrow(self) -> DataType {
        match self {
            LogicalType::Bool => DataType::Boolean,
            LogicalType::Int32 => DataType::Int32,
            LogicalType::Int64 => DataType::Int64,
            LogicalType::Float32 => DataType::Float32,
            LogicalType::Float64 => DataType::Float64,
            LogicalType::Binary => DataType::Binary,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Bool => write!(f, "BOOL"),
            LogicalType::Int32 => write!(f, "INT32"),
            LogicalType::Int64 => write!(f, "INT64"),
            LogicalType::Float32 => write!(f, "FLOAT32"),
            LogicalType::Float64 => write!(f, "FLOAT64"),
            LogicalType::Binary => write!(f, "BINARY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_round_trip() {
        for lt in [
            LogicalType::Bool,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::Float32,
            LogicalType::Float64,
            LogicalType::Binary,
        ] {
            assert_eq!(LogicalType::from_arrow(&lt.to_arrow()), Some(lt));
        }
    }

    #[test]
    fn rejects_types_outside_the_set() {
        assert_eq!(LogicalType::from_arrow(&DataType::Utf8), None);
        assert_eq!(LogicalType::from_arrow(&DataType::Date32), None);
    }
}
