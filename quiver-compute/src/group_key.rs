use arrow::array::ArrayRef;
use quiver_result::Result;

use crate::scalar::ScalarValue;

/// The projected group-by column values for one row.
///
/// Two rows belong to the same group iff their keys are equal under
/// [`ScalarValue`]'s structural comparison: binaries by byte content, floats
/// by bit pattern, and NULL cells equal to each other so that all NULL-keyed
/// rows bucket together.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    values: Vec<ScalarValue>,
}

impl GroupKey {
    /// Project the key columns of one row into an owned key.
    pub fn from_row(columns: &[ArrayRef], key_columns: &[usize], row: usize) -> Result<GroupKey> {
        let mut values = Vec::with_capacity(key_columns.len());
        for &col in key_columns {
            values.push(ScalarValue::read(columns[col].as_ref(), row)?);
        }
        Ok(GroupKey { values })
    }

    /// The key cells, in group-by column order.
    pub fn values(&self) -> &[ScalarValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BinaryArray, Int64Array};
    use std::sync::Arc;

    #[test]
    fn binary_keys_equal_by_content() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![1, 1]));
        let bins: ArrayRef = Arc::new(BinaryArray::from_vec(vec![b"k1".as_ref(), b"k1".as_ref()]));
        let columns = vec![ints, bins];

        let a = GroupKey::from_row(&columns, &[0, 1], 0).unwrap();
        let b = GroupKey::from_row(&columns, &[0, 1], 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn null_keys_bucket_together() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![None, None, Some(3)]));
        let columns = vec![ints];

        let a = GroupKey::from_row(&columns, &[0], 0).unwrap();
        let b = GroupKey::from_row(&columns, &[0], 1).unwrap();
        let c = GroupKey::from_row(&columns, &[0], 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
