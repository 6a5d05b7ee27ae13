use arrow::array::{ArrayRef, UInt32Builder};
use arrow::compute::take;
use quiver_result::{Error, Result};

/// Extract the given rows of an array into a fresh array, in index order.
///
/// This is how the group-by driver feeds each group's row subset to an
/// accumulator: the gathered array carries its own validity bitmap, so
/// null slots stay null in the subset.
pub fn take_rows(array: &ArrayRef, indices: &[usize]) -> Result<ArrayRef> {
    let mut index_builder = UInt32Builder::with_capacity(indices.len());
    for &idx in indices {
        let idx = u32::try_from(idx)
            .map_err(|_| Error::Internal(format!("row index {idx} exceeds u32 range")))?;
        index_builder.append_value(idx);
    }
    let index_array = index_builder.finish();
    Ok(take(array.as_ref(), &index_array, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array};
    use std::sync::Arc;

    #[test]
    fn gathers_rows_and_keeps_nulls() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), None, Some(3), Some(4)]));
        let subset = take_rows(&array, &[2, 1, 0]).unwrap();
        let subset = subset.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(subset.len(), 3);
        assert_eq!(subset.value(0), 3);
        assert!(subset.is_null(1));
        assert_eq!(subset.value(2), 1);
    }
}
