//! Integration tests for the group-by driver: bucketing, per-group
//! aggregate application, parallel/sequential agreement, and assembly.

use arrow::array::{Array, ArrayRef, BinaryArray, Int64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use quiver_aggregate::{AggregateCall, AggregateKind};
use quiver_groupby::{GroupByConfig, GroupByDriver};
use quiver_result::Error;
use std::sync::Arc;

fn batch(keys: Vec<Option<i64>>, values: Vec<Option<i64>>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("k", DataType::Int64, true),
        Field::new("v", DataType::Int64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(keys)) as ArrayRef,
            Arc::new(Int64Array::from(values)) as ArrayRef,
        ],
    )
    .unwrap()
}

fn sequential_driver() -> GroupByDriver {
    GroupByDriver::new(GroupByConfig {
        parallel_rows_threshold: usize::MAX,
        parallel_groups_threshold: usize::MAX,
        pool_count: 1,
        pool_size: 1,
    })
    .unwrap()
}

fn parallel_driver() -> GroupByDriver {
    GroupByDriver::new(GroupByConfig {
        parallel_rows_threshold: 0,
        parallel_groups_threshold: 0,
        pool_count: 2,
        pool_size: 2,
    })
    .unwrap()
}

fn as_int64(array: &ArrayRef) -> &Int64Array {
    array.as_any().downcast_ref::<Int64Array>().unwrap()
}

#[test]
fn sums_per_group_in_first_seen_key_order() {
    let input = batch(
        vec![Some(2), Some(1), Some(2), Some(1), Some(3)],
        vec![Some(1), Some(2), Some(3), Some(4), Some(5)],
    );
    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Sum, 1)];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.num_rows(), 3);
    assert_eq!(result.schema().field(0).name(), "k");
    assert_eq!(result.schema().field(1).name(), "sum(v)");

    let keys = as_int64(result.column(0));
    let sums = as_int64(result.column(1));
    assert_eq!(keys.values(), &[2, 1, 3]);
    assert_eq!(sums.values(), &[4, 6, 5]);
}

#[test]
fn multiple_aggregate_calls_each_contribute_one_column() {
    let input = batch(
        vec![Some(1), Some(1), Some(2)],
        vec![Some(10), None, Some(30)],
    );
    let driver = sequential_driver();
    let calls = [
        AggregateCall::new(AggregateKind::Count, 1),
        AggregateCall::new(AggregateKind::Sum, 1),
        AggregateCall::new(AggregateKind::Avg, 1),
        AggregateCall::new(AggregateKind::Min, 1),
        AggregateCall::new(AggregateKind::Max, 1),
    ];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.num_columns(), 6);
    assert_eq!(result.num_rows(), 2);
    // Group 1: one non-null value (10), one null.
    assert_eq!(as_int64(result.column(1)).value(0), 1);
    assert_eq!(as_int64(result.column(2)).value(0), 10);
    assert_eq!(as_int64(result.column(4)).value(0), 10);
    assert_eq!(as_int64(result.column(5)).value(0), 10);
}

#[test]
fn parallel_and_sequential_execution_agree() {
    let rows = 300;
    let keys: Vec<Option<i64>> = (0..rows).map(|i| Some(i % 7)).collect();
    let values: Vec<Option<i64>> = (0..rows)
        .map(|i| if i % 11 == 0 { None } else { Some(i * 3) })
        .collect();
    let input = batch(keys, values);
    let calls = [
        AggregateCall::new(AggregateKind::Count, 1),
        AggregateCall::new(AggregateKind::Sum, 1),
        AggregateCall::new(AggregateKind::Avg, 1),
        AggregateCall::new(AggregateKind::Min, 1),
        AggregateCall::new(AggregateKind::Max, 1),
        // Order-sensitive: only passes because parallel bucketing merges
        // row ranges in input order.
        AggregateCall::new(AggregateKind::FirstValue, 1),
        AggregateCall::new(AggregateKind::LastValue, 1),
    ];

    let sequential = sequential_driver().execute(&input, &[0], &calls).unwrap();
    let parallel = parallel_driver().execute(&input, &[0], &calls).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn distinct_count_through_the_driver() {
    let input = batch(
        vec![Some(1), Some(1), Some(1), Some(2)],
        vec![Some(5), Some(5), Some(6), Some(7)],
    );
    let driver = sequential_driver();
    let calls = [
        AggregateCall::distinct(AggregateKind::Count, 1),
        AggregateCall::new(AggregateKind::Count, 1),
    ];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.schema().field(1).name(), "count(distinct v)");
    assert_eq!(as_int64(result.column(1)).values(), &[2, 1]);
    assert_eq!(as_int64(result.column(2)).values(), &[3, 1]);
}

#[test]
fn first_and_last_respect_input_order_within_groups() {
    let input = batch(
        vec![Some(1), Some(2), Some(1), Some(2)],
        vec![Some(10), Some(20), None, Some(40)],
    );
    let driver = sequential_driver();
    let calls = [
        AggregateCall::new(AggregateKind::FirstValue, 1),
        AggregateCall::new(AggregateKind::LastValue, 1),
    ];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    let first = as_int64(result.column(1));
    let last = as_int64(result.column(2));
    assert_eq!(first.value(0), 10);
    assert_eq!(last.value(0), 10); // the later row in group 1 is null
    assert_eq!(first.value(1), 20);
    assert_eq!(last.value(1), 40);
}

#[test]
fn null_keys_form_a_single_group() {
    let input = batch(
        vec![None, None, Some(1)],
        vec![Some(1), Some(2), Some(3)],
    );
    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Count, 1)];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.num_rows(), 2);
    let keys = as_int64(result.column(0));
    assert!(keys.is_null(0));
    assert_eq!(as_int64(result.column(1)).value(0), 2);
}

#[test]
fn binary_keys_group_by_content_and_round_trip() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("tag", DataType::Binary, false),
        Field::new("v", DataType::Int64, true),
    ]));
    let input = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(BinaryArray::from_vec(vec![
                b"red".as_ref(),
                b"blue".as_ref(),
                b"red".as_ref(),
            ])) as ArrayRef,
            Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
        ],
    )
    .unwrap();

    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Sum, 1)];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.num_rows(), 2);
    let tags = result
        .column(0)
        .as_any()
        .downcast_ref::<BinaryArray>()
        .unwrap();
    assert_eq!(tags.value(0), b"red");
    assert_eq!(tags.value(1), b"blue");
    assert_eq!(as_int64(result.column(1)).values(), &[4, 2]);
}

#[test]
fn empty_input_yields_an_empty_batch_with_the_full_schema() {
    let input = batch(vec![], vec![]);
    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Count, 1)];
    let result = driver.execute(&input, &[0], &calls).unwrap();

    assert_eq!(result.num_rows(), 0);
    assert_eq!(result.schema().field(0).name(), "k");
    assert_eq!(result.schema().field(1).name(), "count(v)");
}

#[test]
fn unsupported_aggregate_input_aborts_the_operation() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("k", DataType::Int64, false),
        Field::new("payload", DataType::Binary, true),
    ]));
    let input = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1])) as ArrayRef,
            Arc::new(BinaryArray::from_vec(vec![b"x".as_ref()])) as ArrayRef,
        ],
    )
    .unwrap();

    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Avg, 1)];
    let err = driver.execute(&input, &[0], &calls).unwrap_err();
    assert!(matches!(err, Error::NotAllowedType { arg: 0, .. }));
}

#[test]
fn empty_key_column_list_is_rejected() {
    let input = batch(vec![Some(1)], vec![Some(1)]);
    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Count, 1)];
    assert!(matches!(
        driver.execute(&input, &[], &calls).unwrap_err(),
        Error::InvalidArgumentError(_)
    ));
}

#[test]
fn out_of_range_key_column_is_rejected() {
    let input = batch(vec![Some(1)], vec![Some(1)]);
    let driver = sequential_driver();
    let calls = [AggregateCall::new(AggregateKind::Count, 1)];
    assert!(matches!(
        driver.execute(&input, &[9], &calls).unwrap_err(),
        Error::InvalidArgumentError(_)
    ));
}
