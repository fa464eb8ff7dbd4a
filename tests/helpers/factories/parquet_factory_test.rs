use crate::test_helpers::factories::{ParquetFactory, read_ids, read_rows};
use tempfile::tempdir;

#[test]
fn writes_rows_that_read_back_in_order() {
    let dir = tempdir().unwrap();
    let path = ParquetFactory::new()
        .with_ids(&[3, 1])
        .with_null_id()
        .create(&dir.path().join("f.parquet"));

    assert_eq!(read_ids(&path), vec![1, 3]);
    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].payload, "row-null");
}

#[test]
fn create_many_numbers_files_from_one() {
    let dir = tempdir().unwrap();
    let files = ParquetFactory::create_many(&dir.path().join("in"), &[&[1], &[2, 3]]);

    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("in/1.parquet"));
    assert_eq!(read_ids(&files[1]), vec![2, 3]);
}

#[test]
fn composite_keys_keep_tenant_order() {
    use crate::test_helpers::factory::Factory;

    let dir = tempdir().unwrap();
    let path = Factory::parquet()
        .with_keys(&[(2, 1), (1, 5)])
        .create(&dir.path().join("k.parquet"));

    let keys: Vec<(i64, Option<i64>)> = read_rows(&path).iter().map(|r| (r.tenant, r.id)).collect();
    assert_eq!(keys, vec![(1, Some(5)), (2, Some(1))]);
}
