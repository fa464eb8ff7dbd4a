use crate::test_helpers::factories::MergeDirFactory;

#[test]
fn lays_out_directories_and_config() {
    let (root, config) = MergeDirFactory::new()
        .with_existing(&[1, 2])
        .with_existing(&[3])
        .with_incoming(&[2])
        .create();

    assert!(config.existing_dir.join("1.parquet").is_file());
    assert!(config.existing_dir.join("2.parquet").is_file());
    assert!(config.incoming_dir.join("1.parquet").is_file());
    assert!(config.output_root.as_ref().unwrap().starts_with(root.path()));
    assert_eq!(config.key_columns, vec!["id".to_string()]);
    assert_eq!(config.iterations, 1);
}

#[test]
fn factory_shortcut_builds_the_same_layout() {
    use crate::test_helpers::factory::Factory;

    let (_root, config) = Factory::merge_dirs()
        .with_existing(&[1])
        .with_incoming(&[1])
        .create();

    assert!(config.existing_dir.join("1.parquet").is_file());
    assert_eq!(config.engine.threads, Some(2));
    assert!(config.engine.scratch_root.as_ref().unwrap().is_dir());
}
