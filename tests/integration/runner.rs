use crate::integration::config::write_config_for;
use crate::integration::parquet_factory::{ParquetFactory, read_ids};
use crate::integration::scenarios::TestScenario;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, error, info};

fn write_groups(dir: &Path, groups: &[Vec<i64>]) {
    let groups: Vec<&[i64]> = groups.iter().map(Vec::as_slice).collect();
    ParquetFactory::create_many(dir, &groups);
}

pub fn run_scenario(scenario: &TestScenario) {
    info!("▶ Running scenario: {}", scenario.name);
    let base = tempfile::tempdir().expect("Failed to create scenario dir");
    let paths = write_config_for(base.path(), scenario);

    write_groups(&paths.existing_dir, &scenario.existing);
    for name in &scenario.corrupt_existing {
        fs::write(paths.existing_dir.join(name), b"not a parquet file").unwrap();
    }
    if let Some(incoming) = &scenario.incoming {
        write_groups(&paths.incoming_dir, incoming);
    }
    debug!("Using config path: {}", paths.config_path.display());

    let status = Command::new(env!("CARGO_BIN_EXE_duck_merge"))
        .env("DUCK_MERGE_CONFIG", &paths.config_path)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .expect("Failed to start duck_merge");

    let expect = &scenario.expect;
    let code = status.code().unwrap_or(-1);
    if code != expect.exit_code {
        error!("❌ {}: exit code {} (expected {})", scenario.name, code, expect.exit_code);
        panic!("Scenario '{}' failed", scenario.name);
    }

    let scratch_left = fs::read_dir(&paths.scratch_root).unwrap().count();
    assert_eq!(scratch_left, 0, "{}: scratch directory left behind", scenario.name);

    assert_eq!(
        paths.report_path.is_file(),
        expect.report,
        "{}: report presence",
        scenario.name
    );
    if !expect.report {
        info!("✅ {} passed", scenario.name);
        return;
    }

    let report: Value =
        serde_json::from_str(&fs::read_to_string(&paths.report_path).unwrap()).unwrap();
    assert_eq!(report["label"], scenario.name.as_str());
    assert_eq!(
        report["iterations"].as_array().unwrap().len(),
        scenario.iterations,
        "{}: iterations",
        scenario.name
    );

    if let Some(cardinality) = expect.key_cardinality {
        assert_eq!(report["key_cardinality"], cardinality, "{}: key cardinality", scenario.name);
    }

    let count = |field: &str| -> usize {
        report["iterations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i[field].as_array().unwrap().len())
            .sum()
    };
    if let Some(succeeded) = expect.succeeded {
        assert_eq!(count("results"), succeeded, "{}: succeeded", scenario.name);
    }
    if let Some(failed) = expect.failed {
        assert_eq!(count("failures"), failed, "{}: failed", scenario.name);
    }

    if let Some(surviving) = &expect.surviving {
        let actual: Vec<Vec<i64>> = report["iterations"][0]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| read_ids(Path::new(r["output"].as_str().unwrap())))
            .collect();
        assert_eq!(&actual, surviving, "{}: surviving ids", scenario.name);
    }

    info!("✅ {} passed", scenario.name);
}
