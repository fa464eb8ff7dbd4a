use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct TestScenario {
    pub name: String,
    /// One id list per existing file, written as 1.parquet, 2.parquet, ...
    pub existing: Vec<Vec<i64>>,
    /// `None` leaves the incoming directory absent.
    pub incoming: Option<Vec<Vec<i64>>>,
    /// Extra existing files filled with garbage bytes.
    #[serde(default)]
    pub corrupt_existing: Vec<String>,
    pub max_files: Option<usize>,
    #[serde(default = "one")]
    pub iterations: usize,
    #[serde(default = "direct")]
    pub strategy: String,
    #[serde(default = "one")]
    pub workers: usize,
    #[serde(default)]
    pub strict: bool,
    pub expect: Expectation,
}

#[derive(Debug, Deserialize)]
pub struct Expectation {
    pub exit_code: i32,
    /// Whether a JSON report should exist after the run.
    #[serde(default = "yes")]
    pub report: bool,
    pub key_cardinality: Option<u64>,
    pub succeeded: Option<usize>,
    pub failed: Option<usize>,
    /// Surviving ids of each output in the first iteration, in file order.
    pub surviving: Option<Vec<Vec<i64>>>,
}

fn one() -> usize {
    1
}

fn direct() -> String {
    "direct".to_string()
}

fn yes() -> bool {
    true
}

pub fn load_scenarios_from_json(path: &str) -> Vec<TestScenario> {
    let content = fs::read_to_string(path).expect("Failed to read scenario file");
    serde_json::from_str(&content).expect("Invalid JSON format")
}
