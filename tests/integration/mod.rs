#[path = "../helpers/factories/parquet_factory.rs"]
#[allow(dead_code)]
mod parquet_factory;
pub mod runner;
pub mod scenarios;

pub use runner::run_scenario;
pub use scenarios::load_scenarios_from_json;
