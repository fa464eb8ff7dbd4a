mod driver;
mod merge_config;
mod output;
mod phase;
mod summary;
mod worker;


pub use driver::{BatchMergeDriver, run_merge};
pub use merge_config::MergeConfig;
pub use phase::RunPhase;
pub use summary::{FileFailure, IterationSummary, MergeRunSummary};
