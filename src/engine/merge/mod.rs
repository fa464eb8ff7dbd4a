mod executor;
mod naming;


pub use executor::{MergeResult, MergeStrategy, STAGE_TABLE, merge_file};
pub use naming::OutputNamer;
