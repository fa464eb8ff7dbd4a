pub mod driver;
pub mod errors;
pub mod keys;
pub mod memory;
pub mod merge;
pub mod query;
pub mod session;

pub use errors::*;
