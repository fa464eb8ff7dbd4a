mod options;
mod session;


pub use options::EngineOptions;
pub use session::{ColumnInfo, Session};
