pub use super::factories::{MergeDirFactory, ParquetFactory};

pub struct Factory;

impl Factory {
    pub fn parquet() -> ParquetFactory {
        ParquetFactory::new()
    }

    pub fn merge_dirs() -> MergeDirFactory {
        MergeDirFactory::new()
    }
}
