mod model;


pub use model::{LoggingConfig, MergeSettings, Settings, load_settings, load_settings_from};
