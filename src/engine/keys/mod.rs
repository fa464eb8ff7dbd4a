mod loader;


pub use loader::{KEY_TABLE, KeySet, load_keys};
