pub mod files;
pub mod store;
pub mod watcher;

pub use files::{data_file, ensure_dir, get_data_dir, init_local_dir, LOG_FILE};
pub use store::{DocumentStore, JsonFileStore, StoreEvent};
pub use watcher::{StoreWatcher, WakeDetector};
