pub mod error;
pub mod search_controller;
pub mod selection;
pub mod storage;
pub mod watch_list;

pub use error::{SelectionError, StorageError, WatchListError};
pub use search_controller::{QuerySearchController, SearchSnapshot, SearchStatus, MIN_QUERY_LEN};
pub use selection::MovieSelection;
pub use storage::{validate_key, JsonFileStorage, KeyValueStorage, MemoryStorage};
pub use watch_list::{ListUpdate, WatchListStore};
