pub mod background;
pub mod board;
pub mod error;
pub mod favicon;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod reconcile;
pub mod reorder;
pub mod settings;
pub mod shortcuts;
pub mod store;
pub mod suggest;
pub mod tabs;
pub mod view;

pub use board::Board;
pub use error::{BoardError, Result};
pub use model::{Shortcut, Tab, DEFAULT_TAB_NAME};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
