pub mod storage;
pub mod store;

pub use storage::{FavoritesSlot, JsonFileSlot, PersistenceError, FAVORITES_FILE};
pub use store::FavoritesStore;
