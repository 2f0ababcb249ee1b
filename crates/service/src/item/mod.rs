pub mod memory;
pub mod service;
pub mod store;

pub use memory::MemoryItemStore;
pub use service::ItemService;
pub use store::{ItemStore, SeaOrmItemStore};
