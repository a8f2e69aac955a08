pub mod store;
pub mod memory;
pub mod mongo;

pub use store::*;
pub use memory::MemoryItemStore;
pub use mongo::MongoItemStore;
