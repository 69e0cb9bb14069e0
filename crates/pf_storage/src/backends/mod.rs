pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use memory::InMemoryStorage;

#[cfg(feature = "mongodb")]
pub use mongo::MongoStorage;
