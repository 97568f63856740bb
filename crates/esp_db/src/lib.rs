pub mod blob;
pub mod error;
pub mod memory;
pub mod repository;
pub mod schema;
pub mod store;

pub use blob::{BlobStore, MemBlobStore, S3BlobStore};
pub use error::{Error, Result};
pub use memory::MemStorage;
pub use repository::PgStorage;
pub use store::Storage;
