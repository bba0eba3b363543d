pub mod access_store;

pub use access_store::{AccessStore, InMemoryAccessStore, PgAccessStore, StoreError, StoreSeed};
