pub mod kv_queue;
pub mod kv_store;

pub use kv_queue::KvRequestQueue;
pub use kv_store::{KvStore, KvTokenStore};
