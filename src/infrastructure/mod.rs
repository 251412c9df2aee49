pub mod api;
pub mod cache;
pub mod database;
pub mod notify;
pub mod offline;
pub mod queue;
