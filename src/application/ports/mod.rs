pub mod connectivity;
pub mod notifier;
pub mod record_store;
pub mod request_queue;
pub mod story_api;
pub mod token_store;

pub use connectivity::ConnectivityProbe;
pub use notifier::{NoticeKind, Notifier, ShowNotification};
pub use record_store::RecordStore;
pub use request_queue::RequestQueue;
pub use story_api::{LoginSession, StoryApi, StoryListing};
pub use token_store::TokenStore;
