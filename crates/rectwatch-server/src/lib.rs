pub mod http;
pub mod server;
pub mod service;
pub mod sqlite;

pub use server::{Server, ShutdownHandle, run};
pub use service::QueryService;
pub use sqlite::SqliteStore;
