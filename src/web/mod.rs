//! Read-only JSON API over the current snapshot

pub mod filter;
pub mod routes;
pub mod server;

pub use filter::PairFilter;
pub use routes::{create_router, AppState};
pub use server::start_server;
