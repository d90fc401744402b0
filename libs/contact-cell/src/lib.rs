pub mod handlers;
pub mod models;
pub mod router;
pub mod service;

pub use models::*;
pub use service::ContactService;
