mod auth_service;
mod taxonomy_service;

pub use auth_service::*;
pub use taxonomy_service::*;
