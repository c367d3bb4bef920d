mod cookies;
mod error;
mod handler;
mod router;
mod views;

pub use error::recover_error;
pub use router::routes;
