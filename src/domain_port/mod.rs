// store

mod session_store;

pub use session_store::*;

// repo

mod principal_repo;
mod taxonomy_repo;

pub use principal_repo::*;
pub use taxonomy_repo::*;
