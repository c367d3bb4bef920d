mod principal_repo_memory;
mod session_store_memory;
mod taxonomy_repo_memory;

pub use principal_repo_memory::*;
pub use session_store_memory::*;
pub use taxonomy_repo_memory::*;
