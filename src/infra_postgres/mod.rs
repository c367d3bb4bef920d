mod principal_repo_postgres;
mod taxonomy_repo_postgres;

pub use principal_repo_postgres::*;
pub use taxonomy_repo_postgres::*;

mod util;
