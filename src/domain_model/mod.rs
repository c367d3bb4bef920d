mod admin;
mod form;
mod page;
mod session;
mod slug;
mod taxonomy;

pub use admin::*;
pub use form::*;
pub use page::*;
pub use session::*;
pub use slug::*;
pub use taxonomy::*;
