mod auth_service_impl;
mod credential_hasher_bcrypt;
mod taxonomy_service_impl;
mod token_codec_jwt;

pub use auth_service_impl::*;
pub use credential_hasher_bcrypt::*;
pub use taxonomy_service_impl::*;
pub use token_codec_jwt::*;
