pub mod account_store;
pub mod jwt_key_store;
pub mod session_store;

pub use account_store::*;
pub use jwt_key_store::JwtKeyStore;
pub use session_store::*;
