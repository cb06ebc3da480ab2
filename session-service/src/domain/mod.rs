pub mod access_claims;
pub mod account;
pub mod data_stores;
pub mod email;
pub mod email_client;
pub mod issued_tokens;
pub mod password;
pub mod password_reset;
pub mod principal;
pub mod refresh_claims;
pub mod requests;
pub mod responses;

pub use access_claims::*;
pub use account::*;
pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use issued_tokens::*;
pub use password::*;
pub use password_reset::*;
pub use principal::*;
pub use refresh_claims::*;
pub use requests::*;
pub use responses::*;
