mod auth;
mod login;
mod password_reset;
mod profile;
mod refresh;
mod signup;

pub use auth::*;
pub use login::*;
pub use password_reset::*;
pub use profile::*;
pub use refresh::*;
pub use signup::*;
