pub(crate) mod check;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod password_reset;
pub(crate) mod profile;
pub(crate) mod refresh;
pub(crate) mod signup;

// re-export items from sub-modules
pub use check::*;
pub use login::*;
pub use logout::*;
pub use password_reset::*;
pub use profile::*;
pub use refresh::*;
pub use signup::*;
