mod avatar;
mod user;

pub use avatar::*;
pub use user::*;
