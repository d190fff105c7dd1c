mod user;

pub use user::UserServiceImpl;
