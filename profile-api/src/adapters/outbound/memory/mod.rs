mod avatar;
mod user;

pub use avatar::InMemoryAvatarStorage;
pub use user::InMemoryUserRepository;
