mod messages;
mod responses;

pub use messages::UserMessage;
pub use responses::*;
