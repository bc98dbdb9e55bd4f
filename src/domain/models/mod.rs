pub mod credential;
pub mod notification;
pub mod role;
pub mod token;
pub mod user;
