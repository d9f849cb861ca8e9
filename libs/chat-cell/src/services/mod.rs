pub mod chat;
pub mod live;
