pub mod chat_stream;
pub mod compare;
pub mod config;
pub mod message;
pub mod service;
pub mod session;
