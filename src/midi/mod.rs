pub mod file;
pub mod handler;
pub mod message;
