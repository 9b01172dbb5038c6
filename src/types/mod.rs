pub mod events;
pub mod note;
