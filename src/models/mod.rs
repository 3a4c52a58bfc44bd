pub mod input;
pub mod todo;
