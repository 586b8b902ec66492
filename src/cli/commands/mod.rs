pub mod render;
pub mod token;
