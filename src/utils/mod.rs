pub mod sanitize;
pub mod text;
