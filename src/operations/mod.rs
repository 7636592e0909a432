pub mod list;
pub mod month;
pub mod validate;
