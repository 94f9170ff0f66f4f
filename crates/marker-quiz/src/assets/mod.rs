pub mod catalog;
pub mod layout;
