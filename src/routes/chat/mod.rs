pub mod get;
pub mod page;
pub mod send;
