pub mod alert;
pub mod filter;
pub mod global;
