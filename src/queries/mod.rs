pub mod filter;
pub mod patch;
pub mod users;
