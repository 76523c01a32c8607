pub mod database;
pub mod helpers;

#[allow(unused_imports)]
pub use database::TestDb;
#[allow(unused_imports)]
pub use helpers::sample_user;
