// Library root: re-exports all modules so integration tests and the CLI can
// access the crate's public API.

pub mod config;
pub mod db;
pub mod draft;
pub mod driver;
pub mod mock;
pub mod session;
pub mod valuation;
