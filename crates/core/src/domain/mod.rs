pub mod allocation;
pub mod error;
pub mod profile;
