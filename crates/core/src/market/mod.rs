pub mod catalog;
pub mod dashboard;
pub mod fetch;
pub mod provider;
pub mod types;

pub use fetch::{FetchOutcome, QuoteService};
