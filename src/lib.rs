// Library module for testable functions

pub mod config;
pub mod dashboard;
pub mod valuation;

pub use config::Config;
pub use valuation::flow::ValuationSession;
