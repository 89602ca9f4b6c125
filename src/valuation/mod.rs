//! Valuation module - request building, model invocation and derived metrics

pub mod charts;
pub mod dataset;
pub mod engine;
pub mod flow;
pub mod format;
pub mod metrics;
pub mod model;
pub mod request;
pub mod source;
pub mod types;

pub use types::*;
