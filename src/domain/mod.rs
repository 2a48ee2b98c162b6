//! Core domain types and the signal engine.

pub mod price;
pub mod indicator;
pub mod signal_config;
pub mod config_validation;
pub mod rule_eval;
pub mod risk;
pub mod signal;
pub mod backtest;
pub mod report;
pub mod error;
