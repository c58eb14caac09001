//! Core domain types and logic.

pub mod alignment;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod ohlcv;
pub mod portfolio;
pub mod position;
pub mod signal;
pub mod simulation;
pub mod strategy;
