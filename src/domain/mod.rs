//! Core domain types and logic.
//!
//! The analytics pipeline runs leaf to root: [`execution`] records are
//! bucketed and folded in [`trade`], rolled up per day in [`daily`], then
//! summarized across days in [`dashboard`].

pub mod account;
pub mod config_validation;
pub mod daily;
pub mod dashboard;
pub mod error;
pub mod execution;
pub mod format;
pub mod import;
pub mod journal;
pub mod notes;
pub mod rounding;
pub mod trade;
