//! Client-side history analytics for an AI fitness-tracker image analysis service.
//!
//! The service stores one analysis per uploaded screenshot. This crate keeps an
//! in-memory cache of those analyses and derives what a user wants to see from
//! them: trend deltas against the previous analysis, chart series, and
//! recommendation text ready for display.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod models;
pub mod ui;
