//! HR Dashboard
//!
//! Loads an employee spreadsheet, cleans and enriches it, and computes the
//! indicators and chart series shown by the dashboard window.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod stats;
