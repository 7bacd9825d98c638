//! Solid-fuel composition calculator. The calculation core lives in `fuel`;
//! the CLI, the desktop GUI and the HTML form server are thin shells over it.

pub mod app;
pub mod config;
pub mod fuel;
pub mod i18n;
pub mod report;
pub mod ui_cli;
pub mod units;
pub mod web;
