//! # Coinwatch - Crypto Tracker Client Core
//!
//! The headless core of a cryptocurrency price tracker: reactive screen
//! controllers over a REST-backed repository, plus a schedule-driven
//! price-alert worker.
//!
//! ## Architecture
//!
//! - **App**: wiring and the alert schedule
//! - **Screens**: per-screen controllers folding repository streams into
//!   observable state cells
//! - **State**: result envelopes, screen snapshots and domain models
//! - **Repository**: remote API + local cache behind a trait boundary
//! - **Worker**: tier-aware price-alert pass
//! - **Notify**: notification boundary
//! - **Config**: configuration management

pub mod app;
pub mod config;
pub mod error;
pub mod notify;
pub mod repository;
pub mod scope;
pub mod screens;
pub mod state;
pub mod worker;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use scope::Scope;
pub use worker::PriceAlertWorker;
