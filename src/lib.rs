//! gw2view-core - query and cache layer for a Guild Wars 2 account viewer.
//!
//! This crate turns logical requests ("give me account X's wallet") into
//! canonical API URLs, dispatches them through one of three data sources
//! (live network, offline fixtures, built-in demo fixtures) and memoizes
//! decoded results so repeated or overlapping requests neither re-fetch nor
//! re-parse. Presentation shells (TUI/GUI) consume the decoded domain
//! objects; they live in sibling crates.
//!
//! Entry points: [`api::ApiFacade`] for queries, [`cache::ImageCache`] for
//! render-service images, [`config::Config`] and [`auth::CredentialStore`]
//! for settings and API keys.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod models;

pub use api::{ApiError, ApiFacade, ConnectionMode};
pub use cache::{ImageCache, QueryCache};
pub use config::Config;
