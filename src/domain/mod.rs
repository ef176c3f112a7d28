//! Domain layer: records, repository contract and click processing.
//!
//! - [`entities`] - Short URL records and their creation/patch inputs
//! - [`repositories`] - Storage contract implemented by infrastructure
//! - [`click_event`] - Click notification sent from the redirect hot path
//! - [`click_worker`] - Background consumer that persists click increments
//!
//! # Click Processing Flow
//!
//! 1. A redirect is served from the cache
//! 2. [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] increments the counter with retries
//!    via [`repositories::UrlRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
