//! HTTP request handlers.

pub mod cache;
pub mod health;
mod rate_limit;
pub mod redirect;
pub mod shorten;
pub mod stats;
pub mod urls;

pub use cache::{cache_clear_handler, cache_reset_stats_handler, cache_stats_handler};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::summary_handler;
pub use urls::{delete_url_handler, list_urls_handler, update_url_handler, url_stats_handler};
