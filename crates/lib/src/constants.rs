//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `boardscribe` workspace: service defaults, request defaults, and the
//! reference enumerations published by the Foreplay API documentation.

/// The public root of the Foreplay API.
pub const DEFAULT_BASE_URL: &str = "https://public.api.foreplay.co/";

/// Environment variable holding the bearer token.
pub const API_KEY_ENV: &str = "FOREPLAY_API_KEY";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "FOREPLAY_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "FOREPLAY_TIMEOUT_SECS";

/// The response header carrying the remaining API credits.
pub const CREDITS_HEADER: &str = "X-Credits-Remaining";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_ORDER: &str = "newest";

/// Default sort order for the brands-by-domain lookup.
pub const DEFAULT_DOMAIN_ORDER: &str = "most_ranked";

/// Page size used when listing a board for enrichment. Only one page is fetched.
pub const BOARD_PAGE_LIMIT: u32 = 200;

/// Pause between two successive ad detail fetches, in milliseconds.
pub const DETAIL_FETCH_DELAY_MS: u64 = 100;

/// The display format retained by the enrichment pipeline.
pub const VIDEO_FORMAT: &str = "video";

pub const DISPLAY_FORMATS: &[&str] = &["video", "image", "carousel", "collection"];

pub const PUBLISHER_PLATFORMS: &[&str] = &["Facebook", "Instagram", "Messenger", "Audience Network"];

pub const MARKET_TARGETS: &[&str] = &["B2C", "B2B"];

/// Sort orders accepted by the ad listing endpoints. `saved_newest` only applies to the swipefile.
pub const SORT_ORDERS: &[&str] = &[
    "newest",
    "oldest",
    "longest_running",
    "most_relevant",
    "saved_newest",
];

pub const DOMAIN_SORT_ORDERS: &[&str] = &["most_ranked", "least_ranked"];

/// A sample of the niches the service classifies ads into.
pub const NICHES: &[&str] = &[
    "Health & Fitness",
    "Food & Beverage",
    "Fashion",
    "Beauty",
    "Technology",
    "Finance",
    "Education",
    "Travel",
    "Entertainment",
    "Real Estate",
    "E-commerce",
    "SaaS",
    "Gaming",
];
