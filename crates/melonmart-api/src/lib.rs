//! MelonMart HTTP adapters.
//!
//! `reqwest` implementations of the core ports that talk to external
//! services: the storefront JSON API and the optional image-quality
//! analyzer.

pub mod dto;
pub mod quality;
pub mod storefront;

pub use quality::GeminiQualityAnalyzer;
pub use storefront::HttpStorefrontGateway;
