//! Remote API clients

pub mod nexus_api;

pub use nexus_api::{NexusAPI, NexusCategory, NexusGame, NexusMetadata, NexusMod, RateLimitStatus};
