/// State management module
///
/// This module holds the tagging pipeline:
/// - Shared data structures (data.rs)
/// - The image manifest (manifest.rs)
/// - The sparse annotation map (annotations.rs)
/// - Durable storage for the map (store.rs)
/// - Tagging session rules (session.rs)
/// - Export artifacts (export.rs)

pub mod annotations;
pub mod data;
pub mod export;
pub mod manifest;
pub mod session;
pub mod store;
