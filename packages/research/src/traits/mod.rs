//! Core trait abstractions.
//!
//! The pipeline is wired through three seams so every stage can be tested
//! without a network: [`searcher::WebSearcher`] for discovery,
//! [`fetcher::PageFetcher`] for page retrieval, and
//! [`synthesizer::Synthesizer`] for record production.

pub mod fetcher;
pub mod searcher;
pub mod synthesizer;
