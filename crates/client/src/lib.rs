//! Client code for cache-sweeper.
//!
//! This crate provides the HTTP client for the GitHub Actions cache API and
//! plugs it into the sweep workflow through [`sweeper_core::CacheApi`].

pub mod github;

pub use github::{CacheListRequest, CacheListResponse, GithubClient, GithubConfig, GithubError};
