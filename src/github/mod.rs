// GitHub API module.
// Provides the client and gist types used by the store proxy.

pub mod client;
pub mod gist;
pub mod types;

pub use client::GitHubClient;
pub use types::*;
