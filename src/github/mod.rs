mod client;
#[cfg(test)]
pub mod fake;
mod types;

pub use client::{GitHubClient, RepositoryApi};
pub use types::*;
