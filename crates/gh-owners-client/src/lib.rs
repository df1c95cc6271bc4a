//! Ownership resolution for pull requests
//!
//! The ownership service decides, per pull request, who may approve it and how
//! many LGTMs it needs. The answer depends on org membership and sig
//! assignment, both of which change over time, so results are never cached.
//!
//! ```rust,no_run
//! use gh_owners_client::{HttpOwnersLoader, OwnersLoader};
//!
//! # async fn example() -> Result<(), gh_owners_client::OwnersError> {
//! let loader = HttpOwnersLoader::new()?;
//! let owners = loader
//!     .load_owners("https://owners.example.com/api", "pingcap", "tidb", 42)
//!     .await?;
//! println!("{} approvers, needs {} LGTMs", owners.approvers.len(), owners.needs_lgtm);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http_loader;
pub mod owners;

pub use error::OwnersError;
pub use http_loader::HttpOwnersLoader;
pub use owners::{owners_url, Owners};

use async_trait::async_trait;

/// Resolves the owners of a pull request
///
/// Implementations are expected to be slow and fallible (network calls).
#[async_trait]
pub trait OwnersLoader: Send + Sync {
    async fn load_owners(
        &self,
        endpoint: &str,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Owners, OwnersError>;
}
