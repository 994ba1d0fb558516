//! Artifact loading, library linking and contract deployment.

mod artifact;
mod deployer;
mod error;
mod store;

pub use artifact::{Artifact, Libraries};
pub use deployer::Deployer;
pub use error::{DeployError, Result};
pub use store::ArtifactStore;
