use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors raised while loading, linking or deploying contract artifacts.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {0} not found in any artifact directory")]
    NotFound(String),

    #[error("artifact {0} has no creation bytecode")]
    MissingBytecode(String),

    #[error("artifact {contract} has invalid bytecode: {reason}")]
    InvalidBytecode { contract: String, reason: String },

    #[error("artifact {contract} needs library {library} which was not supplied")]
    UnlinkedLibrary { contract: String, library: String },

    #[error("rpc error while deploying {contract}: {reason}")]
    Rpc { contract: String, reason: String },

    #[error("deployment of {contract} reverted in tx {tx}")]
    Reverted { contract: String, tx: String },

    #[error("receipt for {contract} carries no contract address")]
    NoContractAddress { contract: String },
}
