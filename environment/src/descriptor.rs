//! Per-network address descriptors (`v2.<network>.json`).

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("failed to read descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("descriptor has no {section} entry named {key}")]
    MissingKey { section: &'static str, key: String },
}

/// Networks with a published descriptor. Fork names resolve to the
/// network they fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NetworkName {
    Mainnet,
    Goerli,
}

impl NetworkName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkName::Mainnet => "mainnet",
            NetworkName::Goerli => "goerli",
        }
    }

    pub fn descriptor_file(&self) -> String {
        format!("v2.{}.json", self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = DescriptorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "mainnet" | "mainnet-fork" | "hardhat-fork" => Ok(NetworkName::Mainnet),
            "goerli" => Ok(NetworkName::Goerli),
            other => Err(DescriptorError::UnknownNetwork(other.to_string())),
        }
    }
}

impl TryFrom<String> for NetworkName {
    type Error = DescriptorError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<NetworkName> for String {
    fn from(name: NetworkName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalancerAddresses {
    pub vault: Address,
}

/// Deployed addresses for one network, keyed by symbolic name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub deployer: Address,
    pub notional: Address,
    #[serde(default)]
    pub tokens: BTreeMap<String, Address>,
    #[serde(default)]
    pub whales: BTreeMap<String, Address>,
    #[serde(default)]
    pub balancer: BalancerAddresses,
    #[serde(default)]
    pub libs: BTreeMap<String, Address>,
    #[serde(default)]
    pub actions: BTreeMap<String, Address>,
}

impl NetworkDescriptor {
    /// Reads `<dir>/v2.<network>.json`.
    pub fn load(dir: &Path, network: NetworkName) -> Result<Self, DescriptorError> {
        let path = dir.join(network.descriptor_file());
        let json = std::fs::read_to_string(&path).map_err(|source| DescriptorError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| DescriptorError::Parse { path, source })
    }

    pub fn token(&self, symbol: &str) -> Result<Address, DescriptorError> {
        lookup(&self.tokens, "tokens", symbol)
    }

    pub fn whale(&self, name: &str) -> Result<Address, DescriptorError> {
        lookup(&self.whales, "whales", name)
    }

    pub fn lib(&self, name: &str) -> Result<Address, DescriptorError> {
        lookup(&self.libs, "libs", name)
    }

    pub fn action(&self, name: &str) -> Result<Address, DescriptorError> {
        lookup(&self.actions, "actions", name)
    }
}

fn lookup(
    map: &BTreeMap<String, Address>,
    section: &'static str,
    key: &str,
) -> Result<Address, DescriptorError> {
    map.get(key)
        .copied()
        .ok_or_else(|| DescriptorError::MissingKey {
            section,
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "networkName": "mainnet",
        "deployer": "0x0000000000000000000000000000000000000001",
        "notional": "0x1344A36A1B56144C3Bc62E7757377D288fDE0369",
        "tokens": {
            "cETH": "0x4Ddc2D193948926D02f9B1fE9e1daa0718270ED5",
            "WETH": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        },
        "whales": { "ETH": "0x0000000000000000000000000000000000000002" },
        "balancer": { "vault": "0xBA12222222228d8Ba445958a75a0704d566BF2C8" },
        "libs": { "SettleAssetsExternal": "0x0000000000000000000000000000000000000003" },
        "actions": { "Views": "0x0000000000000000000000000000000000000004" }
    }"#;

    #[test]
    fn fork_names_resolve_to_mainnet() {
        assert_eq!("mainnet-fork".parse::<NetworkName>().unwrap(), NetworkName::Mainnet);
        assert_eq!("hardhat-fork".parse::<NetworkName>().unwrap(), NetworkName::Mainnet);
        assert_eq!("goerli".parse::<NetworkName>().unwrap(), NetworkName::Goerli);
        assert!(matches!(
            "arbitrum".parse::<NetworkName>(),
            Err(DescriptorError::UnknownNetwork(_))
        ));
        assert_eq!(NetworkName::Goerli.descriptor_file(), "v2.goerli.json");
    }

    #[test]
    fn loads_descriptor_and_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("v2.mainnet.json"), SAMPLE).unwrap();

        let descriptor = NetworkDescriptor::load(dir.path(), NetworkName::Mainnet).unwrap();
        assert_eq!(
            descriptor.balancer.vault,
            "0xBA12222222228d8Ba445958a75a0704d566BF2C8".parse::<Address>().unwrap()
        );
        assert!(descriptor.token("cETH").is_ok());
        assert!(descriptor.lib("SettleAssetsExternal").is_ok());
        assert!(descriptor.whale("ETH").is_ok());

        match descriptor.action("GovernanceAction") {
            Err(DescriptorError::MissingKey { section, key }) => {
                assert_eq!(section, "actions");
                assert_eq!(key, "GovernanceAction");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_descriptor_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            NetworkDescriptor::load(dir.path(), NetworkName::Goerli),
            Err(DescriptorError::Read { .. })
        ));
    }
}
