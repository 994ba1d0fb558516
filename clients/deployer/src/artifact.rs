//! Compiled contract artifacts and library linking.
//!
//! Accepts the artifact layouts produced by the common toolchains: a flat
//! `bytecode` hex string (brownie, hardhat) optionally paired with a
//! top-level `linkReferences` map, or a `bytecode: { object, linkReferences }`
//! object (foundry).

use alloy::primitives::{keccak256, Address, Bytes};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{DeployError, Result};

/// Library name (short or `path:Name`) to deployed address.
pub type Libraries = BTreeMap<String, Address>;

/// `source file -> library -> byte ranges` to patch.
type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>;

const PLACEHOLDER_LEN: usize = 40;

#[derive(Debug, Clone, Copy, Deserialize)]
struct LinkOffset {
    start: usize,
    length: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object {
        object: String,
        #[serde(default, rename = "linkReferences")]
        link_references: LinkReferences,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    contract_name: String,
    #[serde(default)]
    abi: serde_json::Value,
    bytecode: Option<BytecodeField>,
    #[serde(default)]
    link_references: LinkReferences,
}

impl Artifact {
    /// Parses an artifact; `name` is used when the JSON carries no
    /// `contractName`.
    pub fn from_json(name: &str, json: &str) -> serde_json::Result<Self> {
        let mut artifact: Artifact = serde_json::from_str(json)?;
        if artifact.contract_name.is_empty() {
            artifact.contract_name = name.to_string();
        }
        Ok(artifact)
    }

    pub fn name(&self) -> &str {
        &self.contract_name
    }

    pub fn abi(&self) -> &serde_json::Value {
        &self.abi
    }

    fn raw_bytecode(&self) -> Option<&str> {
        let code = match self.bytecode.as_ref()? {
            BytecodeField::Hex(code) => code.as_str(),
            BytecodeField::Object { object, .. } => object.as_str(),
        };
        let code = code.strip_prefix("0x").unwrap_or(code);
        (!code.is_empty()).then_some(code)
    }

    fn link_references(&self) -> &LinkReferences {
        match &self.bytecode {
            Some(BytecodeField::Object {
                link_references, ..
            }) if !link_references.is_empty() => link_references,
            _ => &self.link_references,
        }
    }

    /// Libraries this artifact must be linked against.
    pub fn required_libraries(&self) -> Vec<String> {
        let refs = self.link_references();
        if !refs.is_empty() {
            return refs
                .values()
                .flat_map(|libs| libs.keys().cloned())
                .collect();
        }
        let mut names = Vec::new();
        let mut rest = self.raw_bytecode().unwrap_or_default();
        while let Some(pos) = rest.find("__") {
            let end = (pos + PLACEHOLDER_LEN).min(rest.len());
            let name = placeholder_name(&rest[pos..end]);
            if !names.contains(&name) {
                names.push(name);
            }
            rest = &rest[end..];
        }
        names
    }

    /// Returns creation bytecode with every library placeholder replaced.
    pub fn link(&self, libraries: &Libraries) -> Result<Bytes> {
        let mut code = self
            .raw_bytecode()
            .ok_or_else(|| DeployError::MissingBytecode(self.contract_name.clone()))?
            .to_string();

        let refs = self.link_references();
        if refs.is_empty() {
            for (name, address) in libraries {
                let encoded = hex::encode(address.as_slice());
                for placeholder in placeholders(name) {
                    code = code.replace(&placeholder, &encoded);
                }
            }
        } else {
            for (file, libs) in refs {
                for (library, offsets) in libs {
                    let address = libraries
                        .get(library)
                        .or_else(|| libraries.get(&format!("{}:{}", file, library)))
                        .ok_or_else(|| DeployError::UnlinkedLibrary {
                            contract: self.contract_name.clone(),
                            library: library.clone(),
                        })?;
                    let encoded = hex::encode(address.as_slice());
                    for offset in offsets {
                        let begin = offset.start * 2;
                        let end = begin + PLACEHOLDER_LEN;
                        if offset.length != 20 || end > code.len() {
                            return Err(DeployError::InvalidBytecode {
                                contract: self.contract_name.clone(),
                                reason: format!(
                                    "bad link reference for {} at {}+{}",
                                    library, offset.start, offset.length
                                ),
                            });
                        }
                        code.replace_range(begin..end, &encoded);
                    }
                }
            }
        }

        if let Some(pos) = code.find('_') {
            let end = (pos + PLACEHOLDER_LEN).min(code.len());
            return Err(DeployError::UnlinkedLibrary {
                contract: self.contract_name.clone(),
                library: placeholder_name(&code[pos..end]),
            });
        }

        hex::decode(&code)
            .map(Bytes::from)
            .map_err(|e| DeployError::InvalidBytecode {
                contract: self.contract_name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Placeholder spellings a library may appear under: the legacy
/// `__Name____` form (for both the given and the short name) and, for fully
/// qualified names, the `__$<hash>$__` form.
fn placeholders(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let short = name.rsplit(':').next().unwrap_or(name);
    for candidate in [name, short] {
        let truncated: String = candidate.chars().take(PLACEHOLDER_LEN - 4).collect();
        let legacy = format!("__{:_<width$}", truncated, width = PLACEHOLDER_LEN - 2);
        if !out.contains(&legacy) {
            out.push(legacy);
        }
    }
    if name.contains(':') {
        let hash = hex::encode(keccak256(name.as_bytes()));
        out.push(format!("__${}$__", &hash[..34]));
    }
    out
}

fn placeholder_name(placeholder: &str) -> String {
    placeholder
        .trim_matches(|c| c == '_' || c == '$')
        .to_string()
}
