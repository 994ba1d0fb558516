//! Contract deployment from a node-managed (impersonated) account.

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;
use utils::wait_for_receipt;

use crate::artifact::{Artifact, Libraries};
use crate::error::{DeployError, Result};
use crate::store::ArtifactStore;

/// Deploys artifacts from `from` and remembers every library it deploys,
/// so later contracts are linked against the most recent copy.
pub struct Deployer {
    provider: Arc<DynProvider>,
    from: Address,
    store: ArtifactStore,
    libraries: Mutex<Libraries>,
}

impl Deployer {
    pub fn new(provider: Arc<DynProvider>, from: Address, store: ArtifactStore) -> Self {
        Self {
            provider,
            from,
            store,
            libraries: Mutex::new(Libraries::new()),
        }
    }

    pub fn from(&self) -> Address {
        self.from
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Libraries deployed so far, by contract name.
    pub fn libraries(&self) -> Libraries {
        self.libraries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn record_library(&self, name: &str, address: Address) {
        self.libraries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), address);
    }

    /// Deploys `artifact` linked against `libraries`, with ABI-encoded
    /// constructor arguments appended to the creation code.
    pub async fn deploy(
        &self,
        artifact: &Artifact,
        libraries: &Libraries,
        constructor_args: &[u8],
    ) -> Result<Address> {
        let contract = artifact.name().to_string();
        let mut code = artifact.link(libraries)?.to_vec();
        code.extend_from_slice(constructor_args);

        let tx = TransactionRequest::default()
            .with_from(self.from)
            .with_deploy_code(code);
        let rpc_error = |e: &dyn std::fmt::Display| DeployError::Rpc {
            contract: contract.clone(),
            reason: e.to_string(),
        };
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| rpc_error(&e))?;
        let receipt = wait_for_receipt(&*self.provider, *pending.tx_hash())
            .await
            .map_err(|e| rpc_error(&e))?;

        if !receipt.status() {
            return Err(DeployError::Reverted {
                contract,
                tx: receipt.transaction_hash.to_string(),
            });
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::NoContractAddress {
                contract: contract.clone(),
            })?;

        info!(
            contract = %contract,
            %address,
            tx = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "deployed contract"
        );
        Ok(address)
    }

    /// Deploys an artifact from the store, linked against the recorded
    /// libraries plus `extra` (which wins on name clashes).
    pub async fn deploy_linked(
        &self,
        name: &str,
        extra: &Libraries,
        constructor_args: &[u8],
    ) -> Result<Address> {
        let artifact = self.store.load(name)?;
        let mut libraries = self.libraries();
        libraries.extend(extra.iter().map(|(k, v)| (k.clone(), *v)));
        self.deploy(&artifact, &libraries, constructor_args).await
    }

    pub async fn deploy_named(&self, name: &str, constructor_args: &[u8]) -> Result<Address> {
        self.deploy_linked(name, &Libraries::new(), constructor_args)
            .await
    }

    /// Deploys a library and records it for linking.
    pub async fn deploy_library(&self, name: &str) -> Result<Address> {
        let address = self.deploy_named(name, &[]).await?;
        self.record_library(name, address);
        Ok(address)
    }
}
