//! Signing wallet and the chain it is connected to.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use eyre::{Context, Result};
use reqwest::Url;
use tracing::{info, instrument};

use crate::contract::RpcBurnSubmitter;

/// What the gate needs to know about the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletStatus {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

impl WalletStatus {
    pub fn connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn on_chain(&self, chain_id: u64) -> bool {
        self.chain_id == Some(chain_id)
    }
}

/// A signer bound to an RPC endpoint.
#[derive(Clone)]
pub struct WalletConnection {
    signer: PrivateKeySigner,
    rpc_url: Url,
    chain_id: u64,
    provider: DynProvider,
}

impl WalletConnection {
    /// Builds a signing provider for `rpc_url` and reads the chain it serves.
    #[instrument(name = "wallet::connect", skip(signer), fields(address = %signer.address()))]
    pub async fn connect(signer: PrivateKeySigner, rpc_url: Url) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(rpc_url.clone())
            .erased();
        let chain_id = provider
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("failed to read chain id from {rpc_url}"))?;
        info!(chain_id, "wallet connected");
        Ok(Self {
            signer,
            rpc_url,
            chain_id,
            provider,
        })
    }

    /// Re-points the signer at `target_rpc`. The current connection is left
    /// unchanged if the new endpoint cannot be reached.
    pub async fn switch_to(&self, target_rpc: Url) -> Result<Self> {
        Self::connect(self.signer.clone(), target_rpc).await
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub fn status(&self) -> WalletStatus {
        WalletStatus {
            address: Some(self.address()),
            chain_id: Some(self.chain_id),
        }
    }

    pub fn submitter(&self, burner: Address) -> RpcBurnSubmitter {
        RpcBurnSubmitter::new(burner, self.provider.clone())
    }
}

/// Parses a hex private key, with or without the `0x` prefix.
pub fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse::<PrivateKeySigner>()
        .wrap_err("invalid private key")
}
