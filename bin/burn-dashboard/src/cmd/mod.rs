pub mod burn;
pub mod export;
pub mod history;
pub mod status;
pub mod watch;

use alloy::providers::{Provider, ProviderBuilder};
use clap::ValueEnum;
use eyre::Result;
use tracing::warn;

use crate::{
    config::Settings,
    contract::RpcBurner,
    opts::WalletArgs,
    price::{DexPriceSource, PricePoller},
    wallet::{WalletConnection, parse_private_key},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Read-only client for the configured burner.
pub fn reader(settings: &Settings) -> RpcBurner {
    let provider = ProviderBuilder::new()
        .connect_http(settings.rpc_url.clone())
        .erased();
    RpcBurner::new(settings.burner, provider)
}

/// Connects the wallet if a key was given.
pub async fn wallet(settings: &Settings, args: &WalletArgs) -> Result<Option<WalletConnection>> {
    let Some(key) = &args.private_key else {
        return Ok(None);
    };
    let signer = parse_private_key(key)?;
    let connection = WalletConnection::connect(signer, settings.wallet_rpc_url.clone()).await?;
    if connection.chain_id() != settings.chain_id {
        warn!(
            wallet_chain = connection.chain_id(),
            target_chain = settings.chain_id,
            "wallet is connected to a different chain"
        );
    }
    Ok(Some(connection))
}

/// Price poller for the configured token, `None` without a token address.
pub fn price_poller(settings: &Settings) -> Result<Option<PricePoller<DexPriceSource>>> {
    let Some(token) = settings.token else {
        warn!("no token address configured, USD values are disabled");
        return Ok(None);
    };
    let source = DexPriceSource::new(&settings.price_endpoint, token)?;
    Ok(Some(PricePoller::new(source)))
}
