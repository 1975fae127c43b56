use {
    alloy::{
        network::EthereumWallet,
        primitives::Address,
        providers::{DynProvider, Provider, ProviderBuilder},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result, ensure},
    std::fmt::{self, Debug, Formatter},
    url::Url,
};

/// A network resolved from the configuration and the environment.
pub struct Network {
    pub name: String,
    pub url: Url,
    pub signer: PrivateKeySigner,
    pub chain_id: Option<u64>,
}

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("name", &self.name)
            .field("url", &"SECRET")
            .field("signer", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl Network {
    pub fn deployer_address(&self) -> Address {
        self.signer.address()
    }

    /// Creates a provider that signs transactions with the network's key.
    pub fn provider(&self) -> DynProvider {
        ProviderBuilder::new()
            .wallet(EthereumWallet::new(self.signer.clone()))
            .connect_http(self.url.clone())
            .erased()
    }
}

/// Fetches the chain ID from the node and, if one is configured, checks that
/// it is the expected one.
pub async fn verify_chain_id(provider: &DynProvider, expected: Option<u64>) -> Result<u64> {
    let chain_id = provider
        .get_chain_id()
        .await
        .context("could not fetch current chain id")?;
    if let Some(expected) = expected {
        ensure!(
            chain_id == expected,
            "node is on chain {chain_id} but the network is configured for chain {expected}"
        );
    }
    Ok(chain_id)
}
