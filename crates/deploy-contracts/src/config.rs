//! Deployment configuration: the compiler version the contracts are built
//! with and the networks they can be deployed to.

use {
    crate::network::Network,
    alloy::signers::local::PrivateKeySigner,
    anyhow::{Context, Result, anyhow},
    serde::Deserialize,
    std::{collections::BTreeMap, path::Path},
    url::Url,
};

pub const DEFAULT_SOLIDITY_VERSION: &str = "0.8.19";
pub const DEFAULT_NETWORK: &str = "sepolia";
pub const DEFAULT_PATH: &str = "deploy.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Version of the Solidity compiler the contract artifacts must have
    /// been built with.
    #[serde(default = "default_solidity_version")]
    pub solidity: String,

    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NetworkConfig {
    /// Environment variable holding the RPC endpoint URL.
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Environment variable holding the hex encoded private key used to sign
    /// the deployment.
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,

    /// Optionally specify the chain ID the network is expected to have. The
    /// deployment is aborted when the node reports a different one.
    pub chain_id: Option<u64>,
}

fn default_solidity_version() -> String {
    DEFAULT_SOLIDITY_VERSION.to_string()
}

fn default_url_env() -> String {
    "API_URL".to_string()
}

fn default_private_key_env() -> String {
    "PRIVATE_KEY".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solidity: default_solidity_version(),
            networks: BTreeMap::from([(DEFAULT_NETWORK.to_string(), NetworkConfig::default())]),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            private_key_env: default_private_key_env(),
            chain_id: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file. Without an explicit `path`
    /// [`DEFAULT_PATH`] is read, falling back to the built-in default if that
    /// file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None if Path::new(DEFAULT_PATH).exists() => Self::read(Path::new(DEFAULT_PATH)),
            None => {
                tracing::debug!("no config file, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        Self::parse(&data).with_context(|| format!("invalid config file {path:?}"))
    }

    pub fn parse(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|err| anyhow!("TOML error: {}", err.message()))
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks.get(name).with_context(|| {
            let known = self
                .networks
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!("unknown network {name:?}, configured networks: [{known}]")
        })
    }
}

impl NetworkConfig {
    /// Resolves the endpoint and signing key of the network from the
    /// environment using `lookup`.
    pub fn resolve(&self, name: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Network> {
        let url = lookup(&self.url_env)
            .with_context(|| format!("environment variable {} is not set", self.url_env))?;
        let url = Url::parse(url.trim())
            .with_context(|| format!("environment variable {} is not a valid URL", self.url_env))?;

        let private_key = lookup(&self.private_key_env).with_context(|| {
            format!("environment variable {} is not set", self.private_key_env)
        })?;
        // Never surface the parse error, it can echo parts of the key.
        let signer = private_key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|_| {
                anyhow!(
                    "environment variable {} is not a valid private key",
                    self.private_key_env
                )
            })?;

        Ok(Network {
            name: name.to_string(),
            url,
            signer,
            chain_id: self.chain_id,
        })
    }
}
