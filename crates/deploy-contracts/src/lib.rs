pub mod arguments;
pub mod artifact;
pub mod config;
pub mod deployment;
pub mod network;

use {
    anyhow::Result,
    arguments::Arguments,
    artifact::Artifact,
    clap::Parser,
    config::Config,
    deployment::{Deployment, DeploymentRequest, OnchainDeployer},
};

/// Runs the deployer and terminates the process with a non-zero exit code if
/// the deployment fails. On success the address of the deployed contract is
/// the only thing written to stdout.
pub async fn start(args: impl Iterator<Item = String>) {
    // Variables from `.env` act as defaults for the arguments as well.
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => {
            eprintln!("Error: failed to load .env file: {err}");
            std::process::exit(1);
        }
        _ => (),
    }
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&observe::Config::new(&args.log_filter, args.use_json_logs));
    tracing::info!("running deploy-contracts with validated arguments:\n{}", args);

    match run(args).await {
        Ok(deployment) => println!("{}", deployment.address),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

pub async fn run(args: Arguments) -> Result<Deployment> {
    let config = Config::load(args.config.as_deref())?;
    let network = config
        .network(&args.network)?
        .resolve(&args.network, |name| std::env::var(name).ok())?;

    let request = DeploymentRequest::airdrop();
    let artifact_path = args
        .artifact
        .unwrap_or_else(|| artifact::path(&args.artifacts, &request.contract));
    let artifact = Artifact::load(&artifact_path)?;
    artifact.check_compiler(&config.solidity)?;

    let provider = network.provider();
    let chain_id = network::verify_chain_id(&provider, network.chain_id).await?;
    tracing::info!(
        network = %network.name,
        chain_id,
        deployer = %network.deployer_address(),
        "connected to node"
    );

    let deployer = OnchainDeployer::new(
        provider,
        network.deployer_address(),
        args.confirmations,
        args.confirmation_timeout,
    );
    deployment::deploy(&deployer, &artifact, &request).await
}

#[cfg(test)]
mod tests {
    use {super::*, std::path::Path};

    fn arguments(config: &Path, network: &str) -> Arguments {
        Arguments::try_parse_from([
            "deploy-contracts",
            "--config",
            config.to_str().unwrap(),
            "--network",
            network,
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn fails_without_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("deploy.toml");
        std::fs::write(
            &config,
            "[networks.test]\nurl-env = \"DEPLOY_CONTRACTS_TEST_UNSET_URL\"\n",
        )
        .unwrap();

        let err = run(arguments(&config, "test")).await.unwrap_err();
        assert!(err.to_string().contains("DEPLOY_CONTRACTS_TEST_UNSET_URL"));
    }

    #[tokio::test]
    async fn fails_on_unknown_network() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("deploy.toml");
        std::fs::write(&config, "[networks.sepolia]\n").unwrap();
        let err = run(arguments(&config, "mainnet")).await.unwrap_err();
        assert!(err.to_string().contains("mainnet"));
    }

    #[tokio::test]
    async fn fails_on_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(arguments(&dir.path().join("typo.toml"), "sepolia"))
            .await
            .unwrap_err();
        assert!(format!("{err:?}").contains("typo.toml"));
    }

    #[tokio::test]
    async fn fails_on_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("deploy.toml");
        std::fs::write(&config, "solidity = 19").unwrap();
        assert!(run(arguments(&config, "sepolia")).await.is_err());
    }
}
