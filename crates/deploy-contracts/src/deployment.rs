use {
    crate::artifact::Artifact,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        network::{ReceiptResponse, TransactionBuilder},
        primitives::{Address, B256, Bytes, TxHash, U256, address, b256},
        providers::{DynProvider, Provider},
        rpc::types::{TransactionReceipt, TransactionRequest},
    },
    anyhow::{Context, Result, ensure},
    std::time::Duration,
};

pub const AIRDROP: &str = "Airdrop";

/// Sepolia VRF coordinator.
pub const VRF_COORDINATOR: Address = address!("0x8103b0a8a00be2ddc778e6e7eaa21791cd364625");
/// Sepolia LINK token.
pub const LINK_TOKEN: Address = address!("0x779877a7b0d9e8603169ddbd7836e478b4624789");
/// Gas lane of the VRF coordinator.
pub const KEY_HASH: B256 =
    b256!("0x474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c");
pub const FEE: U256 = U256::from_limbs([3, 0, 0, 0]);
pub const AIRDROP_TOKEN: Address = address!("0x779877a7b0d9e8603169ddbd7836e478b4624789");
pub const OWNER: Address = address!("0x19a14D73e298Fc0E7b9b039Fda0d85eDbb1b460A");

/// Arguments of the `Airdrop` constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorArgs {
    pub vrf_coordinator: Address,
    pub link_token: Address,
    pub key_hash: B256,
    pub fee: U256,
    pub token: Address,
    pub owner: Address,
}

impl ConstructorArgs {
    pub fn airdrop() -> Self {
        Self {
            vrf_coordinator: VRF_COORDINATOR,
            link_token: LINK_TOKEN,
            key_hash: KEY_HASH,
            fee: FEE,
            token: AIRDROP_TOKEN,
            owner: OWNER,
        }
    }

    /// The arguments in constructor order.
    pub fn values(&self) -> [DynSolValue; 6] {
        [
            DynSolValue::Address(self.vrf_coordinator),
            DynSolValue::Address(self.link_token),
            DynSolValue::FixedBytes(self.key_hash, 32),
            DynSolValue::Uint(self.fee, 256),
            DynSolValue::Address(self.token),
            DynSolValue::Address(self.owner),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub contract: String,
    pub args: ConstructorArgs,
}

impl DeploymentRequest {
    pub fn airdrop() -> Self {
        Self {
            contract: AIRDROP.to_string(),
            args: ConstructorArgs::airdrop(),
        }
    }

    /// The input of the contract creation transaction: the artifact's
    /// bytecode followed by the ABI encoded constructor arguments.
    pub fn creation_code(&self, artifact: &Artifact) -> Result<Bytes> {
        ensure!(
            artifact.contract_name == self.contract,
            "artifact is for contract {} but {} is being deployed",
            artifact.contract_name,
            self.contract
        );
        let constructor = artifact
            .abi
            .constructor()
            .with_context(|| format!("{} has no constructor taking arguments", self.contract))?;
        let args = constructor
            .abi_encode_input(&self.args.values())
            .with_context(|| format!("arguments do not match the {} constructor", self.contract))?;
        Ok([artifact.bytecode.as_ref(), &args[..]].concat().into())
    }
}

/// A confirmed contract deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Submits contract creation transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Sends a transaction creating a contract from `code` and waits for it
    /// to be confirmed.
    async fn deploy(&self, code: Bytes) -> Result<Deployment>;
}

pub struct OnchainDeployer {
    provider: DynProvider,
    from: Address,
    confirmations: u64,
    timeout: Duration,
}

impl OnchainDeployer {
    pub fn new(provider: DynProvider, from: Address, confirmations: u64, timeout: Duration) -> Self {
        Self {
            provider,
            from,
            confirmations,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Deployer for OnchainDeployer {
    async fn deploy(&self, code: Bytes) -> Result<Deployment> {
        let tx = TransactionRequest::default()
            .from(self.from)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to submit deployment transaction")?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(?tx_hash, "submitted deployment transaction");

        // Failing past this point leaves the transaction in the mempool.
        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.timeout))
            .get_receipt()
            .await
            .with_context(|| {
                format!("deployment transaction {tx_hash} was not confirmed, its status is unknown")
            })?;
        into_deployment(tx_hash, &receipt)
    }
}

/// Checks that the receipt of a creation transaction describes a successful
/// deployment.
fn into_deployment(tx_hash: TxHash, receipt: &TransactionReceipt) -> Result<Deployment> {
    ensure!(receipt.status(), "deployment transaction {tx_hash} reverted");
    let address = receipt
        .contract_address
        .with_context(|| format!("receipt of {tx_hash} has no contract address"))?;
    Ok(Deployment {
        address,
        transaction_hash: tx_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}

/// Deploys the requested contract from its compiled artifact.
pub async fn deploy(
    deployer: &dyn Deployer,
    artifact: &Artifact,
    request: &DeploymentRequest,
) -> Result<Deployment> {
    let code = request.creation_code(artifact)?;
    tracing::debug!(contract = %request.contract, size = code.len(), "deploying contract");
    let deployment = deployer
        .deploy(code)
        .await
        .with_context(|| format!("failed to deploy {}", request.contract))?;
    tracing::info!(
        contract = %request.contract,
        address = %deployment.address,
        tx_hash = ?deployment.transaction_hash,
        block = ?deployment.block_number,
        gas_used = deployment.gas_used,
        "contract deployed"
    );
    Ok(deployment)
}
