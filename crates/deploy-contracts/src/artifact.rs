//! Compiled contract artifacts as written by the Solidity build (Hardhat
//! layout).

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    anyhow::{Context, Result, anyhow, ensure},
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

/// Marker of an unresolved library address in unlinked bytecode.
const LINK_PLACEHOLDER: &str = "__$";

#[derive(Clone, Debug)]
pub struct Artifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
    /// Version of solc that produced the artifact, when the build recorded
    /// it.
    pub solc_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    contract_name: String,
    abi: JsonAbi,
    bytecode: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfoFile {
    solc_version: String,
}

/// Path of a contract's artifact inside the artifacts directory, assuming the
/// contract lives in a source file of the same name.
pub fn path(artifacts: &Path, contract_name: &str) -> PathBuf {
    artifacts
        .join("contracts")
        .join(format!("{contract_name}.sol"))
        .join(format!("{contract_name}.json"))
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("could not read artifact {path:?}, is the contract compiled?"))?;
        let file: ArtifactFile = serde_json::from_str(&data)
            .with_context(|| format!("malformed artifact {path:?}"))?;

        ensure!(
            !file.bytecode.contains(LINK_PLACEHOLDER),
            "contract {} needs to be linked against libraries before it can be deployed",
            file.contract_name
        );
        let bytecode = file
            .bytecode
            .parse::<Bytes>()
            .map_err(|err| anyhow!("invalid bytecode in {path:?}: {err}"))?;
        ensure!(
            !bytecode.is_empty(),
            "contract {} has no bytecode, it is abstract or an interface",
            file.contract_name
        );

        let solc_version = solc_version(path)
            .inspect_err(|err| tracing::debug!(?err, "no compiler version recorded"))
            .ok();

        Ok(Self {
            contract_name: file.contract_name,
            abi: file.abi,
            bytecode,
            solc_version,
        })
    }

    /// Checks that the artifact was built by the expected compiler version.
    pub fn check_compiler(&self, expected: &str) -> Result<()> {
        match &self.solc_version {
            Some(version) => ensure!(
                version == expected,
                "{} was compiled with solc {version} but solc {expected} is configured",
                self.contract_name
            ),
            None => tracing::warn!(
                contract = %self.contract_name,
                expected,
                "unable to verify the compiler version of the artifact"
            ),
        }
        Ok(())
    }
}

/// Reads the compiler version from the build info referenced by the debug
/// file next to the artifact.
fn solc_version(artifact: &Path) -> Result<String> {
    let dbg = artifact.with_extension("dbg.json");
    let dir = dbg.parent().context("artifact has no parent directory")?;
    let file: DebugFile = serde_json::from_str(&std::fs::read_to_string(&dbg)?)?;
    let build_info: BuildInfoFile =
        serde_json::from_str(&std::fs::read_to_string(dir.join(file.build_info))?)?;
    Ok(build_info.solc_version)
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, serde_json::json};

    pub fn airdrop_abi() -> serde_json::Value {
        json!([
            {
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    { "name": "vrfCoordinator", "type": "address", "internalType": "address" },
                    { "name": "link", "type": "address", "internalType": "address" },
                    { "name": "keyHash", "type": "bytes32", "internalType": "bytes32" },
                    { "name": "fee", "type": "uint256", "internalType": "uint256" },
                    { "name": "token", "type": "address", "internalType": "address" },
                    { "name": "owner", "type": "address", "internalType": "address" }
                ]
            }
        ])
    }

    /// Writes a Hardhat style artifact for `Airdrop` into `dir` and returns
    /// its path.
    pub fn write_artifact(dir: &Path, bytecode: &str, solc_version: Option<&str>) -> PathBuf {
        let path = path(dir, "Airdrop");
        let contract_dir = path.parent().unwrap();
        std::fs::create_dir_all(contract_dir).unwrap();
        std::fs::write(
            &path,
            json!({
                "_format": "hh-sol-artifact-1",
                "contractName": "Airdrop",
                "sourceName": "contracts/Airdrop.sol",
                "abi": airdrop_abi(),
                "bytecode": bytecode,
                "deployedBytecode": "0x",
                "linkReferences": {},
                "deployedLinkReferences": {}
            })
            .to_string(),
        )
        .unwrap();

        if let Some(version) = solc_version {
            let build_info = dir.join("build-info");
            std::fs::create_dir_all(&build_info).unwrap();
            std::fs::write(
                build_info.join("0123.json"),
                json!({ "_format": "hh-sol-build-info-1", "solcVersion": version }).to_string(),
            )
            .unwrap();
            std::fs::write(
                path.with_extension("dbg.json"),
                json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/0123.json" })
                    .to_string(),
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn hardhat_layout() {
        assert_eq!(
            path(Path::new("artifacts"), "Airdrop"),
            PathBuf::from("artifacts/contracts/Airdrop.sol/Airdrop.json")
        );
    }

    #[test]
    fn loads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "0x60006000f3", Some("0.8.19"));

        let artifact = Artifact::load(&path).unwrap();
        assert_eq!(artifact.contract_name, "Airdrop");
        assert_eq!(artifact.bytecode.as_ref(), [0x60, 0x00, 0x60, 0x00, 0xf3]);
        assert_eq!(artifact.abi.constructor().unwrap().inputs.len(), 6);
        assert_eq!(artifact.solc_version.as_deref(), Some("0.8.19"));
        artifact.check_compiler("0.8.19").unwrap();
        assert!(artifact.check_compiler("0.8.20").is_err());
    }

    #[test]
    fn compiler_version_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "0x60006000f3", None);

        let artifact = Artifact::load(&path).unwrap();
        assert_eq!(artifact.solc_version, None);
        artifact.check_compiler("0.8.19").unwrap();
    }

    #[test]
    fn rejects_unlinked_bytecode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            dir.path(),
            "0x6080__$4f1c6f4a3b0e8c1b7d1c0b5e2f3a4b5c6d$__6000",
            None,
        );
        let err = Artifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("linked"));
    }

    #[test]
    fn rejects_empty_bytecode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "0x", None);
        assert!(Artifact::load(&path).is_err());
    }

    #[test]
    fn missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::load(&path(dir.path(), "Airdrop")).unwrap_err();
        assert!(err.to_string().contains("compiled"));
    }
}
