use crate::nft::{
    GetMethod, InternalMessage, MintParams, MintWindow, NftCollection, NftCollectionConfig,
    SetStartedParams, WithdrawParams,
};
use crate::tvm::{Address, boc_to_base64, deserialize_boc};
use crate::utils::{method_name_to_id, to_nano};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, base64::Base64, serde_as};
use std::path::{Path, PathBuf};

/// ton-nft-collection CLI
#[derive(Parser, Debug)]
#[command(name = "ton-nft-collection")]
#[command(about = "Encode NFT collection deployments and operation messages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive the collection address and build the deploy message
    Deploy {
        /// Deployment file (JSON)
        #[arg(short = 'c', long)]
        config: PathBuf,
        /// Target workchain
        #[arg(short = 'w', long, default_value = "0", allow_hyphen_values = true)]
        workchain: i8,
        /// Attached value in TON
        #[arg(long, default_value = "0.03")]
        value: String,
        /// Print the collection address in test-only form
        #[arg(long)]
        testnet: bool,
    },
    /// Build a mint message
    Mint {
        #[arg(short = 'a', long)]
        collection: Address,
        /// Index of the item to mint
        #[arg(short = 'i', long)]
        index: u64,
        /// Owner of the new item
        #[arg(short = 'o', long)]
        owner: Address,
        /// Item content URL, defaults to "<index>.json"
        #[arg(long)]
        content_url: Option<String>,
        #[arg(short = 'q', long)]
        query_id: Option<u64>,
        /// Attached value in TON
        #[arg(long, default_value = "0.165")]
        value: String,
    },
    /// Build a set-started message opening the mint window
    SetStarted {
        #[arg(short = 'a', long)]
        collection: Address,
        #[arg(long)]
        start_time: u64,
        #[arg(long)]
        public_start_time: u64,
        #[arg(long)]
        end_public_mint_time: u64,
        /// Signed 4-bit started flag
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        started: i8,
        #[arg(short = 'q', long)]
        query_id: Option<u64>,
    },
    /// Build a change-admin message
    ChangeAdmin {
        #[arg(short = 'a', long)]
        collection: Address,
        #[arg(long)]
        new_admin: Address,
        #[arg(short = 'q', long)]
        query_id: Option<u64>,
    },
    /// Build a withdraw message
    Withdraw {
        #[arg(short = 'a', long)]
        collection: Address,
        /// Amount to withdraw in TON
        #[arg(long)]
        amount: String,
        /// Destination of the withdrawn funds
        #[arg(long)]
        to: Address,
        #[arg(short = 'q', long)]
        query_id: Option<u64>,
    },
    /// Build a set-whitelist-address message
    WhitelistAddress {
        #[arg(short = 'a', long)]
        collection: Address,
        /// Address to whitelist
        #[arg(long)]
        address: Address,
        #[arg(short = 'q', long)]
        query_id: Option<u64>,
        /// Attached value in TON
        #[arg(long, default_value = "0.035")]
        value: String,
    },
    /// Print the id of a get-method
    MethodId {
        name: String,
    },
}

/// Collection deployment file
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct DeployFile {
    #[serde_as(as = "DisplayFromStr")]
    pub owner_address: Address,
    #[serde(default)]
    pub next_item_index: u64,
    pub royalty_percent: f64,
    #[serde_as(as = "DisplayFromStr")]
    pub royalty_address: Address,
    pub collection_content_url: String,
    pub common_content_url: String,
    /// Compiled code cells as base64 BoC
    #[serde_as(as = "Base64")]
    pub collection_code: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub nft_item_code: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub whitelist_checker_code: Vec<u8>,
    #[serde(default)]
    pub started: i8,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub public_start_time: u64,
    #[serde(default)]
    pub end_public_mint_time: u64,
}

impl DeployFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid deployment file {}", path.display()))
    }

    pub fn to_config(&self) -> Result<NftCollectionConfig> {
        Ok(NftCollectionConfig {
            owner_address: self.owner_address.clone(),
            next_item_index: self.next_item_index,
            royalty_percent: self.royalty_percent,
            royalty_address: self.royalty_address.clone(),
            collection_content_url: self.collection_content_url.clone(),
            common_content_url: self.common_content_url.clone(),
            nft_item_code: deserialize_boc(&self.nft_item_code).context("nft_item_code")?,
            mint_window: MintWindow {
                started: self.started,
                start_time: self.start_time,
                public_start_time: self.public_start_time,
                end_public_mint_time: self.end_public_mint_time,
            },
            whitelist_checker_code: deserialize_boc(&self.whitelist_checker_code)
                .context("whitelist_checker_code")?,
        })
    }
}

/// Printed form of an [`InternalMessage`]
#[serde_as]
#[derive(Debug, Serialize)]
pub struct MessageOutput {
    #[serde_as(as = "DisplayFromStr")]
    pub destination: Address,
    pub destination_raw: String,
    pub value: String,
    pub send_mode: u8,
    /// Body as base64 BoC
    pub body: String,
    /// StateInit as base64 BoC
    pub state_init: Option<String>,
}

impl MessageOutput {
    pub fn from_message(message: &InternalMessage) -> Result<Self> {
        let state_init = match &message.state_init {
            Some(init) => Some(boc_to_base64(&init.to_cell()?, true)?),
            None => None,
        };
        Ok(Self {
            destination: message.destination.clone(),
            destination_raw: message.destination.to_hex(),
            value: message.value.to_string(),
            send_mode: message.send_mode.0,
            body: boc_to_base64(&message.body, true)?,
            state_init,
        })
    }
}

fn print_message(message: &InternalMessage) -> Result<()> {
    let output = MessageOutput::from_message(message)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Deploy {
                config,
                workchain,
                value,
                testnet,
            } => self.execute_deploy(config, *workchain, value, *testnet),
            Commands::Mint {
                collection,
                index,
                owner,
                content_url,
                query_id,
                value,
            } => {
                let params = MintParams {
                    query_id: *query_id,
                    item_index: *index,
                    item_owner_address: owner.clone(),
                    common_content_url: content_url
                        .clone()
                        .unwrap_or_else(|| format!("{}.json", index)),
                };
                log::info!("Minting item #{} to {}", index, owner);
                let message = NftCollection::from_address(collection.clone())
                    .mint_message(to_nano(value)?, params)?;
                print_message(&message)
            }
            Commands::SetStarted {
                collection,
                start_time,
                public_start_time,
                end_public_mint_time,
                started,
                query_id,
            } => {
                let params = SetStartedParams {
                    query_id: *query_id,
                    window: MintWindow {
                        started: *started,
                        start_time: *start_time,
                        public_start_time: *public_start_time,
                        end_public_mint_time: *end_public_mint_time,
                    },
                };
                let message =
                    NftCollection::from_address(collection.clone()).set_started_message(params)?;
                print_message(&message)
            }
            Commands::ChangeAdmin {
                collection,
                new_admin,
                query_id,
            } => {
                let message = NftCollection::from_address(collection.clone())
                    .change_admin_message(*query_id, new_admin.clone())?;
                print_message(&message)
            }
            Commands::Withdraw {
                collection,
                amount,
                to,
                query_id,
            } => {
                let params = WithdrawParams {
                    query_id: *query_id,
                    amount: to_nano(amount)?,
                    destination: to.clone(),
                };
                let message =
                    NftCollection::from_address(collection.clone()).withdraw_message(params)?;
                print_message(&message)
            }
            Commands::WhitelistAddress {
                collection,
                address,
                query_id,
                value,
            } => {
                let message = NftCollection::from_address(collection.clone())
                    .set_whitelist_address_message(to_nano(value)?, *query_id, address.clone())?;
                print_message(&message)
            }
            Commands::MethodId { name } => {
                match GetMethod::from_name(name) {
                    Some(method) => log::info!("{} is a collection get-method", method.name()),
                    None => log::warn!("{} is not a collection get-method", name),
                }
                println!("{}", method_name_to_id(name));
                Ok(())
            }
        }
    }

    fn execute_deploy(&self, path: &Path, workchain: i8, value: &str, testnet: bool) -> Result<()> {
        let file = DeployFile::load(path)?;
        let mut config = file.to_config()?;
        config.owner_address.is_test_only |= testnet;
        let code = deserialize_boc(&file.collection_code).context("collection_code")?;

        log::info!(
            "Deploying collection owned by {} (next item #{})",
            config.owner_address,
            config.next_item_index
        );
        let collection = NftCollection::from_config(&config, code, workchain)?;
        let message = collection.deploy_message(to_nano(value)?)?;
        print_message(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvm::{Builder, serialize_boc};
    use base64::Engine;

    fn code_b64(marker: u64) -> String {
        let mut builder = Builder::new();
        builder.store_uint(marker, 16).unwrap();
        let bytes = serialize_boc(&builder.end_cell().unwrap(), false).unwrap();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_deploy_file_parsing() {
        let json = format!(
            r#"{{
                "owner_address": "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N",
                "royalty_percent": 0.05,
                "royalty_address": "0QAUGgVrmYWc0sPMsolAT6Z4jjaZ574lEgYj9vCk-X74iqlU",
                "collection_content_url": "ipfs://cid/collection.json",
                "common_content_url": "ipfs://cid/",
                "collection_code": "{}",
                "nft_item_code": "{}",
                "whitelist_checker_code": "{}"
            }}"#,
            code_b64(1),
            code_b64(2),
            code_b64(3)
        );

        let file: DeployFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.next_item_index, 0);
        assert_eq!(file.started, 0);

        let config = file.to_config().unwrap();
        assert!(config.royalty_address.is_test_only);
        let code = deserialize_boc(&file.collection_code).unwrap();
        let collection = NftCollection::from_config(&config, code, 0).unwrap();
        let output = MessageOutput::from_message(&collection.deploy_message(30_000_000).unwrap()).unwrap();
        assert_eq!(output.send_mode, 1);
        assert_eq!(output.value, "30000000");
        assert!(output.state_init.is_some());
    }

    #[test]
    fn test_cli_parses_deploy_testnet() {
        let cli = Cli::try_parse_from([
            "ton-nft-collection",
            "deploy",
            "-c",
            "deploy.json",
            "--testnet",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Deploy {
                testnet: true,
                workchain: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_parses_mint() {
        let cli = Cli::try_parse_from([
            "ton-nft-collection",
            "mint",
            "-a",
            "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N",
            "-i",
            "7",
            "-o",
            "0:0000000000000000000000000000000000000000000000000000000000000000",
        ])
        .unwrap();
        match cli.command {
            Commands::Mint {
                index,
                query_id,
                value,
                ..
            } => {
                assert_eq!(index, 7);
                assert_eq!(query_id, None);
                assert_eq!(value, "0.165");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_set_started_default_flag() {
        let cli = Cli::try_parse_from([
            "ton-nft-collection",
            "set-started",
            "-a",
            "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N",
            "--start-time",
            "0",
            "--public-start-time",
            "259200",
            "--end-public-mint-time",
            "518400",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::SetStarted { started: -1, .. }));
    }
}
