//! Collection contract wrapper
//!
//! Pairs a collection address with the messages it accepts. Sending is left
//! to a transport: each operation yields an [`InternalMessage`] envelope.

use crate::nft::config::NftCollectionConfig;
use crate::nft::constants::ADMIN_MESSAGE_VALUE;
use crate::nft::messages::{CollectionMessage, MintParams, QueryId, SetStartedParams, WithdrawParams};
use crate::tvm::{Address, Cell, CellResult, StateInit};
use std::sync::Arc;

/// Outbound message send mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendMode(pub u8);

impl SendMode {
    pub const PAY_GAS_SEPARATELY: SendMode = SendMode(1);
}

/// An internal message ready to be handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalMessage {
    pub destination: Address,
    /// Attached value in nanotons
    pub value: u128,
    pub send_mode: SendMode,
    pub body: Arc<Cell>,
    pub state_init: Option<StateInit>,
}

/// The NFT collection contract
#[derive(Debug, Clone)]
pub struct NftCollection {
    pub address: Address,
    pub init: Option<StateInit>,
}

impl NftCollection {
    /// Wraps an already deployed collection
    pub fn from_address(address: Address) -> Self {
        Self {
            address,
            init: None,
        }
    }

    /// Derives the collection address from its configuration and code
    ///
    /// The address is formatted for the same network as the owner's.
    pub fn from_config(config: &NftCollectionConfig, code: Arc<Cell>, workchain: i8) -> CellResult<Self> {
        let init = StateInit::new(code, config.to_cell()?);
        let mut address = init.address(workchain)?;
        address.is_test_only = config.owner_address.is_test_only;
        log::info!("Collection address: {}", address);
        Ok(Self {
            address,
            init: Some(init),
        })
    }

    fn message(&self, value: u128, message: &CollectionMessage) -> CellResult<InternalMessage> {
        let state_init = match message {
            CollectionMessage::Deploy => self.init.clone(),
            _ => None,
        };
        Ok(InternalMessage {
            destination: self.address.clone(),
            value,
            send_mode: SendMode::PAY_GAS_SEPARATELY,
            body: message.to_cell()?,
            state_init,
        })
    }

    /// Deploy message carrying the StateInit, if known
    pub fn deploy_message(&self, value: u128) -> CellResult<InternalMessage> {
        if self.init.is_none() {
            log::warn!("Deploying {} without a StateInit", self.address);
        }
        self.message(value, &CollectionMessage::Deploy)
    }

    /// Opens or updates the mint window
    pub fn set_started_message(&self, params: SetStartedParams) -> CellResult<InternalMessage> {
        self.message(ADMIN_MESSAGE_VALUE, &CollectionMessage::SetStarted(params))
    }

    /// Mints item `params.item_index` to `params.item_owner_address`
    pub fn mint_message(&self, value: u128, params: MintParams) -> CellResult<InternalMessage> {
        self.message(value, &CollectionMessage::Mint(params))
    }

    pub fn change_admin_message(&self, query_id: Option<QueryId>, new_admin: Address) -> CellResult<InternalMessage> {
        self.message(
            ADMIN_MESSAGE_VALUE,
            &CollectionMessage::ChangeAdmin {
                query_id,
                new_admin,
            },
        )
    }

    pub fn withdraw_message(&self, params: WithdrawParams) -> CellResult<InternalMessage> {
        self.message(ADMIN_MESSAGE_VALUE, &CollectionMessage::Withdraw(params))
    }

    pub fn set_whitelist_address_message(
        &self,
        value: u128,
        query_id: Option<QueryId>,
        address: Address,
    ) -> CellResult<InternalMessage> {
        self.message(
            value,
            &CollectionMessage::SetWhitelistAddress { query_id, address },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nft::config::MintWindow;

    #[test]
    fn test_from_address_has_no_init() {
        let collection = NftCollection::from_address(Address::new(0, [7; 32]));
        let message = collection.deploy_message(30_000_000).unwrap();
        assert!(message.state_init.is_none());
        assert_eq!(message.send_mode, SendMode::PAY_GAS_SEPARATELY);
        assert_eq!(message.value, 30_000_000);
    }

    #[test]
    fn test_admin_messages_carry_fixed_value() {
        let collection = NftCollection::from_address(Address::new(0, [7; 32]));
        let started = collection
            .set_started_message(SetStartedParams {
                query_id: None,
                window: MintWindow::started_now(1, 2, 3),
            })
            .unwrap();
        let admin = collection
            .change_admin_message(None, Address::new(0, [8; 32]))
            .unwrap();
        let withdraw = collection
            .withdraw_message(WithdrawParams {
                query_id: None,
                amount: 1,
                destination: Address::new(0, [9; 32]),
            })
            .unwrap();

        for message in [started, admin, withdraw] {
            assert_eq!(message.value, ADMIN_MESSAGE_VALUE);
            assert_eq!(message.destination, collection.address);
            assert!(message.state_init.is_none());
        }
    }

    #[test]
    fn test_derived_address_follows_owner_network() {
        let mut config = NftCollectionConfig {
            owner_address: Address::new(0, [1; 32]),
            next_item_index: 0,
            royalty_percent: 0.05,
            royalty_address: Address::new(0, [2; 32]),
            collection_content_url: "https://a.b/c.json".to_string(),
            common_content_url: "https://a.b/".to_string(),
            nft_item_code: Arc::new(Cell::empty()),
            mint_window: MintWindow::closed(),
            whitelist_checker_code: Arc::new(Cell::empty()),
        };
        let mainnet = NftCollection::from_config(&config, Arc::new(Cell::empty()), 0).unwrap();
        assert!(mainnet.address.to_string().starts_with("EQ"));

        config.owner_address.is_test_only = true;
        let testnet = NftCollection::from_config(&config, Arc::new(Cell::empty()), 0).unwrap();
        assert!(testnet.address.is_test_only);
        assert!(testnet.address.to_string().starts_with("kQ"));
        assert_eq!(testnet.address, mainnet.address);
    }

    #[test]
    fn test_whitelist_message_uses_caller_value() {
        let collection = NftCollection::from_address(Address::new(0, [7; 32]));
        let message = collection
            .set_whitelist_address_message(35_000_000, None, Address::new(0, [1; 32]))
            .unwrap();
        assert_eq!(message.value, 35_000_000);
    }
}
