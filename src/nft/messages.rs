//! Operation message bodies
//!
//! Every body except deploy starts with `op:uint32 query_id:uint64`. A missing
//! query id is encoded as zero, but kept as `None` in the parameter records.

use crate::nft::config::MintWindow;
use crate::nft::constants::{
    OP_CHANGE_ADMIN, OP_MINT, OP_SET_STARTED, OP_SET_WHITELIST_ADDRESS, OP_WITHDRAW,
};
use crate::nft::content::make_snake_cell;
use crate::tvm::{Address, Builder, Cell, CellResult};
use std::sync::Arc;

/// Caller-supplied correlation number
pub type QueryId = u64;

/// Parameters of the mint operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub query_id: Option<QueryId>,
    pub item_index: u64,
    pub item_owner_address: Address,
    /// Item content URL, relative to the collection's common content
    pub common_content_url: String,
}

/// Parameters of the set-started operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStartedParams {
    pub query_id: Option<QueryId>,
    pub window: MintWindow,
}

/// Parameters of the withdraw operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawParams {
    pub query_id: Option<QueryId>,
    /// Amount in nanotons
    pub amount: u128,
    pub destination: Address,
}

/// A message the collection contract understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionMessage {
    /// Empty body, sent together with the StateInit
    Deploy,
    SetStarted(SetStartedParams),
    Mint(MintParams),
    ChangeAdmin {
        query_id: Option<QueryId>,
        new_admin: Address,
    },
    Withdraw(WithdrawParams),
    SetWhitelistAddress {
        query_id: Option<QueryId>,
        address: Address,
    },
}

impl CollectionMessage {
    /// Operation code, `None` for the empty deploy body
    pub fn op(&self) -> Option<u32> {
        match self {
            CollectionMessage::Deploy => None,
            CollectionMessage::SetStarted(_) => Some(OP_SET_STARTED),
            CollectionMessage::Mint(_) => Some(OP_MINT),
            CollectionMessage::ChangeAdmin { .. } => Some(OP_CHANGE_ADMIN),
            CollectionMessage::Withdraw(_) => Some(OP_WITHDRAW),
            CollectionMessage::SetWhitelistAddress { .. } => Some(OP_SET_WHITELIST_ADDRESS),
        }
    }

    fn query_id(&self) -> Option<QueryId> {
        match self {
            CollectionMessage::Deploy => None,
            CollectionMessage::SetStarted(params) => params.query_id,
            CollectionMessage::Mint(params) => params.query_id,
            CollectionMessage::ChangeAdmin { query_id, .. } => *query_id,
            CollectionMessage::Withdraw(params) => params.query_id,
            CollectionMessage::SetWhitelistAddress { query_id, .. } => *query_id,
        }
    }

    /// Encodes the message body
    pub fn to_cell(&self) -> CellResult<Arc<Cell>> {
        let mut body = Builder::new();

        if let Some(op) = self.op() {
            body.store_uint(op as u64, 32)?;
            body.store_uint(self.query_id().unwrap_or(0), 64)?;
        }

        match self {
            CollectionMessage::Deploy => {}
            CollectionMessage::SetStarted(params) => {
                params.window.store(&mut body)?;
            }
            CollectionMessage::Mint(params) => {
                body.store_uint(params.item_index, 64)?;
                body.store_ref(mint_item_content(params)?)?;
            }
            CollectionMessage::ChangeAdmin { new_admin, .. } => {
                body.store_address(Some(new_admin))?;
            }
            CollectionMessage::Withdraw(params) => {
                body.store_coins(params.amount)?;
                body.store_address(Some(&params.destination))?;
            }
            CollectionMessage::SetWhitelistAddress { address, .. } => {
                body.store_address(Some(address))?;
            }
        }

        log::debug!("Encoded message body op={:?}", self.op());
        body.end_cell()
    }
}

/// Item init content: owner address and a reference to the item URL
fn mint_item_content(params: &MintParams) -> CellResult<Arc<Cell>> {
    let mut content = Builder::new();
    content.store_address(Some(&params.item_owner_address))?;
    content.store_ref(make_snake_cell(params.common_content_url.as_bytes())?)?;
    content.end_cell()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvm::Slice;

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    #[test]
    fn test_deploy_body_is_empty() {
        let cell = CollectionMessage::Deploy.to_cell().unwrap();
        assert_eq!(cell.bit_len(), 0);
        assert_eq!(cell.reference_count(), 0);
    }

    #[test]
    fn test_set_started_layout() {
        let message = CollectionMessage::SetStarted(SetStartedParams {
            query_id: None,
            window: MintWindow::started_now(0, 259_200, 518_400),
        });
        let mut slice = Slice::new(message.to_cell().unwrap());
        assert_eq!(slice.load_uint(32).unwrap(), 4);
        assert_eq!(slice.load_uint(64).unwrap(), 0);
        assert_eq!(slice.load_int(4).unwrap(), -1);
        assert_eq!(slice.load_uint(64).unwrap(), 0);
        assert_eq!(slice.load_uint(64).unwrap(), 259_200);
        assert_eq!(slice.load_uint(64).unwrap(), 518_400);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_change_admin_layout() {
        let message = CollectionMessage::ChangeAdmin {
            query_id: Some(9),
            new_admin: addr(0x33),
        };
        let mut slice = Slice::new(message.to_cell().unwrap());
        assert_eq!(slice.load_uint(32).unwrap(), 3);
        assert_eq!(slice.load_uint(64).unwrap(), 9);
        assert_eq!(slice.load_address().unwrap(), Some(addr(0x33)));
        assert!(slice.is_empty());
    }

    #[test]
    fn test_withdraw_layout() {
        let message = CollectionMessage::Withdraw(WithdrawParams {
            query_id: None,
            amount: 1_500_000_000,
            destination: addr(0x44),
        });
        let mut slice = Slice::new(message.to_cell().unwrap());
        assert_eq!(slice.load_uint(32).unwrap(), 5);
        assert_eq!(slice.load_uint(64).unwrap(), 0);
        assert_eq!(slice.load_coins().unwrap(), 1_500_000_000);
        assert_eq!(slice.load_address().unwrap(), Some(addr(0x44)));
        assert!(slice.is_empty());
    }

    #[test]
    fn test_set_whitelist_address_layout() {
        let message = CollectionMessage::SetWhitelistAddress {
            query_id: None,
            address: addr(0x55),
        };
        let mut slice = Slice::new(message.to_cell().unwrap());
        assert_eq!(slice.load_uint(32).unwrap(), 7);
        assert_eq!(slice.load_uint(64).unwrap(), 0);
        assert_eq!(slice.load_address().unwrap(), Some(addr(0x55)));
    }

    #[test]
    fn test_explicit_zero_query_id_encodes_like_none() {
        let with_none = CollectionMessage::ChangeAdmin {
            query_id: None,
            new_admin: addr(1),
        };
        let with_zero = CollectionMessage::ChangeAdmin {
            query_id: Some(0),
            new_admin: addr(1),
        };
        assert_ne!(with_none, with_zero);
        assert_eq!(
            with_none.to_cell().unwrap().hash(),
            with_zero.to_cell().unwrap().hash()
        );
    }
}
