//! Get-methods exposed by the collection contract
//!
//! Only identifiers and argument encoding live here; running the method and
//! reading its stack belong to the client.

use crate::tvm::{Address, Builder, Cell, CellResult};
use crate::utils::method_name_to_id;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMethod {
    /// `(index:int) -> address`
    NftAddressByIndex,
    /// `() -> (started, start_time, public_start_time, end_public_mint_time, time_now)`
    ContractTimeStatus,
    /// `() -> (next_item_index, ...)`
    CollectionData,
    /// `(owner:slice) -> address`
    WhitelistCheckerAddress,
}

impl GetMethod {
    pub const ALL: [GetMethod; 4] = [
        GetMethod::NftAddressByIndex,
        GetMethod::ContractTimeStatus,
        GetMethod::CollectionData,
        GetMethod::WhitelistCheckerAddress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GetMethod::NftAddressByIndex => "get_nft_address_by_index",
            GetMethod::ContractTimeStatus => "get_contract_time_status",
            GetMethod::CollectionData => "get_collection_data",
            GetMethod::WhitelistCheckerAddress => "get_whitelist_checker_address",
        }
    }

    pub fn id(&self) -> u32 {
        method_name_to_id(self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }
}

/// Slice argument for [`GetMethod::WhitelistCheckerAddress`]
pub fn whitelist_checker_argument(owner: &Address) -> CellResult<Arc<Cell>> {
    let mut builder = Builder::new();
    builder.store_address(Some(owner))?;
    builder.end_cell()
}
