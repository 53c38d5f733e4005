//! StateInit and contract address derivation
//!
//! A contract's address is the representation hash of its initial
//! `StateInit` cell, placed in the target workchain. Changing a single bit
//! of the code or data cell therefore changes the address.

use crate::tvm::address::Address;
use crate::tvm::builder::Builder;
use crate::tvm::cell::Cell;
use crate::tvm::error::CellResult;
use std::sync::Arc;

/// Initial code and data of a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: Arc<Cell>,
    pub data: Arc<Cell>,
}

impl StateInit {
    pub fn new(code: Arc<Cell>, data: Arc<Cell>) -> Self {
        Self { code, data }
    }

    /// Encodes `split_depth:(Maybe) special:(Maybe) code:(Maybe ^Cell)
    /// data:(Maybe ^Cell) library:(HashmapE 256)`
    pub fn to_cell(&self) -> CellResult<Arc<Cell>> {
        let mut builder = Builder::new();
        builder.store_bit(false)?;
        builder.store_bit(false)?;
        builder.store_bit(true)?;
        builder.store_ref(self.code.clone())?;
        builder.store_bit(true)?;
        builder.store_ref(self.data.clone())?;
        builder.store_bit(false)?;
        builder.end_cell()
    }

    /// Derives the contract address in `workchain`
    pub fn address(&self, workchain: i8) -> CellResult<Address> {
        let hash = self.to_cell()?.hash();
        let address = Address::new(workchain, hash);
        log::debug!("Derived contract address {}", address.to_hex());
        Ok(address)
    }
}
