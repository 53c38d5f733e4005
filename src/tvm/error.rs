use thiserror::Error;

/// Errors raised while building or reading cells
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    #[error("cell overflow: storing {requested} bits on top of {current} exceeds {max}")]
    BitOverflow {
        current: usize,
        requested: usize,
        max: usize,
    },
    #[error("cell overflow: maximum {max} references allowed")]
    RefOverflow { max: usize },
    #[error("cell overflow: tree depth exceeds {max}")]
    DepthOverflow { max: u16 },
    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: i128, bits: usize },
    #[error("bit width {0} exceeds 64")]
    InvalidWidth(usize),
    #[error("insufficient data for {bits} bits")]
    InsufficientData { bits: usize },
    #[error("cell underflow: requested {requested}, available {available}")]
    Underflow { requested: usize, available: usize },
    #[error("unsupported address tag {0:#04b}")]
    UnsupportedAddressTag(u8),
}

pub type CellResult<T> = Result<T, CellError>;
