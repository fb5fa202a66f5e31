//! Generic metadata template header.
//!
//! Prepended before the laid-out fields of every template. Five fields in
//! fixed order; the runtime reads them by position, so any change here is a
//! versioned ABI change:
//! - fill function pointer (one word)
//! - record size in bytes (u32)
//! - number of instantiation arguments (u16)
//! - address point offset in bytes (u16)
//! - private data (8 words, zeroed, owned by the runtime cache)

use crate::{GlobalRef, WordSize};

/// Number of header fields.
pub const HEADER_FIELD_COUNT: usize = 5;

/// Words reserved for runtime bookkeeping at the end of the header.
pub const PRIVATE_DATA_WORDS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateHeader {
    pub fill_function: GlobalRef,
    /// Size of the record after the header, in bytes.
    pub size: u32,
    pub num_arguments: u16,
    /// Address point offset from the start of the record, in bytes.
    pub address_point: u16,
    pub private_data: [u64; PRIVATE_DATA_WORDS],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("record of {0} bytes does not fit the header size field")]
    SizeOverflow(usize),

    #[error("address point at byte {0} does not fit the header offset field")]
    AddressPointOverflow(usize),

    #[error("{0} instantiation arguments do not fit the header count field")]
    TooManyArguments(usize),
}

impl TemplateHeader {
    /// Build a header, checking that each quantity fits its field.
    pub fn new(
        fill_function: GlobalRef,
        size_bytes: usize,
        num_arguments: usize,
        address_point_bytes: usize,
    ) -> Result<Self, HeaderError> {
        let size = u32::try_from(size_bytes).map_err(|_| HeaderError::SizeOverflow(size_bytes))?;
        let num_arguments = u16::try_from(num_arguments)
            .map_err(|_| HeaderError::TooManyArguments(num_arguments))?;
        let address_point = u16::try_from(address_point_bytes)
            .map_err(|_| HeaderError::AddressPointOverflow(address_point_bytes))?;
        Ok(Self {
            fill_function,
            size,
            num_arguments,
            address_point,
            private_data: [0; PRIVATE_DATA_WORDS],
        })
    }

    /// Encoded header length for a target.
    pub fn encoded_len(word: WordSize) -> usize {
        word.bytes() + 4 + 2 + 2 + PRIVATE_DATA_WORDS * word.bytes()
    }

    /// Encode to little-endian bytes. The fill function is written as zero
    /// and described by a relocation at offset 0.
    pub fn encode(&self, word: WordSize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::encoded_len(word));
        word.encode(0, &mut bytes);
        bytes.extend_from_slice(&self.size.to_le_bytes());
        bytes.extend_from_slice(&self.num_arguments.to_le_bytes());
        bytes.extend_from_slice(&self.address_point.to_le_bytes());
        for &w in &self.private_data {
            word.encode(w, &mut bytes);
        }
        bytes
    }
}
