//! Decoding of `MultiSend` batches.
//!
//! `multiSend(bytes transactions)` takes a single ABI `bytes` argument whose content is a
//! tightly packed sequence of records without delimiters:
//!
//! ```text
//! operation (1) | to (20) | value (32, big endian) | data length (32, big endian) | data
//! ```
//!
//! Decoding never fails hard: anything that is not a well-formed batch is reported as
//! "not a batch" and the caller treats the calldata as an opaque call.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{interfaces::IMultiSend::multiSendCall, MultiSendError, Operation};

const OPERATION_LEN: usize = 1;
const ADDRESS_LEN: usize = 20;
const WORD_LEN: usize = 32;

/// One call of a `MultiSend` batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCall {
    /// Call or delegate call
    pub operation: Operation,
    /// Call target
    pub to: Address,
    /// Native value sent along
    pub value: U256,
    /// Calldata
    pub data: Bytes,
}

/// Returns `true` if `data` starts with the `multiSend(bytes)` selector.
pub fn is_batch(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == multiSendCall::SELECTOR
}

/// Decodes a `multiSend(bytes)` call into its sub-calls.
///
/// Returns `None` if `data` is not a well-formed batch.
pub fn decode_batch(data: &[u8]) -> Option<Vec<SubCall>> {
    match try_decode_batch(data) {
        Ok(calls) => Some(calls),
        Err(MultiSendError::NotMultiSend) => None,
        Err(err) => {
            debug!(%err, "Treating malformed multiSend payload as opaque calldata");
            None
        }
    }
}

/// Decodes a `multiSend(bytes)` call, reporting why decoding failed.
pub fn try_decode_batch(data: &[u8]) -> Result<Vec<SubCall>, MultiSendError> {
    if !is_batch(data) {
        return Err(MultiSendError::NotMultiSend);
    }
    // Padding is not validated: the contract accepts it, so the analyzer has to look through it.
    let call = multiSendCall::abi_decode(data, false).map_err(|_| MultiSendError::NotMultiSend)?;
    decode_packed(&call.transactions)
}

/// Walks a packed transaction blob.
pub fn decode_packed(packed: &[u8]) -> Result<Vec<SubCall>, MultiSendError> {
    let mut calls = Vec::new();
    let mut cursor = Cursor { buf: packed, offset: 0 };

    while cursor.remaining() > 0 {
        let record_offset = cursor.offset;

        let code = cursor.take(OPERATION_LEN)?[0];
        let operation = Operation::try_from(code)
            .map_err(|_| MultiSendError::InvalidOperation { offset: record_offset, code })?;
        let to = Address::from_slice(cursor.take(ADDRESS_LEN)?);
        let value = U256::from_be_slice(cursor.take(WORD_LEN)?);

        let length_offset = cursor.offset;
        let length = U256::from_be_slice(cursor.take(WORD_LEN)?);
        let length = usize::try_from(length).map_err(|_| MultiSendError::MalformedBinary {
            offset: length_offset,
            needed: usize::MAX,
            available: cursor.remaining(),
        })?;
        let data = Bytes::copy_from_slice(cursor.take(length)?);

        trace!(index = calls.len(), %operation, %to, %value, data_len = length, "Decoded sub-call");
        calls.push(SubCall { operation, to, value, data });
    }

    Ok(calls)
}

/// Packs sub-calls into the `MultiSend` transaction encoding.
pub fn encode_packed(calls: &[SubCall]) -> Bytes {
    let mut packed = Vec::with_capacity(
        calls.iter().map(|c| OPERATION_LEN + ADDRESS_LEN + 2 * WORD_LEN + c.data.len()).sum(),
    );
    for call in calls {
        packed.push(u8::from(call.operation));
        packed.extend_from_slice(call.to.as_slice());
        packed.extend_from_slice(&call.value.to_be_bytes::<WORD_LEN>());
        packed.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<WORD_LEN>());
        packed.extend_from_slice(&call.data);
    }
    packed.into()
}

/// Builds `multiSend(bytes)` calldata for the given sub-calls.
pub fn encode_batch(calls: &[SubCall]) -> Bytes {
    multiSendCall { transactions: encode_packed(calls) }.abi_encode().into()
}

struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], MultiSendError> {
        if len > self.remaining() {
            return Err(MultiSendError::MalformedBinary {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let buf = self.buf;
        let slice = &buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}
