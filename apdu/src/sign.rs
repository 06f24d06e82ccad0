// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Typed-data signing APDUs, used to stream a structured message to the
//! hardware wallet for progressive hashing and approval.
//!
//! See `ledger-eip712-core` engine docs for interaction and state machines

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{
    helpers::*,
    state::SignState,
    ApduError, Instruction, EIP712_APDU_CLA,
};

/// Start a typed-data signing session.
///
/// The trusted chain id is carried here so the engine can enforce the
/// domain-separator `chainId` field against caller configuration rather
/// than global state.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           CHAIN_ID                            |
/// |                        (u64, 8-byte)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignInit {
    /// Trusted chain id the domain separator must match
    pub chain_id: u64,
}

impl ApduStatic for SignInit {
    const CLA: u8 = EIP712_APDU_CLA;
    const INS: u8 = Instruction::SignInit as u8;
}

impl SignInit {
    /// Create a new [`SignInit`] request
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

bitflags::bitflags! {
    /// Field chunk flags
    pub struct ChunkFlags: u8 {
        /// Further chunks are expected for the current field
        const PARTIAL = 1 << 0;
    }
}

crate::encdec_bitflags!(ChunkFlags);

/// One transport chunk of the current field.
///
/// The first chunk of each field carries a 2-byte big-endian declared value
/// length ahead of the payload; continuation chunks (dynamic fields only)
/// carry payload bytes alone, with [`ChunkFlags::PARTIAL`] set on every
/// chunk except the one completing the field.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |    DATA_LEN   |            RESERVED           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                             DATA                              /
/// /                       (variable length)                       /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct SignFieldChunk<'a> {
    /// Chunk flags
    pub flags: ChunkFlags,
    /// Chunk data (including the declared length header on first chunks)
    pub data: &'a [u8],
}

impl<'a> ApduStatic for SignFieldChunk<'a> {
    const CLA: u8 = EIP712_APDU_CLA;
    const INS: u8 = Instruction::SignFieldChunk as u8;
}

impl<'a> SignFieldChunk<'a> {
    /// Create a new [`SignFieldChunk`] request
    pub fn new(flags: ChunkFlags, data: &'a [u8]) -> Self {
        Self { flags, data }
    }
}

impl<'a> Encode for SignFieldChunk<'a> {
    type Error = ApduError;

    /// Encode a [`SignFieldChunk`] APDU into the provided buffer
    #[inline]
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = self.data;

        // Check data fits the single-byte length field and the buffer
        if d.len() > u8::MAX as usize || buff.len() < d.len() + 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        // Write flags
        index += self.flags.encode(&mut buff[index..])?;

        // Write data length
        buff[index] = d.len() as u8;
        index += 1;

        // Write padding
        buff[index] = 0;
        buff[index + 1] = 0;
        index += 2;

        // Write data
        buff[index..][..d.len()].copy_from_slice(d);
        index += d.len();

        Ok(index)
    }

    #[inline]
    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + self.data.len())
    }
}

impl<'a> Decode<'a> for SignFieldChunk<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a [`SignFieldChunk`] APDU from the provided buffer
    #[inline]
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        // Check header length
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        // Read flags
        let (flags, n) = <ChunkFlags as encdec::DecodeOwned>::decode_owned(&buff[index..])?;
        index += n;

        // Read data length
        let data_len = buff[index] as usize;
        index += 1;

        // Skip padding
        index += 2;

        // Check full buffer length
        if buff.len() < 4 + data_len {
            return Err(ApduError::InvalidLength);
        }

        // Read data
        let data = &buff[index..][..data_len];
        index += data_len;

        Ok((Self { flags, data }, index))
    }
}

/// Signing session information request APDU
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignInfoReq;

impl ApduStatic for SignInfoReq {
    const CLA: u8 = EIP712_APDU_CLA;
    const INS: u8 = Instruction::SignGetInfo as u8;
}

/// Complete signing session operation (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignComplete;

impl ApduStatic for SignComplete {
    const CLA: u8 = EIP712_APDU_CLA;
    const INS: u8 = Instruction::SignComplete as u8;
}

/// Signing session information response APDU.
///
/// Received in response to signing commands, contains the current engine
/// state and the count of completed fields for progress display.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   SIGN_STATE  |             FIELDS            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignInfo {
    /// Current signing engine state
    pub state: SignState,
    /// Count of completed fields
    pub fields: u16,
}

/// Message hash request APDU, valid only following user approval
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignHashReq;

impl ApduStatic for SignHashReq {
    const CLA: u8 = EIP712_APDU_CLA;
    const INS: u8 = Instruction::SignGetHash as u8;
}

/// Message hash response APDU, contains the root typed-data digest
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                             HASH                              /
/// /                      (32-byte digest)                         /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignHashResp {
    /// Root message digest
    #[encdec(with = "arr")]
    pub hash: [u8; 32],
}

impl SignHashResp {
    /// Create a new [`SignHashResp`] APDU
    pub fn new(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}
