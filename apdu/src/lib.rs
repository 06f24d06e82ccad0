// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for EIP-712 typed-data signing
//!
//! This module provides a protocol specification and reference implementation
//! for streaming a typed structured message to a hardware wallet for hashing
//! and approval, see `ledger-eip712-core` for the engine consuming these
//! objects.
//!
//! APDUs use a primitive binary encoding to simplify implementation with
//! unsupported languages and platforms. Encodings are intended to be
//! _roughly_ equivalent to packed c structures while maintaining 32-bit field
//! alignment to reduce the need for unaligned access on constrained
//! platforms. APDU fields are little-endian; note the declared field length
//! _inside_ a field chunk remains big-endian per the chunk format (see
//! [sign::SignFieldChunk]).

#![no_std]

pub use ledger_proto::{ApduError, ApduReq, ApduStatic};

pub mod app_info;
pub mod prelude;
pub mod sign;
pub mod state;

mod helpers;

/// EIP-712 APDU Class
pub const EIP712_APDU_CLA: u8 = 0xe7;

pub const EIP712_PROTO_VERSION: u8 = 0x01;

/// EIP-712 APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    // General instructions
    GetAppInfo = 0x00,

    /// Start a typed-data signing session
    SignInit = 0x20,

    /// Stream one chunk of the current field
    SignFieldChunk = 0x21,

    /// Fetch the computed message hash following approval
    SignGetHash = 0x30,

    /// Complete a signing session
    SignComplete = 0x40,

    /// Fetch signing session state
    SignGetInfo = 0x41,
}

/// Helper macro for encoding `bitflags` types
#[macro_export]
macro_rules! encdec_bitflags {
    ($b:ty) => {
        impl encdec::Encode for $b {
            type Error = ApduError;

            fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode(&bits, buff).map_err(|e| e.into())
            }

            fn encode_len(&self) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode_len(&bits).map_err(|e| e.into())
            }
        }

        impl encdec::DecodeOwned for $b {
            type Output = $b;
            type Error = ApduError;

            fn decode_owned(buff: &[u8]) -> Result<(Self, usize), Self::Error> {
                if buff.is_empty() {
                    return Err(ApduError::InvalidLength);
                }

                let v = <$b>::from_bits_truncate(buff[0]);
                Ok((v, 1))
            }
        }
    };
}
