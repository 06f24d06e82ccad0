// Copyright (c) 2022-2023 The MobileCoin Foundation

//! EIP-712 typed-data hardware wallet core
//!
//! This provides a common [Engine][engine] supporting progressive hashing of
//! typed structured messages for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via
//! [Event][engine::Event]s and [Output][engine::Output]s, see
//! [ledger_eip712_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! Prior to interacting with a hardware wallet the client should issue an
//! [`AppInfoReq`][ledger_eip712_apdu::app_info::AppInfoReq] to fetch an
//! [`AppInfoResp`][ledger_eip712_apdu::app_info::AppInfoResp] containing
//! application information including the applet version, protocol version,
//! and flags for available features.
//!
//! ### Signing a typed structured message
//!
//! Signing consists of registering the message schema with the device (out
//! of scope here, owned by the schema walker), streaming each leaf field
//! value, then fetching the computed message hash following user approval.
//!
//! 1. Issue [`SignInit`][ledger_eip712_apdu::sign::SignInit] with the
//!    trusted chain id to start a signing session
//! 2. Stream each field in declaration order via
//!    [`SignFieldChunk`][ledger_eip712_apdu::sign::SignFieldChunk]:
//!     1. The first chunk of a field carries a 2-byte big-endian declared
//!        value length ahead of the payload
//!     2. Dynamic fields (strings, byte arrays, nested structs) may span
//!        further chunks, each flagged
//!        [`PARTIAL`][ledger_eip712_apdu::sign::ChunkFlags::PARTIAL] except
//!        the last
//! 3. Await user approval of the rendered message
//! 4. Issue [`SignHashReq`][ledger_eip712_apdu::sign::SignHashReq] to fetch
//!    a [`SignHashResp`][ledger_eip712_apdu::sign::SignHashResp] containing
//!    the root message digest for signature construction
//! 5. Issue [`SignComplete`][ledger_eip712_apdu::sign::SignComplete] to end
//!    the session
//!
//! Unless otherwise documented each signing operation returns a
//! [`SignInfo`][ledger_eip712_apdu::sign::SignInfo] response containing the
//! current [state][ledger_eip712_apdu::state::SignState] and completed field
//! count.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_eip712_apdu::{self as apdu};

pub mod engine;

pub mod schema;
