// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Decode;

use ledger_proto::{ApduError, ApduStatic};

use ledger_eip712_apdu::prelude::*;

/// [`Engine`][super::Engine] input events, typically decoded from request
/// [APDUs][crate::apdu]
#[derive(Clone, Debug)]
pub enum Event<'a> {
    None,

    /// Start a typed-data signing session
    SignInit {
        chain_id: u64,
    },

    /// Ingest one chunk of the current field
    FieldChunk {
        data: &'a [u8],
        partial: bool,
    },

    /// Fetch the computed message hash
    GetMessageHash,

    /// Complete the signing session
    SignComplete,

    /// Fetch engine info / state
    GetInfo,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event, ApduError>
where
    T: Decode<'a, Error = ApduError>,
    Event<'a>: From<T::Output>,
{
    T::decode(buff).map(|(v, _n)| Event::from(v))
}

impl<'a> Event<'a> {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(ins: u8, buff: &'a [u8]) -> Result<Self, ApduError> {
        match ins {
            SignInit::INS => decode_event::<SignInit>(buff),
            SignFieldChunk::INS => decode_event::<SignFieldChunk>(buff),
            SignHashReq::INS => decode_event::<SignHashReq>(buff),
            SignComplete::INS => decode_event::<SignComplete>(buff),
            SignInfoReq::INS => decode_event::<SignInfoReq>(buff),
            _ => Err(ApduError::InvalidEncoding),
        }
    }
}

impl<'a> From<SignInit> for Event<'a> {
    fn from(a: SignInit) -> Self {
        Event::SignInit {
            chain_id: a.chain_id,
        }
    }
}

impl<'a> From<SignFieldChunk<'a>> for Event<'a> {
    fn from(a: SignFieldChunk<'a>) -> Self {
        Event::FieldChunk {
            data: a.data,
            partial: a.flags.contains(ChunkFlags::PARTIAL),
        }
    }
}

impl<'a> From<SignHashReq> for Event<'a> {
    fn from(_: SignHashReq) -> Self {
        Event::GetMessageHash
    }
}

impl<'a> From<SignComplete> for Event<'a> {
    fn from(_: SignComplete) -> Self {
        Event::SignComplete
    }
}

impl<'a> From<SignInfoReq> for Event<'a> {
    fn from(_: SignInfoReq) -> Self {
        Event::GetInfo
    }
}
