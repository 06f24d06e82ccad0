// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu;

use super::hash_stack::DIGEST_LEN;
use super::FieldHashState;

/// [`Engine`][super::Engine] outputs (in response to events), typically
/// encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Engine state
    State {
        state: super::State,
        fields: u16,
    },

    /// Root message digest following approval
    MessageHash {
        hash: [u8; DIGEST_LEN],
    },
}

impl Output {
    /// Encode an [`Output`] object to a response APDU
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::State { state, fields } => apdu::sign::SignInfo {
                state: state.state(),
                fields: *fields,
            }
            .encode(buff),
            Output::MessageHash { hash } => apdu::sign::SignHashResp::new(*hash).encode(buff),
        }
    }

    /// Fetch state for outputs containing this
    pub fn state(&self) -> Option<super::State> {
        match &self {
            Output::State { state, .. } => Some(*state),
            _ => None,
        }
    }
}

impl PartialEq<super::State> for Output {
    fn eq(&self, other: &super::State) -> bool {
        match self {
            Output::State { state, .. } => state == other,
            _ => false,
        }
    }
}

impl super::State {
    /// Map [engine](crate::engine) states to [apdu][apdu::state::SignState]
    /// states for transmission
    pub fn state(&self) -> apdu::state::SignState {
        use crate::{apdu::state::SignState, engine::State};

        match self {
            State::Init => SignState::Init,
            State::Hashing(FieldHashState::Idle) => SignState::FieldIdle,
            State::Hashing(FieldHashState::AwaitingMore) => SignState::FieldPartial,
            State::Pending => SignState::Pending,
            State::Ready => SignState::Approved,
            State::Deny => SignState::Denied,
            State::Complete => SignState::Complete,
            State::Error => SignState::Error,
        }
    }
}
