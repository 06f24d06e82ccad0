// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides typed-data hashing functionality required by
//! hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.
//!
//! The engine is deliberately narrow: schema registration and path walking
//! live behind the [Walker] trait, field rendering behind [FieldUi], and
//! transport framing in the dispatch layer. What remains here is the part
//! that must survive arbitrary chunk boundaries with only a few hundred
//! bytes of working state: progressive canonicalization and recursive
//! digest folding.

use core::ptr::addr_of_mut;

use sha3::Keccak256;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use crate::schema::{Advance, FieldDescriptor};

mod error;
pub use error::Error;

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod encode;
pub use encode::{encode_field, Word, WORD_LEN};

mod domain;
pub use domain::{DomainContext, ADDRESS_LEN};

mod hash_stack;
pub use hash_stack::{HashStack, StreamHash, DIGEST_LEN, MAX_DEPTH};

mod field_hash;
pub use field_hash::{FieldHasher, FieldHashState};

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no signing session running
    Init,

    /// Streaming typed-data fields
    Hashing(FieldHashState),

    /// Message hash computed, pending user approval
    Pending,

    /// Approved, message hash may be fetched
    Ready,

    /// Signing denied / aborted
    Deny,

    /// Session failed
    Error,

    /// Session complete
    Complete,
}

/// [`Walker`] trait provides schema path support for [`Engine`] instances.
///
/// The walker owns the registered type tree and tracks which leaf field is
/// current; the engine drives it forward one field at a time and mirrors
/// reported struct boundaries in its hash stack.
pub trait Walker {
    /// Fetch the descriptor for the current leaf field, `None` once the
    /// path is exhausted
    fn current_field(&self) -> Option<FieldDescriptor<'_>>;

    /// Check whether the current root type is the domain separator
    fn root_is_domain(&self) -> bool;

    /// Move to the next leaf field, reporting struct levels crossed
    fn advance(&mut self) -> Advance;
}

impl<T: Walker> Walker for &mut T {
    fn current_field(&self) -> Option<FieldDescriptor<'_>> {
        (**self).current_field()
    }

    fn root_is_domain(&self) -> bool {
        (**self).root_is_domain()
    }

    fn advance(&mut self) -> Advance {
        (**self).advance()
    }
}

/// [`FieldUi`] trait provides field display support for [`Engine`] instances
pub trait FieldUi {
    /// A new field has begun: for dynamic fields the first chunk's payload
    /// as a preview, for static fields the complete raw value
    fn field_begin(&mut self, field: &FieldDescriptor, value: &[u8]);

    /// The current field has been folded and the path advanced
    fn field_finalize(&mut self);
}

impl<T: FieldUi> FieldUi for &mut T {
    fn field_begin(&mut self, field: &FieldDescriptor, value: &[u8]) {
        (**self).field_begin(field, value)
    }

    fn field_finalize(&mut self) {
        (**self).field_finalize()
    }
}

/// [Engine] provides hardware-independent progressive hashing of typed
/// structured messages
pub struct Engine<W: Walker, UI: FieldUi, H: StreamHash = Keccak256> {
    state: State,

    /// Count of completed fields, surfaced for progress display
    fields: u16,

    hasher: FieldHasher<H>,

    walker: W,
    ui: UI,
}

impl<W: Walker, UI: FieldUi> Engine<W, UI> {
    /// Create a new engine instance with the provided walker and UI,
    /// using the default Keccak-256 streaming hash
    pub const fn new(walker: W, ui: UI) -> Self {
        Self::new_with_hash(walker, ui)
    }
}

impl<W: Walker, UI: FieldUi, H: StreamHash> Engine<W, UI, H> {
    /// Create a new engine instance with a custom streaming hash
    pub const fn new_with_hash(walker: W, ui: UI) -> Self {
        Self {
            state: State::Init,
            fields: 0,
            hasher: FieldHasher::new(),
            walker,
            ui,
        }
    }

    /// Initialise an uninitialised engine instance pointer, an adventure
    /// in stack frame reduction for constrained targets
    /// # Safety
    /// per-field init is okay so long as we init _all_ fields
    pub unsafe fn init(p: *mut Self, walker: W, ui: UI) {
        addr_of_mut!((*p).state).write(State::Init);
        addr_of_mut!((*p).fields).write(0);
        addr_of_mut!((*p).hasher).write(FieldHasher::new());
        addr_of_mut!((*p).walker).write(walker);
        addr_of_mut!((*p).ui).write(ui);
    }

    /// Handle incoming signing events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        match (self.state, evt) {
            // Empty event, do nothing
            (_, Event::None) => (),

            // Fetch engine state / information
            (_, Event::GetInfo) => (),

            // A field is mid-flight: only further chunks (or a full session
            // restart) are acceptable, anything else poisons the session
            (State::Hashing(FieldHashState::AwaitingMore), e)
                if !matches!(e, Event::FieldChunk { .. } | Event::SignInit { .. }) =>
            {
                #[cfg(feature = "log")]
                log::error!("command interrupted mid-field: {:02x?}", e);

                self.state = State::Error;
                return Err(Error::FieldInterrupted);
            }

            // Start a typed-data signing session
            (_, Event::SignInit { chain_id }) => {
                self.hasher.start(*chain_id)?;
                self.fields = 0;
                self.state = State::Hashing(FieldHashState::Idle);
            }

            // Ingest a chunk of the current field
            (State::Hashing(_), Event::FieldChunk { data, partial }) => {
                return self.field_update(data, *partial);
            }

            // Message hash may only be fetched following approval
            (State::Pending, Event::GetMessageHash) => {
                return Err(Error::ApprovalPending);
            }

            // Fetch the approved message hash
            (State::Ready, Event::GetMessageHash) => match self.hasher.message_hash() {
                Some(h) => return Ok(Output::MessageHash { hash: *h }),
                None => return Err(Error::InvalidState),
            },

            // Complete the signing session
            (_, Event::SignComplete) => {
                self.hasher.clear();
                self.state = State::Complete;
            }

            // Handle unexpected events
            _e => {
                #[cfg(feature = "log")]
                log::error!("unexpected event in state {:?}: {:02x?}", self.state, _e);

                return Err(Error::UnexpectedEvent);
            }
        }

        // Default to returning updated state
        Ok(Output::State {
            state: self.state,
            fields: self.fields,
        })
    }

    /// Pass a field chunk to the hashing session
    #[cfg_attr(feature = "noinline", inline(never))]
    fn field_update(&mut self, data: &[u8], partial: bool) -> Result<Output, Error> {
        match self.hasher.ingest(&mut self.walker, &mut self.ui, data, partial) {
            Ok(s) => {
                // A call ending Idle completed a field
                if s == FieldHashState::Idle {
                    self.fields = self.fields.saturating_add(1);
                }

                // All fields folded, await user approval
                self.state = match self.hasher.message_hash() {
                    Some(_) => State::Pending,
                    None => State::Hashing(s),
                };
            }
            Err(e) => {
                #[cfg(feature = "log")]
                log::error!("field chunk failed: {:?}", e);

                self.state = State::Error;
                return Err(e);
            }
        }

        Ok(Output::State {
            state: self.state,
            fields: self.fields,
        })
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch count of completed fields
    pub fn field_count(&self) -> u16 {
        self.fields
    }

    /// Fetch message hash for approved sessions
    pub fn message_hash(&self) -> Option<&[u8; DIGEST_LEN]> {
        match self.state {
            State::Ready => self.hasher.message_hash(),
            _ => None,
        }
    }

    /// Fetch the captured verifying contract address, if the domain
    /// separator carried one
    pub fn verifying_contract(&self) -> Option<&[u8; ADDRESS_LEN]> {
        self.hasher.domain().verifying_contract()
    }

    /// Fetch the walker, used by the dispatch layer to re-register schemas
    /// between sessions
    pub fn walker_mut(&mut self) -> &mut W {
        &mut self.walker
    }

    /// Fetch the UI collaborator
    pub fn ui(&self) -> &UI {
        &self.ui
    }

    /// Approve a pending message (advances state to `State::Ready`)
    pub fn approve(&mut self) {
        if let State::Pending = self.state {
            self.state = State::Ready;
        }
    }

    /// Deny a pending message
    pub fn deny(&mut self) {
        self.hasher.clear();
        self.state = State::Deny;
    }

    /// Reset engine state
    pub fn reset(&mut self) {
        self.hasher.clear();
        self.fields = 0;
        self.state = State::Init;
    }
}
