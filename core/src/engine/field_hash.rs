// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Progressive field hashing state machine.
//!
//! Fields arrive as transport chunks that may split anywhere, including
//! mid-value; the machine resumes from `state` and `remaining` alone. A
//! static field canonicalizes to a word once complete; a dynamic field folds
//! each chunk into a field-local accumulator and its digest is folded in
//! the value's place. Nested struct digests fold recursively following the
//! walker's path reports, so no struct is ever materialized in memory.

use byteorder::{BigEndian, ByteOrder};
use sha3::Keccak256;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroize;

use super::domain::DomainContext;
use super::encode::{encode_field, Word};
use super::hash_stack::{HashStack, StreamHash, DIGEST_LEN, MAX_DEPTH};
use super::{Error, FieldUi, Walker};

/// Field hashing phase, resumed across transport exchanges
#[derive(
    Copy, Clone, PartialEq, Debug, Default, EnumString, Display, EnumVariantNames, EnumIter,
)]
pub enum FieldHashState {
    /// Between fields, next chunk starts a new field
    #[default]
    Idle,
    /// Mid-field, value bytes outstanding
    AwaitingMore,
}

/// Progressive typed-data hashing session
pub struct FieldHasher<H: StreamHash = Keccak256> {
    state: FieldHashState,

    /// Bytes still expected to complete the current field's declared length
    remaining: u16,

    /// One accumulator per active nesting level
    stack: HashStack<H, MAX_DEPTH>,

    /// Field-local accumulator for the in-flight dynamic field
    value: Option<H>,

    domain: DomainContext,

    message_hash: Option<[u8; DIGEST_LEN]>,
}

impl<H: StreamHash> FieldHasher<H> {
    /// Create a new (inactive) field hashing session
    pub const fn new() -> Self {
        Self {
            state: FieldHashState::Idle,
            remaining: 0,
            stack: HashStack::new(),
            value: None,
            domain: DomainContext::new(0),
            message_hash: None,
        }
    }

    /// Start a session, opening the root accumulator
    pub fn start(&mut self, chain_id: u64) -> Result<(), Error> {
        self.state = FieldHashState::Idle;
        self.remaining = 0;
        self.stack.clear();
        self.value = None;
        self.domain = DomainContext::new(chain_id);
        self.message_hash = None;

        self.stack.push()
    }

    /// Discard all session state
    pub fn clear(&mut self) {
        self.state = FieldHashState::Idle;
        self.remaining = 0;
        self.stack.clear();
        self.value = None;
        self.domain.clear();
        self.message_hash = None;
    }

    /// Fetch the current field hashing phase
    pub fn state(&self) -> FieldHashState {
        self.state
    }

    /// Check whether a field is mid-flight (value bytes outstanding)
    pub fn in_flight(&self) -> bool {
        self.state == FieldHashState::AwaitingMore
    }

    /// Fetch the root message digest once every field has folded
    pub fn message_hash(&self) -> Option<&[u8; DIGEST_LEN]> {
        self.message_hash.as_ref()
    }

    /// Fetch the session domain context
    pub fn domain(&self) -> &DomainContext {
        &self.domain
    }

    /// Ingest one transport chunk of the current field.
    ///
    /// The first chunk of a field carries a 2-byte big-endian declared value
    /// length ahead of the payload; `partial` flags that further chunks
    /// follow, valid only for dynamic fields with bytes outstanding.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn ingest<W: Walker, U: FieldUi>(
        &mut self,
        walker: &mut W,
        ui: &mut U,
        data: &[u8],
        partial: bool,
    ) -> Result<FieldHashState, Error> {
        // Fetch field by path
        let field = match walker.current_field() {
            Some(f) => f,
            None => return Err(Error::ConditionNotSatisfied),
        };

        let mut payload = data;

        if self.state == FieldHashState::Idle {
            // First chunk for this field, strip the declared length header
            if payload.len() < 2 {
                return Err(Error::InvalidData);
            }

            self.remaining = BigEndian::read_u16(payload);
            payload = &payload[2..];
            self.state = FieldHashState::AwaitingMore;

            if field.is_dynamic() {
                self.value = Some(H::default());
                ui.field_begin(&field, payload);
            }
        } else if payload.is_empty() {
            // Continuation chunks must make progress
            return Err(Error::InvalidData);
        }

        // Remaining size never goes negative
        if payload.len() > self.remaining as usize {
            return Err(Error::InvalidData);
        }
        self.remaining -= payload.len() as u16;

        // Dynamic values fold progressively, never retained whole
        if let Some(h) = self.value.as_mut() {
            h.update(payload);
        }

        if self.remaining == 0 {
            // Declared length satisfied, the partial flag no longer makes sense
            if partial {
                return Err(Error::InvalidData);
            }

            let mut word: Word = match field.is_dynamic() {
                // Finalize the field-local accumulator in the value's place
                true => match self.value.take() {
                    Some(h) => h.finalize(),
                    None => return Err(Error::InvalidState),
                },
                // Canonicalize the just-received bytes
                false => {
                    let w = encode_field(field.kind, field.width, payload)?;
                    ui.field_begin(&field, payload);
                    w
                }
            };

            // Fold into the enclosing accumulator and drop the scratch word
            self.stack.fold(&word)?;
            word.zeroize();

            // Domain-separator side effects, after the fold as folds are
            // never rolled back
            if walker.root_is_domain() {
                self.domain.check_field(field.name, payload)?;
            }

            self.advance_path(walker, ui)?;
        } else {
            // Only dynamic fields marked partial may span further chunks
            if !partial || !field.is_dynamic() {
                return Err(Error::InvalidData);
            }
        }

        Ok(self.state)
    }

    /// Follow the path to the next leaf, folding each completed struct
    /// digest into its parent and opening accumulators on the way down
    #[cfg_attr(feature = "noinline", inline(never))]
    fn advance_path<W: Walker, U: FieldUi>(
        &mut self,
        walker: &mut W,
        ui: &mut U,
    ) -> Result<(), Error> {
        let adv = walker.advance();

        for _ in 0..adv.exit {
            let digest = self.stack.pop()?;
            self.stack.fold(&digest)?;
        }
        for _ in 0..adv.enter {
            self.stack.push()?;
        }

        self.state = FieldHashState::Idle;
        ui.field_finalize();

        // Path exhausted, finalize the root accumulator
        if walker.current_field().is_none() {
            if self.stack.depth() != 1 {
                return Err(Error::InvalidState);
            }
            self.message_hash = Some(self.stack.pop()?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use sha3::{Digest, Keccak256};

    use crate::schema::{Advance, FieldDescriptor, FieldKind};

    use super::*;

    /// Single-leaf walker fixture, no nesting
    struct OneField {
        field: FieldDescriptor<'static>,
        consumed: bool,
        domain: bool,
    }

    impl Walker for OneField {
        fn current_field(&self) -> Option<FieldDescriptor<'_>> {
            match self.consumed {
                false => Some(self.field),
                true => None,
            }
        }

        fn root_is_domain(&self) -> bool {
            self.domain
        }

        fn advance(&mut self) -> Advance {
            self.consumed = true;
            Advance::next()
        }
    }

    struct NullUi;

    impl FieldUi for NullUi {
        fn field_begin(&mut self, _field: &FieldDescriptor, _value: &[u8]) {}
        fn field_finalize(&mut self) {}
    }

    fn framed(value: &[u8]) -> heapless::Vec<u8, 64> {
        let mut v = heapless::Vec::new();
        v.extend_from_slice(&(value.len() as u16).to_be_bytes())
            .unwrap();
        v.extend_from_slice(value).unwrap();
        v
    }

    #[test]
    fn single_static_field() {
        let mut walker = OneField {
            field: FieldDescriptor::new("value", FieldKind::Uint, 32),
            consumed: false,
            domain: false,
        };
        let mut fh = FieldHasher::<Keccak256>::new();

        fh.start(1).unwrap();
        let s = fh
            .ingest(&mut walker, &mut NullUi, &framed(&[0x2a]), false)
            .unwrap();

        assert_eq!(s, FieldHashState::Idle);

        // Root digest is the hash of the single encoded word
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        let expected: [u8; 32] = Keccak256::digest(word).into();

        assert_eq!(fh.message_hash(), Some(&expected));
    }

    #[test]
    fn ingest_without_field_fails() {
        let mut walker = OneField {
            field: FieldDescriptor::new("value", FieldKind::Uint, 32),
            consumed: true,
            domain: false,
        };
        let mut fh = FieldHasher::<Keccak256>::new();

        fh.start(1).unwrap();
        assert_eq!(
            fh.ingest(&mut walker, &mut NullUi, &framed(&[0x2a]), false),
            Err(Error::ConditionNotSatisfied)
        );
    }

    #[test]
    fn partial_chunks_leave_field_in_flight() {
        let mut walker = OneField {
            field: FieldDescriptor::new("note", FieldKind::String, 0),
            consumed: false,
            domain: false,
        };
        let mut fh = FieldHasher::<Keccak256>::new();

        fh.start(1).unwrap();
        assert!(!fh.in_flight());

        let mut data = framed(b"hello world");
        data.truncate(2 + 5);

        let s = fh.ingest(&mut walker, &mut NullUi, &data, true).unwrap();
        assert_eq!(s, FieldHashState::AwaitingMore);
        assert!(fh.in_flight());

        let s = fh.ingest(&mut walker, &mut NullUi, b" world", false).unwrap();
        assert_eq!(s, FieldHashState::Idle);
        assert!(!fh.in_flight());

        let expected: [u8; 32] =
            Keccak256::digest(<[u8; 32]>::from(Keccak256::digest(b"hello world"))).into();
        assert_eq!(fh.message_hash(), Some(&expected));
    }

    #[test]
    fn truncated_header_fails() {
        let mut walker = OneField {
            field: FieldDescriptor::new("value", FieldKind::Uint, 32),
            consumed: false,
            domain: false,
        };
        let mut fh = FieldHasher::<Keccak256>::new();

        fh.start(1).unwrap();
        assert_eq!(
            fh.ingest(&mut walker, &mut NullUi, &[0x00], false),
            Err(Error::InvalidData)
        );
    }

    #[test]
    fn domain_chain_id_checked_on_completion() {
        let mut walker = OneField {
            field: FieldDescriptor::new("chainId", FieldKind::Uint, 32),
            consumed: false,
            domain: true,
        };
        let mut fh = FieldHasher::<Keccak256>::new();

        fh.start(137).unwrap();
        assert_eq!(
            fh.ingest(&mut walker, &mut NullUi, &framed(&[0x01]), false),
            Err(Error::ConditionNotSatisfied)
        );
    }
}
