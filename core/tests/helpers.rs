#![allow(unused)]
// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Shared fixtures for engine integration tests: a scripted schema walker,
//! a recording UI collaborator, chunk framing helpers and reference digest
//! construction.

use sha3::{Digest, Keccak256};

use ledger_eip712_core::engine::{Engine, Error, Event, FieldUi, Output, Walker};
use ledger_eip712_core::schema::{Advance, FieldDescriptor, FieldKind};

/// One step of a scripted walk: the leaf field plus the path movement the
/// walker reports once it completes
#[derive(Clone)]
pub struct Step {
    pub field: FieldDescriptor<'static>,
    pub exit: u8,
    pub enter: u8,
}

/// Script a leaf with no struct boundary crossings after it
pub fn leaf(name: &'static str, kind: FieldKind, width: u8) -> Step {
    Step {
        field: FieldDescriptor::new(name, kind, width),
        exit: 0,
        enter: 0,
    }
}

/// Script a leaf followed by struct boundary crossings
pub fn leaf_move(name: &'static str, kind: FieldKind, width: u8, exit: u8, enter: u8) -> Step {
    Step {
        field: FieldDescriptor::new(name, kind, width),
        exit,
        enter,
    }
}

/// Scripted schema walker driven by a precomputed leaf sequence
pub struct TestWalker {
    steps: Vec<Step>,
    index: usize,
    domain: bool,
}

impl TestWalker {
    /// Create a walker over a message-struct script
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            index: 0,
            domain: false,
        }
    }

    /// Create a walker reporting the domain separator as root type
    pub fn domain(steps: Vec<Step>) -> Self {
        Self {
            steps,
            index: 0,
            domain: true,
        }
    }
}

impl Walker for TestWalker {
    fn current_field(&self) -> Option<FieldDescriptor<'_>> {
        self.steps.get(self.index).map(|s| s.field)
    }

    fn root_is_domain(&self) -> bool {
        self.domain
    }

    fn advance(&mut self) -> Advance {
        let a = self
            .steps
            .get(self.index)
            .map(|s| Advance {
                exit: s.exit,
                enter: s.enter,
            })
            .unwrap_or_default();

        self.index += 1;

        a
    }
}

/// Recording UI collaborator
#[derive(Default)]
pub struct TestUi {
    /// Fields begun, with the bytes passed for display
    pub begun: Vec<(String, Vec<u8>)>,
    /// Count of finalized fields
    pub finalized: usize,
}

impl FieldUi for TestUi {
    fn field_begin(&mut self, field: &FieldDescriptor, value: &[u8]) {
        self.begun.push((field.name.to_string(), value.to_vec()));
    }

    fn field_finalize(&mut self) {
        self.finalized += 1;
    }
}

/// Build an engine with a started session over the provided walker script
pub fn engine(walker: TestWalker, chain_id: u64) -> Engine<TestWalker, TestUi> {
    let mut e = Engine::new(walker, TestUi::default());
    e.update(&Event::SignInit { chain_id }).unwrap();
    e
}

/// Frame a value as a first chunk (2-byte big-endian declared length header)
pub fn framed(value: &[u8]) -> Vec<u8> {
    let mut v = (value.len() as u16).to_be_bytes().to_vec();
    v.extend_from_slice(value);
    v
}

/// Deliver one complete field in a single exchange
pub fn send_field(e: &mut Engine<TestWalker, TestUi>, value: &[u8]) -> Result<Output, Error> {
    e.update(&Event::FieldChunk {
        data: &framed(value),
        partial: false,
    })
}

/// Deliver a field value split at the provided (ascending) payload offsets,
/// every chunk flagged partial except the last
pub fn send_field_split(
    e: &mut Engine<TestWalker, TestUi>,
    value: &[u8],
    splits: &[usize],
) -> Result<Output, Error> {
    let mut bounds = vec![0usize];
    bounds.extend_from_slice(splits);
    bounds.push(value.len());

    let mut out = Output::None;
    for (i, w) in bounds.windows(2).enumerate() {
        let part = &value[w[0]..w[1]];
        let partial = w[1] < value.len();

        let data = match i {
            0 => framed_prefix(value.len(), part),
            _ => part.to_vec(),
        };

        out = e.update(&Event::FieldChunk {
            data: &data,
            partial,
        })?;
    }

    Ok(out)
}

/// Frame a partial first chunk: declared length for the whole value, payload
/// carrying only the leading bytes
pub fn framed_prefix(declared: usize, payload: &[u8]) -> Vec<u8> {
    let mut v = (declared as u16).to_be_bytes().to_vec();
    v.extend_from_slice(payload);
    v
}

/// Compute a Keccak-256 digest
pub fn keccak(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hash a sequence of already-encoded 32-byte words
pub fn fold_words(words: &[[u8; 32]]) -> [u8; 32] {
    let mut h = Keccak256::new();
    for w in words {
        Digest::update(&mut h, w);
    }
    Digest::finalize(h).into()
}

/// Encode an unsigned integer reference word
pub fn word_uint(v: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&v.to_be_bytes());
    w
}

/// Encode a boolean reference word
pub fn word_bool(v: bool) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[31] = v as u8;
    w
}

/// Encode an address reference word
pub fn word_address(addr: &[u8; 20]) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(addr);
    w
}

/// Fetch the approved message hash via the event interface
pub fn fetch_hash(e: &mut Engine<TestWalker, TestUi>) -> Result<[u8; 32], Error> {
    e.approve();
    match e.update(&Event::GetMessageHash)? {
        Output::MessageHash { hash } => Ok(hash),
        o => panic!("unexpected output: {o:?}"),
    }
}
