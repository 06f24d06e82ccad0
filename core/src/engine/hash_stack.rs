// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Depth-indexed stack of streaming hash accumulators.
//!
//! One accumulator is live per active nesting level, from the moment a
//! struct (or the root message) begins hashing until its digest is folded
//! into its parent. Push / pop ordering mirrors the walker's path exactly,
//! replacing the arena address-arithmetic convention of earlier designs
//! with explicit LIFO frames.

use heapless::Vec;
use sha3::{Digest, Keccak256};

use super::Error;

/// Digest width produced by the streaming hash primitive
pub const DIGEST_LEN: usize = 32;

/// Maximum supported struct nesting depth (including the root level)
pub const MAX_DEPTH: usize = 5;

static_assertions::const_assert!(MAX_DEPTH >= 1);

/// Streaming hash primitive consumed by the [engine][super::Engine],
/// initialised via [Default], fed incrementally, finalised once
pub trait StreamHash: Default {
    /// Fold bytes into the accumulator
    fn update(&mut self, data: &[u8]);

    /// Finalise the accumulator into a fixed-width digest
    fn finalize(self) -> [u8; DIGEST_LEN];
}

/// Keccak-256 streaming hash, the canonical typed-data primitive
impl StreamHash for Keccak256 {
    fn update(&mut self, data: &[u8]) {
        Digest::update(self, data)
    }

    fn finalize(self) -> [u8; DIGEST_LEN] {
        Digest::finalize(self).into()
    }
}

/// Bounded stack of hash accumulators, one frame per active nesting level
pub struct HashStack<H: StreamHash = Keccak256, const N: usize = MAX_DEPTH> {
    frames: Vec<H, N>,
}

impl<H: StreamHash, const N: usize> HashStack<H, N> {
    /// Create a new (empty) hash stack
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Discard all frames
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Fetch the count of active nesting levels
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open an accumulator for a newly entered level
    pub fn push(&mut self) -> Result<(), Error> {
        self.frames
            .push(H::default())
            .map_err(|_| Error::InsufficientMemory)
    }

    /// Fold a word into the accumulator governing the current level
    pub fn fold(&mut self, word: &[u8]) -> Result<(), Error> {
        match self.frames.last_mut() {
            Some(h) => {
                h.update(word);
                Ok(())
            }
            None => Err(Error::InvalidState),
        }
    }

    /// Close the current level, returning its digest
    pub fn pop(&mut self) -> Result<[u8; DIGEST_LEN], Error> {
        match self.frames.pop() {
            Some(h) => Ok(h.finalize()),
            None => Err(Error::InvalidState),
        }
    }
}
