// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Canonical encoding of completed static leaf values.
//!
//! Each static field canonicalizes to a fixed 32-byte word before folding
//! into the enclosing accumulator. Dispatch is a closed match over the
//! static kinds; dynamic kinds (strings, byte arrays, nested structs) hash
//! their content instead and must never reach this path.

use crate::schema::FieldKind;

use super::hash_stack::DIGEST_LEN;
use super::Error;

/// Canonical encoded word width
pub const WORD_LEN: usize = 32;

/// Canonical encoded word for a static leaf value
pub type Word = [u8; WORD_LEN];

// Dynamic-field digests fold as words, so the widths must agree
static_assertions::const_assert_eq!(WORD_LEN, DIGEST_LEN);

/// Canonicalize a completed static leaf value into a [Word]
///
/// `width` is the declared byte width from the field descriptor, `data` the
/// received value bytes. Pure transform, no state, no allocation beyond the
/// output word.
pub fn encode_field(kind: FieldKind, width: u8, data: &[u8]) -> Result<Word, Error> {
    if data.len() > WORD_LEN {
        return Err(Error::InvalidData);
    }

    match kind {
        FieldKind::Int => encode_int(data, width),
        FieldKind::Uint => encode_uint(data, width),
        FieldKind::FixedBytes => encode_bytes(data, width),
        FieldKind::Address => encode_address(data),
        FieldKind::Bool => encode_bool(data),
        // Dynamic kinds hash their content and never take the static path
        _ => Err(Error::InvalidData),
    }
}

/// Sign-extend a big-endian signed integer to the word width
fn encode_int(data: &[u8], width: u8) -> Result<Word, Error> {
    if width as usize > WORD_LEN || data.len() > width as usize {
        return Err(Error::InvalidData);
    }

    let mut w = [0u8; WORD_LEN];

    // Extend with the sign of the most significant received byte
    if let Some(first) = data.first() {
        if first & 0x80 != 0 {
            w.fill(0xff);
        }
    }

    w[WORD_LEN - data.len()..].copy_from_slice(data);

    Ok(w)
}

/// Zero-extend a big-endian unsigned integer to the word width
fn encode_uint(data: &[u8], width: u8) -> Result<Word, Error> {
    if width as usize > WORD_LEN || data.len() > width as usize {
        return Err(Error::InvalidData);
    }

    let mut w = [0u8; WORD_LEN];
    w[WORD_LEN - data.len()..].copy_from_slice(data);

    Ok(w)
}

/// Left-align a fixed-width byte string, zero-padded on the right
fn encode_bytes(data: &[u8], width: u8) -> Result<Word, Error> {
    if width as usize > WORD_LEN || data.len() > width as usize {
        return Err(Error::InvalidData);
    }

    let mut w = [0u8; WORD_LEN];
    w[..data.len()].copy_from_slice(data);

    Ok(w)
}

/// Zero-extend an address to the word width
fn encode_address(data: &[u8]) -> Result<Word, Error> {
    let mut w = [0u8; WORD_LEN];
    w[WORD_LEN - data.len()..].copy_from_slice(data);

    Ok(w)
}

/// Encode a boolean, all bytes zero bar the last at `0x00` / `0x01`
fn encode_bool(data: &[u8]) -> Result<Word, Error> {
    if data.len() != 1 {
        return Err(Error::InvalidData);
    }

    let mut w = [0u8; WORD_LEN];
    w[WORD_LEN - 1] = (data[0] != 0) as u8;

    Ok(w)
}
