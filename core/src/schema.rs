// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Schema-facing data model shared between the [engine][crate::engine] and
//! the external schema walker.
//!
//! The walker owns type-tree registration and path bookkeeping; the engine
//! only ever borrows the descriptor for the current leaf field and follows
//! the walker's [Advance] reports to mirror struct nesting in its hash
//! stack.

use strum::{Display, EnumIter, EnumString};

/// Field type tags for typed-data leaves and nested structs
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumIter)]
pub enum FieldKind {
    /// Signed integer, sign-extended to the canonical word
    Int,
    /// Unsigned integer, zero-extended to the canonical word
    Uint,
    /// Fixed-width byte string, left-aligned in the canonical word
    FixedBytes,
    /// Address, zero-extended to the canonical word
    Address,
    /// Boolean, canonical word `0x00..00` / `0x00..01`
    Bool,
    /// UTF-8 string, hashed progressively
    String,
    /// Variable-length byte string, hashed progressively
    DynamicBytes,
    /// Nested struct, digest folded into the parent as a single word
    Struct,
}

impl FieldKind {
    /// Dynamic kinds fold a content digest rather than an encoded word,
    /// and may span multiple transport chunks
    pub const fn is_dynamic(&self) -> bool {
        matches!(
            self,
            FieldKind::String | FieldKind::DynamicBytes | FieldKind::Struct
        )
    }
}

/// Descriptor for the walker's current field, borrowed by the engine and
/// never mutated
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FieldDescriptor<'a> {
    /// Field name, used only for domain-separator field matching and display
    pub name: &'a str,

    /// Field type tag
    pub kind: FieldKind,

    /// Declared byte width for integer / fixed-bytes kinds (zero otherwise)
    pub width: u8,
}

impl<'a> FieldDescriptor<'a> {
    /// Create a new field descriptor
    pub const fn new(name: &'a str, kind: FieldKind, width: u8) -> Self {
        Self { name, kind, width }
    }

    /// Check whether this field takes the progressive-hash path
    pub const fn is_dynamic(&self) -> bool {
        self.kind.is_dynamic()
    }
}

/// Path movement report returned by [`Walker::advance`][crate::engine::Walker::advance].
///
/// `exit` counts nested struct levels closed by the completed field, `enter`
/// counts levels opened on the way down to the next leaf. The root level is
/// never reported; message completion is signalled by `current_field`
/// returning `None`.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Advance {
    /// Nested struct levels completed
    pub exit: u8,
    /// Nested struct levels entered
    pub enter: u8,
}

impl Advance {
    /// Movement to a sibling leaf at the same depth
    pub const fn next() -> Self {
        Self { exit: 0, enter: 0 }
    }
}
