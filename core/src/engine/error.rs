// Copyright (c) 2022-2023 The MobileCoin Foundation

/// [Engine][super::Engine] errors
///
/// All errors are terminal for the in-flight message: the engine does not
/// roll back hash folds already applied, so recovery requires a fresh
/// session.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Hash stack / working memory exhausted
    #[cfg_attr(feature = "thiserror", error("insufficient memory"))]
    InsufficientMemory = 0x00,

    /// Malformed chunk framing or field data
    #[cfg_attr(feature = "thiserror", error("invalid field data"))]
    InvalidData = 0x01,

    /// No current field, or domain validation failed
    #[cfg_attr(feature = "thiserror", error("condition not satisfied"))]
    ConditionNotSatisfied = 0x02,

    /// Unrelated command received while a field was mid-flight
    #[cfg_attr(feature = "thiserror", error("field interrupted"))]
    FieldInterrupted = 0x03,

    /// Unexpected event
    #[cfg_attr(feature = "thiserror", error("unexpected event"))]
    UnexpectedEvent = 0x04,

    /// Invalid engine state
    #[cfg_attr(feature = "thiserror", error("invalid engine state"))]
    InvalidState = 0x05,

    /// Pending user approval
    #[cfg_attr(feature = "thiserror", error("pending user approval"))]
    ApprovalPending = 0x06,
}
