//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{AppFlags, AppInfoReq, AppInfoResp},
    sign::{
        ChunkFlags, SignComplete, SignFieldChunk, SignHashReq, SignHashResp, SignInfo, SignInfoReq,
        SignInit,
    },
    state::SignState,
};
