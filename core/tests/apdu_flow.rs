// Copyright (c) 2022-2023 The MobileCoin Foundation

//! End-to-end signing flow driven through APDU wire encodings

use encdec::{Decode, Encode};

use ledger_eip712_apdu::{prelude::*, ApduStatic};
use ledger_eip712_core::engine::{Engine, Event, Output};
use ledger_eip712_core::schema::FieldKind;

mod helpers;
use helpers::*;

#[test]
fn apdu_driven_signing_flow() -> anyhow::Result<()> {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());

    let mut e = Engine::new(
        TestWalker::new(vec![
            leaf("amount", FieldKind::Uint, 32),
            leaf("memo", FieldKind::String, 0),
        ]),
        TestUi::default(),
    );

    let mut buff = [0u8; 256];

    // Start a session over the wire
    let n = SignInit::new(137).encode(&mut buff).expect("encode init");
    let r = e.update(&Event::parse(SignInit::INS, &buff[..n]).expect("parse init"))?;

    let info = decode_info(&r);
    assert_eq!(info.state, SignState::FieldIdle);
    assert_eq!(info.fields, 0);

    // Stream the static field in one exchange
    let chunk = framed(&[0x05]);
    let n = SignFieldChunk::new(ChunkFlags::empty(), &chunk)
        .encode(&mut buff)
        .expect("encode chunk");
    let r = e.update(&Event::parse(SignFieldChunk::INS, &buff[..n]).expect("parse chunk"))?;

    let info = decode_info(&r);
    assert_eq!(info.state, SignState::FieldIdle);
    assert_eq!(info.fields, 1);

    // Stream the dynamic field across two exchanges
    let memo = b"hello typed data";

    let chunk = framed_prefix(memo.len(), &memo[..6]);
    let n = SignFieldChunk::new(ChunkFlags::PARTIAL, &chunk)
        .encode(&mut buff)
        .expect("encode chunk");
    let r = e.update(&Event::parse(SignFieldChunk::INS, &buff[..n]).expect("parse chunk"))?;

    let info = decode_info(&r);
    assert_eq!(info.state, SignState::FieldPartial);

    let n = SignFieldChunk::new(ChunkFlags::empty(), &memo[6..])
        .encode(&mut buff)
        .expect("encode chunk");
    let r = e.update(&Event::parse(SignFieldChunk::INS, &buff[..n]).expect("parse chunk"))?;

    let info = decode_info(&r);
    assert_eq!(info.state, SignState::Pending);
    assert_eq!(info.fields, 2);

    // Approve and fetch the hash over the wire
    e.approve();

    let n = SignHashReq.encode(&mut buff).expect("encode hash req");
    let r = e.update(&Event::parse(SignHashReq::INS, &buff[..n]).expect("parse hash req"))?;

    let mut resp = [0u8; 64];
    let n = r.encode(&mut resp).expect("encode hash resp");
    let (hash, _) = SignHashResp::decode(&resp[..n]).expect("decode hash resp");

    let expected = fold_words(&[word_uint(5), keccak(memo)]);
    assert_eq!(hash.hash, expected);

    // Tear the session down
    let n = SignComplete.encode(&mut buff).expect("encode complete");
    let r = e.update(&Event::parse(SignComplete::INS, &buff[..n]).expect("parse complete"))?;

    let info = decode_info(&r);
    assert_eq!(info.state, SignState::Complete);

    Ok(())
}

/// Encode an engine output and decode it back as a [SignInfo] response
fn decode_info(out: &Output) -> SignInfo {
    let mut buff = [0u8; 64];
    let n = out.encode(&mut buff).expect("encode info");

    let (info, _) = SignInfo::decode(&buff[..n]).expect("decode info");
    info
}
