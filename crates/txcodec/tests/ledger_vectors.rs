// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Ledger golden vectors: byte-exact reference encodings of the built-in
// schema set (version 1).
//
// Each vector is decoded, checked field by field, re-encoded and compared
// against the input bytes.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::missing_panics_doc)]

use txcodec::error::DecodeError;
use txcodec::ledger::{self, LEDGER_SCHEMA_VERSION};
use txcodec::{CodecError, Codecs, ErrorKind, Value};

/// One transaction: 1 input, 1 output carrying a native asset, fee, ttl,
/// network id, one vkey witness, `is_valid`, memo "hello".
const TRANSACTION_HEX: &[&str] = &[
    "0001111111111111111111111111111111111111111111111111111111111111",
    "1111000000000001611c22222222222222222222222222222222222222222222",
    "222222222222ba32983e00000000000f42400100013333333333333333333333",
    "3333333333333333333333333333333333000104544f4b4e000000000000002a",
    "0000000000000298100100000000000013880001010100014444444444444444",
    "4444444444444444444444444444444444444444444444445555555555555555",
    "5555555555555555555555555555555555555555555555555555555555555555",
    "5555555555555555555555555555555555555555555555550001000568656c6c",
    "6f",
];

/// The same transaction without memo, followed by a second one with no
/// outputs, no witnesses and `is_valid = false`.
const BATCH_HEX: &[&str] = &[
    "0001111111111111111111111111111111111111111111111111111111111111",
    "1111000000000001611c22222222222222222222222222222222222222222222",
    "222222222222ba32983e00000000000f42400100013333333333333333333333",
    "3333333333333333333333333333333333000104544f4b4e000000000000002a",
    "0000000000000298100100000000000013880001010100014444444444444444",
    "4444444444444444444444444444444444444444444444445555555555555555",
    "5555555555555555555555555555555555555555555555555555555555555555",
    "5555555555555555555555555555555555555555555555550001000166666666",
    "6666666666666666666666666666666666666666666666666666666600000003",
    "00000000000000030d40000000000000",
];

/// Address: header 0x61, 28-byte payload, CRC-32 0xba32983e.
const ADDRESS_HEX: &str = "611c22222222222222222222222222222222222222222222222222222222ba32983e";

fn unhex(parts: &[&str]) -> Vec<u8> {
    hex::decode(parts.concat()).expect("valid hex")
}

fn codecs() -> &'static Codecs {
    ledger::codecs().expect("ledger schema set")
}

fn uint(value: &Value, path: &[&str]) -> u64 {
    let mut current = value;
    for name in path {
        current = current
            .field(name)
            .unwrap_or_else(|| panic!("missing field {}", name));
    }
    current.as_uint().expect("uint")
}

#[test]
fn test_schema_version() {
    assert_eq!(LEDGER_SCHEMA_VERSION, 1);
}

#[test]
fn test_transaction_vector() {
    let bytes = unhex(TRANSACTION_HEX);
    assert_eq!(bytes.len(), 257);

    let tx = codecs()
        .decode_named("Transaction", &bytes)
        .expect("golden transaction decodes");

    assert_eq!(uint(&tx, &["body", "fee"]), 170_000);
    assert_eq!(uint(&tx, &["body", "ttl"]), 5_000);
    assert_eq!(uint(&tx, &["body", "network_id"]), 1);
    assert!(tx.field("body").and_then(|b| b.field("certs")).is_none());
    assert_eq!(tx.field("is_valid"), Some(&Value::Bool(true)));
    assert_eq!(tx.field("memo").and_then(Value::as_text), Some("hello"));

    let outputs = tx
        .field("body")
        .and_then(|b| b.field("outputs"))
        .and_then(Value::as_sequence)
        .expect("outputs");
    assert_eq!(outputs.len(), 1);
    assert_eq!(uint(&outputs[0], &["amount", "coin"]), 1_000_000);
    assert_eq!(uint(&outputs[0], &["address", "checksum"]), 0xba32983e);

    let multiasset = outputs[0]
        .field("amount")
        .and_then(|a| a.field("multiasset"))
        .and_then(Value::as_map)
        .expect("multiasset");
    let (policy, assets) = &multiasset[0];
    assert_eq!(policy.as_bytes(), Some(&[0x33u8; 28][..]));
    let (name, quantity) = &assets.as_map().expect("assets")[0];
    assert_eq!(name.as_bytes(), Some(&b"TOKN"[..]));
    assert_eq!(quantity, &Value::Uint(42));

    let reencoded = codecs().encode(&tx, "Transaction").expect("encode");
    assert_eq!(reencoded, bytes);
}

#[test]
fn test_transaction_without_memo() {
    let mut bytes = unhex(TRANSACTION_HEX);
    bytes.truncate(bytes.len() - 7);
    let tx = codecs()
        .decode_named("Transaction", &bytes)
        .expect("memo is optional");
    assert!(tx.field("memo").is_none());
    assert_eq!(codecs().encode(&tx, "Transaction").expect("encode"), bytes);
}

#[test]
fn test_transaction_trailing_bytes_after_memo() {
    let mut bytes = unhex(TRANSACTION_HEX);
    bytes.push(0x00);
    let err = codecs().decode_named("Transaction", &bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingBytes);
}

#[test]
fn test_truncated_transaction_error_chain() {
    let bytes = unhex(TRANSACTION_HEX);
    let err = codecs()
        .decode_named("Transaction", &bytes[..100])
        .unwrap_err();
    let CodecError::Decode { type_name, source } = &err else {
        panic!("decode error expected, got {:?}", err);
    };
    assert_eq!(type_name, "Transaction");
    assert_eq!(
        source.path(),
        "Transaction.body -> TransactionBody.outputs -> TransactionOutputs[0] -> \
         TransactionOutput.amount -> Value.multiasset -> MultiAsset[0].key"
    );
    assert_eq!(
        source.root_cause(),
        &DecodeError::OutOfBounds {
            offset: 85,
            requested: 28,
            available: 15
        }
    );
}

#[test]
fn test_batch_vector() {
    let bytes = unhex(BATCH_HEX);
    let batch = codecs()
        .decode_named("TransactionBatch", &bytes)
        .expect("golden batch decodes");
    let txs = batch.as_sequence().expect("sequence");
    assert_eq!(txs.len(), 2);
    assert_eq!(uint(&txs[0], &["body", "fee"]), 170_000);
    assert_eq!(uint(&txs[1], &["body", "fee"]), 200_000);
    assert_eq!(txs[1].field("is_valid"), Some(&Value::Bool(false)));
    assert_eq!(codecs().encode(&batch, "TransactionBatch").expect("encode"), bytes);

    // Cutting into the second transaction is reported at its index.
    let err = codecs()
        .decode_named("TransactionBatch", &bytes[..bytes.len() - 3])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    let CodecError::Decode { source, .. } = &err else {
        panic!("decode error expected");
    };
    assert!(source.path().starts_with("TransactionBatch[1]"));
}

#[test]
fn test_address_checksum() {
    let bytes = hex::decode(ADDRESS_HEX).expect("hex");
    codecs().decode_named("Address", &bytes).expect("checksum holds");

    let mut corrupted = bytes.clone();
    corrupted[5] ^= 0xFF;
    let err = codecs().decode_named("Address", &corrupted).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].rule, "crc32");
    assert_eq!(err.violations()[0].path, "Address");
}

#[test]
fn test_address_collects_every_violation() {
    // Unknown network nibble, wrong checksum: two rules on two nodes.
    let mut bytes = hex::decode(ADDRESS_HEX).expect("hex");
    bytes[0] = 0x67;
    let err = codecs().decode_named("Address", &bytes).unwrap_err();
    let rules: Vec<&str> = err.violations().iter().map(|v| v.rule.as_str()).collect();
    assert_eq!(rules, vec!["crc32", "network_id"]);
}

#[test]
fn test_unknown_credential_tag() {
    let mut bytes = vec![0x02];
    bytes.extend_from_slice(&[0xAA; 28]);
    let err = codecs().decode_named("Credential", &bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariantTag);

    bytes[0] = 0x01;
    let credential = codecs().decode_named("Credential", &bytes).expect("script");
    assert_eq!(credential.variant_arm(), Some("Script"));
}

#[test]
fn test_empty_inputs_rejected_by_validation() {
    let bytes = [
        0x00, 0x00, // no inputs
        0x00, 0x00, // no outputs
        0, 0, 0, 0, 0, 0, 0, 1, // fee
        0x00, 0x00, 0x00, // no ttl, certs, network id
    ];
    let body = codecs()
        .decode_structural("TransactionBody", &bytes)
        .expect("structurally valid");
    assert_eq!(uint(&body, &["fee"]), 1);

    let err = codecs().decode_named("TransactionBody", &bytes).unwrap_err();
    assert_eq!(err.violations()[0].path, "TransactionBody.inputs");
    assert_eq!(err.violations()[0].rule, "non_empty");
}

#[test]
fn test_tagged_result_for_host() {
    let bytes = unhex(TRANSACTION_HEX);
    let ok = codecs().decode_tagged("Transaction", &bytes);
    let json = serde_json::to_value(&ok).expect("json");
    assert_eq!(json["kind"], "ok");
    assert_eq!(json["value"]["memo"], "hello");
    assert_eq!(json["value"]["body"]["fee"], 170_000);

    let err = codecs().decode_tagged("Transaction", &bytes[..10]);
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["kind"], "error");
    let message = json["message"].as_str().expect("message");
    assert!(message.starts_with("Transaction.from_bytes() raised Transaction.body:"));
    assert!(message.contains("out of bounds"));
}
