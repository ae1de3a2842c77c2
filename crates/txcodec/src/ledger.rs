// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in ledger schema set.
//!
//! Transaction primitives of a UTXO ledger, versioned as a whole by
//! [`LEDGER_SCHEMA_VERSION`]. The set is built once per process and shared
//! through [`codecs`].
//!
//! Layout conventions used by every type below:
//!
//! - hashes and keys are fixed-length byte strings (no prefix)
//! - lists carry a `uint16` count, maps a `uint16` entry count
//! - optional fields use a one-byte presence flag, except the transaction memo
//!   which is present iff bytes remain
//! - every variant uses a `uint8` discriminant
//!
//! `NativeScript`, `NativeScripts` and `ScriptNOfK` refer to each other, so
//! scripts nest to any depth up to the configured limit.

use crate::dispatch::Codecs;
use crate::error::RegistryError;
use crate::primitive::{BytesSpec, IntKind, LengthBound};
use crate::registry::Registry;
use crate::schema::{Codec, CountSource, StructBuilder, VariantBuilder};
use crate::validate::Rule;
use crate::value::Value;
use std::sync::OnceLock;

/// Version of the embedded schema set. Bumped on any wire-visible change.
pub const LEDGER_SCHEMA_VERSION: u32 = 1;

/// Total supply cap, in the smallest unit.
pub const MAX_COIN: u64 = 45_000_000_000_000_000;

/// Network ids accepted in address headers and transaction bodies.
pub const NETWORK_IDS: [u64; 2] = [0, 1];

fn list(name: &str, element: &str) -> Codec {
    Codec::repeated(name, element, CountSource::Prefixed(IntKind::U16))
}

fn fixed(name: &str, len: usize) -> Codec {
    Codec::bytes(name, BytesSpec::fixed(len))
}

/// Low nibble of an address header is the network id.
fn check_network_nibble(value: &Value) -> Result<(), String> {
    let header = value.as_uint().ok_or("header is not an integer")?;
    let network = header & 0x0F;
    if NETWORK_IDS.contains(&network) {
        Ok(())
    } else {
        Err(format!("unknown network id {} in header {:#04x}", network, header))
    }
}

/// `n` cannot exceed the number of scripts it selects from.
fn check_n_of_k(value: &Value) -> Result<(), String> {
    let n = value
        .field("n")
        .and_then(Value::as_uint)
        .ok_or("missing n")?;
    let k = value
        .field("native_scripts")
        .and_then(Value::len)
        .ok_or("missing native_scripts")? as u64;
    if n > k {
        return Err(format!("requires {} of only {} scripts", n, k));
    }
    Ok(())
}

/// Every codec of the ledger schema set, primitives excluded.
pub fn schema() -> Vec<Codec> {
    vec![
        // Scalars and hashes
        Codec::int("Coin", IntKind::U64).rule(Rule::IntRange {
            min: 0,
            max: i128::from(MAX_COIN),
        }),
        Codec::int("NetworkId", IntKind::U8).rule(Rule::OneOf(NETWORK_IDS.to_vec())),
        Codec::int("AddressHeader", IntKind::U8)
            .rule(Rule::custom("network_id", check_network_nibble)),
        fixed("Hash28", 28),
        fixed("Hash32", 32),
        fixed("Ed25519KeyHash", 28),
        fixed("ScriptHash", 28),
        fixed("TransactionHash", 32),
        fixed("Vkey", 32),
        fixed("Ed25519Signature", 64),
        Codec::bytes(
            "AddressPayload",
            BytesSpec::prefixed(IntKind::U8).bounded(LengthBound::between(28, 64)),
        ),
        Codec::bytes(
            "AssetName",
            BytesSpec::prefixed(IntKind::U8).bounded(LengthBound::at_most(32)),
        ),
        Codec::text(
            "Memo",
            BytesSpec::prefixed(IntKind::U16).bounded(LengthBound::at_most(256)),
        ),
        // Addresses and credentials
        VariantBuilder::new("Credential", IntKind::U8)
            .arm(0, "KeyHash", "Ed25519KeyHash")
            .arm(1, "Script", "ScriptHash")
            .build(),
        StructBuilder::new("Address")
            .field("header", "AddressHeader")
            .field("payload", "AddressPayload")
            .field("checksum", "uint32")
            .rule(Rule::crc32(["header", "payload"], "checksum"))
            .build(),
        // Inputs and outputs
        StructBuilder::new("TransactionInput")
            .field("transaction_id", "TransactionHash")
            .field("index", "uint32")
            .build(),
        list("TransactionInputs", "TransactionInput").rule(Rule::NonEmpty),
        Codec::map("Assets", "AssetName", "uint64", IntKind::U16),
        Codec::map("MultiAsset", "ScriptHash", "Assets", IntKind::U16),
        StructBuilder::new("Value")
            .field("coin", "Coin")
            .optional("multiasset", "MultiAsset")
            .build(),
        StructBuilder::new("TransactionOutput")
            .field("address", "Address")
            .field("amount", "Value")
            .optional("datum_hash", "Hash32")
            .build(),
        list("TransactionOutputs", "TransactionOutput"),
        // Scripts
        VariantBuilder::new("NativeScript", IntKind::U8)
            .arm(0, "ScriptPubkey", "Ed25519KeyHash")
            .arm(1, "ScriptAll", "NativeScripts")
            .arm(2, "ScriptAny", "NativeScripts")
            .arm(3, "ScriptNOfK", "ScriptNOfK")
            .arm(4, "TimelockStart", "uint64")
            .arm(5, "TimelockExpiry", "uint64")
            .build(),
        list("NativeScripts", "NativeScript"),
        StructBuilder::new("ScriptNOfK")
            .field("n", "uint32")
            .field("native_scripts", "NativeScripts")
            .rule(Rule::custom("n_of_k", check_n_of_k))
            .build(),
        // Certificates
        StructBuilder::new("StakeDelegation")
            .field("stake_credential", "Credential")
            .field("pool_keyhash", "Ed25519KeyHash")
            .build(),
        VariantBuilder::new("Certificate", IntKind::U8)
            .arm(0, "StakeRegistration", "Credential")
            .arm(1, "StakeDeregistration", "Credential")
            .arm(2, "StakeDelegation", "StakeDelegation")
            .build(),
        list("Certificates", "Certificate"),
        // Witnesses
        StructBuilder::new("Vkeywitness")
            .field("vkey", "Vkey")
            .field("signature", "Ed25519Signature")
            .build(),
        list("Vkeywitnesses", "Vkeywitness"),
        StructBuilder::new("TransactionWitnessSet")
            .optional("vkeys", "Vkeywitnesses")
            .optional("native_scripts", "NativeScripts")
            .build(),
        // Transactions
        StructBuilder::new("TransactionBody")
            .field("inputs", "TransactionInputs")
            .field("outputs", "TransactionOutputs")
            .field("fee", "Coin")
            .optional("ttl", "uint64")
            .optional("certs", "Certificates")
            .optional("network_id", "NetworkId")
            .build(),
        StructBuilder::new("Transaction")
            .field("body", "TransactionBody")
            .field("witness_set", "TransactionWitnessSet")
            .field("is_valid", "bool")
            .trailing("memo", "Memo")
            .whole_buffer()
            .build(),
        StructBuilder::new("BatchedTransaction")
            .field("body", "TransactionBody")
            .field("witness_set", "TransactionWitnessSet")
            .field("is_valid", "bool")
            .build(),
        Codec::repeated(
            "TransactionBatch",
            "BatchedTransaction",
            CountSource::UntilExhausted,
        )
        .whole_buffer(),
    ]
}

/// Build and verify a fresh registry: primitives plus [`schema`].
pub fn registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::with_primitives();
    registry.register_all(schema())?;
    registry.verify()?;
    log::debug!(
        "[txcodec] ledger schema v{} ready ({} types)",
        LEDGER_SCHEMA_VERSION,
        registry.len()
    );
    Ok(registry)
}

static CODECS: OnceLock<Result<Codecs, RegistryError>> = OnceLock::new();

/// Process-wide facade over the ledger schema set, built on first use.
pub fn codecs() -> Result<&'static Codecs, RegistryError> {
    CODECS
        .get_or_init(|| registry().map(Codecs::new))
        .as_ref()
        .map_err(Clone::clone)
}
