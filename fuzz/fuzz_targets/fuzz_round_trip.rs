// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use txcodec::codec::decode_prefix;
use txcodec::ledger;

fuzz_target!(|data: &[u8]| {
    let Ok(codecs) = ledger::codecs() else {
        return;
    };
    let Some((selector, input)) = data.split_first() else {
        return;
    };
    let names = codecs.registry().names();
    let name = names[usize::from(*selector) % names.len()];

    // Whatever decodes must re-encode to exactly the bytes it consumed.
    if let Ok((value, used)) = decode_prefix(codecs.registry(), codecs.config(), name, input) {
        let bytes = codecs
            .encode(&value, name)
            .expect("decoded value must encode");
        assert_eq!(bytes, &input[..used], "non-canonical encoding of {}", name);
    }
});
