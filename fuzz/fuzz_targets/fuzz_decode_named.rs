// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use txcodec::ledger;

fuzz_target!(|data: &[u8]| {
    let Ok(codecs) = ledger::codecs() else {
        return;
    };
    let Some((selector, input)) = data.split_first() else {
        return;
    };

    // First byte picks the type, the rest is the buffer.
    let names = codecs.registry().names();
    let name = names[usize::from(*selector) % names.len()];

    let _ = codecs.decode_named(name, input);
    let _ = codecs.decode_tagged(name, input);
});
