#![no_main]

use folio_doc::markup::{parse_fragment, serialize_fragment};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }

    // Parsing must never panic.
    let Ok(nodes) = parse_fragment(text) else {
        return;
    };

    // Serialized output is canonical: it reparses to the same tree and
    // serializes to the same bytes.
    let canonical = serialize_fragment(&nodes);
    let reparsed = parse_fragment(&canonical).expect("canonical markup must reparse");
    assert_eq!(serialize_fragment(&reparsed), canonical, "serialization not stable");
});
