#![no_main]

//! Wire parser fuzzer.
//!
//! Feeds arbitrary text to the init and snapshot parsers. The parsers may
//! reject input with an error but must never panic, and any snapshot they
//! accept must survive a render/parse round trip unchanged.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scrapper::protocol;

/// Structured input for protocol fuzzing.
#[derive(Arbitrary, Debug)]
struct ProtocolInput {
    /// Grid width seed (capped to keep cell counts small).
    width: u8,
    /// Grid height seed.
    height: u8,
    /// Raw text handed to the parsers.
    text: String,
}

fuzz_target!(|input: ProtocolInput| {
    let width = u16::from(input.width % 8) + 1;
    let height = u16::from(input.height % 8) + 1;

    // Totality: arbitrary text is an error at worst, never a panic
    let _ = protocol::parse_init(&input.text);

    if let Ok(snapshot) = protocol::parse_snapshot(&input.text, width, height) {
        // Accepted input renders canonically and parses back to itself
        let wire = protocol::render_snapshot(&snapshot);
        let reparsed = protocol::parse_snapshot(&wire, width, height)
            .expect("rendered snapshot failed to parse");
        assert_eq!(reparsed, snapshot, "wire round trip changed the snapshot");
    }
});
