#![no_main]

use html::{Dom, tokenize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let _ = tokenize(input);
    let dom = Dom::parse_fragment(input);
    // Whatever the builder produced has to serialize and reparse cleanly.
    let once = dom.inner_html(dom.root());
    let again = Dom::parse_fragment(&once);
    let _ = again.inner_html(again.root());
});
