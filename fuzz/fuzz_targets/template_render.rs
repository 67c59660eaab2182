#![no_main]

use libfuzzer_sys::fuzz_target;
use template::{RenderOptions, Template, Value};

// Input layout: markup, a NUL byte, then a JSON data record.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let (markup, json) = input.split_once('\0').unwrap_or((input, "{}"));
    let Ok(json) = serde_json::from_str::<serde_json::Value>(json) else {
        return;
    };
    let template = Template::from_markup(markup);
    let data = Value::from(json);
    for accept_html in [false, true] {
        let options = RenderOptions::default().with_accept_html(accept_html);
        let _ = template.create(Some(&data), &options);
    }
});
