#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;

use formpath::{DecodeOptions, Decoder, Dynamic, Form, FormValues};

#[derive(Form, Default)]
struct Inner {
    name: String,
    flags: [bool; 4],
}

#[derive(Form, Default)]
struct Target {
    id: i64,
    ratio: f32,
    inner: Inner,
    items: Vec<Inner>,
    by_name: HashMap<String, Vec<u8>>,
    by_id: HashMap<u16, Option<Inner>>,
    open: Dynamic,
}

fn fuzz_options(ignore_unknown_keys: bool) -> DecodeOptions {
    DecodeOptions {
        ignore_unknown_keys,
        max_container_size: Some(1 << 10),
        ..DecodeOptions::default()
    }
}

// Input: lines of `path=value`; the first byte picks the options.
fuzz_target!(|data: &[u8]| {
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let mut values = FormValues::new();
    for line in text.lines().take(64) {
        let (path, value) = line.split_once('=').unwrap_or((line, ""));
        values.append(path, value);
    }

    let decoder = Decoder::new(fuzz_options(mode & 1 == 1));
    let mut target = Target::default();
    if let Err(err) = decoder.decode(&values, &mut target) {
        let _ = err.code();
        let _ = err.to_string();
    }
});
