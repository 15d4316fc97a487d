#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, HashMap};

use formpath::{decode, form_values, BoxError, ErrorCode, Form, TextDecode};

/// A 16-byte identifier written as 32 hex digits.
#[derive(Form, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[form(text)]
struct Uuid([u8; 16]);

impl TextDecode for Uuid {
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        if text.len() != 32 {
            return Err(format!("text must be exactly 16 bytes long, got {} bytes", text.len()).into());
        }
        for (i, byte) in self.0.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16)?;
        }
        Ok(())
    }
}

/// `f32` keyed by its bit pattern, since floats are not `Eq + Hash`.
#[derive(Form, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[form(text)]
struct FloatKey(u32);

impl FloatKey {
    fn value(self) -> f32 {
        f32::from_bits(self.0)
    }
}

impl TextDecode for FloatKey {
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        self.0 = text.parse::<f32>()?.to_bits();
        Ok(())
    }
}

const UUID_TEXT: &str = "11e5bf2d3e403a8c86740023dffe5350";

fn uuid() -> Uuid {
    let mut id = Uuid::default();
    id.decode_text(UUID_TEXT).unwrap();
    id
}

#[derive(Form, Default, Debug)]
struct Maps {
    map: HashMap<String, String>,
    map_with_slice: HashMap<String, Vec<String>>,
    map_with_multi_dimension_slice: HashMap<String, Vec<Vec<String>>>,
    map_with_array: HashMap<String, [i32; 2]>,
    map_with_int_key: HashMap<isize, String>,
    map_with_int8_key: HashMap<i8, String>,
    map_with_int64_ptr_key: HashMap<Option<i64>, String>,
    map_with_uint_key: HashMap<usize, String>,
    map_with_uint8_key: HashMap<u8, String>,
    map_with_uint32_ptr_key: HashMap<Box<u32>, String>,
    map_with_float_key: HashMap<FloatKey, String>,
    map_with_boolean_key: HashMap<bool, String>,
    map_with_custom_key: HashMap<Uuid, String>,
    map_with_custom_key_pointer: HashMap<Option<Uuid>, String>,
    by_bracket: HashMap<String, HashMap<i32, HashMap<u32, HashMap<bool, Option<String>>>>>,
    by_point: HashMap<String, HashMap<i32, HashMap<u32, HashMap<bool, String>>>>,
    ordered: BTreeMap<u16, String>,
}

#[test]
fn decode_string_keyed_maps() {
    let values = form_values! {
        "map[by.bracket.with.point]" => "by bracket",
        "map.by_point" => "by point",
        "map_with_slice[slice][0]" => "map with slice",
        "map_with_multi_dimension_slice[slice][0][1]" => "map with multidimension slice",
        "map_with_array[array][0]" => "0",
        "map_with_array[array][1]" => "1",
    };
    let mut m = Maps::default();
    decode(&values, &mut m).unwrap();

    assert_eq!(m.map["by.bracket.with.point"], "by bracket");
    assert_eq!(m.map["by_point"], "by point");
    assert_eq!(m.map_with_slice["slice"], ["map with slice"]);
    assert_eq!(
        m.map_with_multi_dimension_slice["slice"],
        [vec![String::new(), "map with multidimension slice".to_owned()]]
    );
    assert_eq!(m.map_with_array["array"], [0, 1]);
}

#[test]
fn decode_typed_keys() {
    let values = form_values! {
        "map_with_int_key[-1]" => "int key in map",
        "map_with_int8_key[-1]" => "int8 key in map",
        "map_with_int64_ptr_key[-1]" => "int64 ptr key in map",
        "map_with_uint_key[1]" => "uint key in map",
        "map_with_uint8_key[1]" => "uint8 key in map",
        "map_with_uint32_ptr_key[1]" => "uint32 ptr key in map",
        "map_with_float_key[3.14]" => "float key in map",
        "map_with_boolean_key[true]" => "bool key in map",
        "map_with_custom_key[11e5bf2d3e403a8c86740023dffe5350]" => "UUID key in map",
        "map_with_custom_key_pointer[11e5bf2d3e403a8c86740023dffe5350]" => "UUID key pointer in map",
        "ordered[7]" => "seven",
        "ordered[3]" => "three",
    };
    let mut m = Maps::default();
    decode(&values, &mut m).unwrap();

    assert_eq!(m.map_with_int_key[&-1], "int key in map");
    assert_eq!(m.map_with_int8_key[&-1], "int8 key in map");
    assert_eq!(m.map_with_int64_ptr_key[&Some(-1_i64)], "int64 ptr key in map");
    assert_eq!(m.map_with_uint_key[&1], "uint key in map");
    assert_eq!(m.map_with_uint8_key[&1], "uint8 key in map");
    assert_eq!(m.map_with_uint32_ptr_key[&Box::new(1_u32)], "uint32 ptr key in map");
    let (key, value) = m.map_with_float_key.iter().next().unwrap();
    assert!((key.value() - 3.14).abs() < f32::EPSILON);
    assert_eq!(value, "float key in map");
    assert_eq!(m.map_with_boolean_key[&true], "bool key in map");
    assert_eq!(m.map_with_custom_key[&uuid()], "UUID key in map");
    assert_eq!(
        m.map_with_custom_key_pointer[&Some(uuid())],
        "UUID key pointer in map"
    );
    assert_eq!(
        m.ordered.values().map(String::as_str).collect::<Vec<_>>(),
        ["three", "seven"]
    );
}

#[test]
fn nested_typed_keys_by_bracket_and_by_point() {
    let values = form_values! {
        "by_bracket[by-bracket][1][2][true]" => "traverse over map by bracket is recursive too",
        "by_point.by-point.1.2.true" => "traverse over map by point is recursive too",
    };
    let mut m = Maps::default();
    decode(&values, &mut m).unwrap();

    assert_eq!(
        m.by_bracket["by-bracket"][&1][&2][&true].as_deref(),
        Some("traverse over map by bracket is recursive too")
    );
    assert_eq!(
        m.by_point["by-point"][&1][&2][&true],
        "traverse over map by point is recursive too"
    );
}

#[derive(Form, Default, Debug, PartialEq)]
struct Pair {
    a: String,
    b: String,
}

#[test]
fn repeated_typed_key_addresses_one_entry() {
    #[derive(Form, Default)]
    struct Holder {
        pairs: HashMap<i32, Pair>,
        lists: HashMap<u8, Vec<String>>,
    }

    let values = form_values! {
        "pairs[1].a" => "x",
        "pairs[1].b" => "y",
        "pairs[2].a" => "z",
        "lists[5][0]" => "first",
        "lists[5][1]" => "second",
    };
    let mut h = Holder::default();
    decode(&values, &mut h).unwrap();

    assert_eq!(h.pairs.len(), 2);
    assert_eq!(
        h.pairs[&1],
        Pair {
            a: "x".to_owned(),
            b: "y".to_owned()
        }
    );
    assert_eq!(h.pairs[&2].a, "z");
    assert_eq!(h.lists[&5], ["first", "second"]);
}

#[test]
fn existing_entries_are_replaced_by_typed_keys() {
    let mut m = Maps::default();
    m.map_with_uint8_key.insert(1, "old".to_owned());
    m.map_with_uint8_key.insert(2, "kept".to_owned());
    decode(&form_values! { "map_with_uint8_key[1]" => "new" }, &mut m).unwrap();
    assert_eq!(m.map_with_uint8_key[&1], "new");
    assert_eq!(m.map_with_uint8_key[&2], "kept");
}

#[test]
fn bracketed_key_may_contain_brackets() {
    let mut m = Maps::default();
    decode(&form_values! { "map[a[b]]" => "nested" }, &mut m).unwrap();
    assert_eq!(m.map["a[b]"], "nested");
}

#[test]
fn key_decode_failure_reports_mapping_field_and_path() {
    let mut m = Maps::default();
    let err = decode(&form_values! { "map_with_uint8_key[300]" => "x" }, &mut m).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Range);
    assert_eq!(err.field(), "map_with_uint8_key");
    assert_eq!(err.path(), "map_with_uint8_key[300]");
    assert_eq!(
        err.to_string(),
        format!("form decode failed: field=map_with_uint8_key; path=map_with_uint8_key[300]: {}", err.message())
    );
    assert!(m.map_with_uint8_key.is_empty());

    let err = decode(&form_values! { "map_with_custom_key[abc]" => "x" }, &mut m).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conversion);
    assert_eq!(err.field(), "map_with_custom_key");
    assert!(std::error::Error::source(&err).is_some());
}

#[cfg(all(feature = "chrono", feature = "url"))]
#[test]
fn date_and_url_keys() {
    use chrono::NaiveDate;
    use url::Url;

    #[derive(Form, Default)]
    struct Keys {
        days: HashMap<NaiveDate, String>,
        links: HashMap<Url, String>,
    }

    let values = form_values! {
        "days[2006-01-02]" => "time key in map",
        "links[http://www.monoculum.com]" => "url key in map",
    };
    let mut k = Keys::default();
    decode(&values, &mut k).unwrap();

    let day = NaiveDate::from_ymd_opt(2006, 1, 2).unwrap();
    assert_eq!(k.days[&day], "time key in map");
    let link = Url::parse("http://www.monoculum.com").unwrap();
    assert_eq!(k.links[&link], "url key in map");
}
