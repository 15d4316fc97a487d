#![allow(clippy::unwrap_used, clippy::expect_used)]

use formpath::{
    form_values, options, BoxError, CustomPrecedence, DecodeOptions, Decoder, ErrorCode, FieldAddr,
    Form, TextDecode,
};

const BUG_TEXT: &str = "the string has changed by decode_text";

/// Text that announces it went through `TextDecode`.
#[derive(Form, Default, Debug, PartialEq)]
#[form(text)]
struct FieldString(String);

impl TextDecode for FieldString {
    fn decode_text(&mut self, _text: &str) -> Result<(), BoxError> {
        BUG_TEXT.clone_into(&mut self.0);
        Ok(())
    }
}

#[derive(Form, Default, Debug)]
struct Custom {
    custom_type: FieldString,
    label: String,
}

fn register_field_string(decoder: &mut Decoder) {
    decoder.register::<FieldString, _>(|_raw| {
        Ok(FieldString("value changed by custom type".to_owned()))
    });
}

#[test]
fn type_wide_custom_decoder_wins_over_text_decode() {
    let mut decoder = Decoder::default();
    register_field_string(&mut decoder);

    let mut c = Custom::default();
    let values = form_values! { "custom_type" => "if you see this text, then it's a bug" };
    decoder.decode(&values, &mut c).unwrap();
    assert_eq!(c.custom_type.0, "value changed by custom type");
}

#[test]
fn prefer_text_decode_puts_text_first() {
    let mut decoder = Decoder::new(options! { prefer_text_decode: true });
    register_field_string(&mut decoder);

    let mut c = Custom::default();
    decoder
        .decode(&form_values! { "custom_type" => "x" }, &mut c)
        .unwrap();
    assert_eq!(c.custom_type.0, BUG_TEXT);
}

#[test]
fn text_decode_without_custom_decoder() {
    let mut c = Custom::default();
    formpath::decode(&form_values! { "custom_type" => "x" }, &mut c).unwrap();
    assert_eq!(c.custom_type.0, BUG_TEXT);
}

#[test]
fn disabled_text_decode_falls_back_to_custom_or_fails() {
    let options = options! { disable_text_decode: true };

    let mut c = Custom::default();
    let err = formpath::decode_with(&form_values! { "custom_type" => "x" }, &mut c, options.clone())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownType);

    let mut decoder = Decoder::new(options);
    register_field_string(&mut decoder);
    decoder
        .decode(&form_values! { "custom_type" => "x" }, &mut c)
        .unwrap();
    assert_eq!(c.custom_type.0, "value changed by custom type");
}

#[test]
fn custom_decoder_receives_every_raw_value() {
    let mut decoder = Decoder::default();
    decoder.register::<String, _>(|raw| Ok(raw.join("+")));

    let mut c = Custom::default();
    decoder
        .decode(&form_values! { "label" => ["a", "b", "c"] }, &mut c)
        .unwrap();
    assert_eq!(c.label, "a+b+c");
}

#[test]
fn custom_decoder_failure_is_a_conversion_error_with_source() {
    let mut decoder = Decoder::default();
    decoder.register::<String, _>(|_raw| Err("nope".into()));

    let mut c = Custom::default();
    let err = decoder
        .decode(&form_values! { "label" => "x" }, &mut c)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conversion);
    assert_eq!(err.field(), "label");
    assert_eq!(err.message(), "nope");
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("nope".to_owned())
    );
}

#[test]
fn later_registration_replaces_earlier() {
    let mut decoder = Decoder::default();
    decoder
        .register::<String, _>(|_raw| Ok("first".to_owned()))
        .register::<String, _>(|_raw| Ok("second".to_owned()));

    let mut c = Custom::default();
    decoder
        .decode(&form_values! { "label" => "x" }, &mut c)
        .unwrap();
    assert_eq!(c.label, "second");
}

#[derive(Form, Default, Debug)]
struct Schedule {
    start: u32,
    end: u32,
    fallback: u32,
    slots: Vec<u32>,
}

fn hours(raw: &[String]) -> Result<u32, BoxError> {
    Ok(raw[0].trim_end_matches('h').parse::<u32>()? * 60)
}

fn schedule_values() -> formpath::FormValues {
    form_values! {
        "start" => "2h",
        "end" => "3h",
        "fallback" => "4h",
        "slots[0]" => "5h",
    }
}

fn schedule_decoder(s: &Schedule, precedence: CustomPrecedence) -> Decoder {
    let mut decoder = Decoder::new(DecodeOptions {
        custom_precedence: precedence,
        ..DecodeOptions::default()
    });
    decoder
        .register::<u32, _>(|_raw| Ok(1))
        .register_for::<u32, _>(hours, &[FieldAddr::of(&s.start), FieldAddr::of(&s.end)]);
    decoder
}

#[test]
fn field_specific_decoder_wins_by_default() {
    let mut s = Schedule::default();
    let decoder = schedule_decoder(&s, CustomPrecedence::FieldFirst);
    decoder.decode(&schedule_values(), &mut s).unwrap();
    assert_eq!((s.start, s.end, s.fallback), (120, 180, 1));
    assert_eq!(s.slots, [1]);
}

#[test]
fn type_first_precedence_prefers_type_wide_decoder() {
    let mut s = Schedule::default();
    let decoder = schedule_decoder(&s, CustomPrecedence::TypeFirst);
    decoder.decode(&schedule_values(), &mut s).unwrap();
    assert_eq!((s.start, s.end, s.fallback), (1, 1, 1));
}

#[test]
fn field_specific_decoder_alone_leaves_other_fields_builtin() {
    let mut s = Schedule::default();
    let mut decoder = Decoder::default();
    decoder.register_for::<u32, _>(hours, &[FieldAddr::of(&s.start)]);

    let values = form_values! { "start" => "2h", "end" => "30" };
    decoder.decode(&values, &mut s).unwrap();
    assert_eq!((s.start, s.end), (120, 30));
}

#[cfg(feature = "chrono")]
#[test]
fn custom_dates_by_field() {
    use chrono::NaiveDate;

    #[derive(Form, Default)]
    struct Times {
        time1: NaiveDate,
        time2: NaiveDate,
        time_default: NaiveDate,
    }

    let custom = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    let by_field = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();

    let mut t = Times::default();
    let mut decoder = Decoder::default();
    decoder
        .register::<NaiveDate, _>(move |_raw| Ok(custom))
        .register_for::<NaiveDate, _>(
            |raw| Ok(NaiveDate::parse_from_str(&raw[0], "%d/%m/%Y")?),
            &[FieldAddr::of(&t.time1), FieldAddr::of(&t.time2)],
        );

    let values = form_values! {
        "time1" => "01/01/2001",
        "time2" => "01/01/2001",
        "time_default" => "2001-01-01",
    };
    decoder.decode(&values, &mut t).unwrap();
    assert_eq!(t.time1, by_field);
    assert_eq!(t.time2, by_field);
    assert_eq!(t.time_default, custom);
}

#[test]
fn from_str_types_decode_through_text() {
    #[derive(Form, Default, Debug, PartialEq)]
    #[form(from_str)]
    enum Level {
        #[default]
        Low,
        High,
    }

    impl std::str::FromStr for Level {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "low" => Ok(Self::Low),
                "high" => Ok(Self::High),
                other => Err(format!("unknown level `{other}`")),
            }
        }
    }

    #[derive(Form, Default)]
    struct Alarm {
        level: Level,
    }

    let mut a = Alarm::default();
    formpath::decode(&form_values! { "level" => "high" }, &mut a).unwrap();
    assert_eq!(a.level, Level::High);

    let err = formpath::decode(&form_values! { "level" => "loud" }, &mut a).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conversion);
    assert_eq!(err.message(), "unknown level `loud`");
}

#[test]
fn per_value_text_decode_sees_every_value() {
    #[derive(Form, Default, Debug)]
    #[form(text)]
    struct Tags(Vec<String>);

    impl TextDecode for Tags {
        fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
            self.0.push(text.to_owned());
            Ok(())
        }
    }

    #[derive(Form, Default)]
    struct Post {
        tags: Tags,
        first: Tags,
    }

    let mut p = Post::default();
    let values = form_values! { "tags[]" => ["a", "b"], "first" => ["c", "d"] };
    formpath::decode(&values, &mut p).unwrap();
    assert_eq!(p.tags.0, ["a", "b"]);
    assert_eq!(p.first.0, ["c"]);
}

#[test]
fn empty_index_decodes_each_text_element_once() {
    /// A number plus how many times `decode_text` ran on it.
    #[derive(Form, Default, Debug, PartialEq)]
    #[form(text)]
    struct Counted(i64, u32);

    impl TextDecode for Counted {
        fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
            self.0 = text.parse()?;
            self.1 += 1;
            Ok(())
        }
    }

    #[derive(Form, Default)]
    struct Numbers {
        foo: Vec<Counted>,
    }

    let mut n = Numbers::default();
    formpath::decode(&form_values! { "foo[]" => ["5", "6"] }, &mut n).unwrap();
    assert_eq!(n.foo.len(), 2);
    assert_eq!(n.foo, [Counted(5, 1), Counted(6, 1)]);
}
