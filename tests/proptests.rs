// Property-based tests for path tokenizing and sequence growth.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use formpath::{decode, Form, FormValues, PathTokens, Segment};

#[derive(Debug, Clone)]
enum Part {
    Field(String),
    Index(usize),
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_-]{0,12}"
}

fn arb_part() -> impl Strategy<Value = Part> {
    prop_oneof![
        arb_name().prop_map(Part::Field),
        (0usize..1000).prop_map(Part::Index),
    ]
}

fn render(parts: &[Part], dot_after_bracket: bool) -> String {
    let mut out = String::new();
    let mut after_bracket = false;
    for (i, part) in parts.iter().enumerate() {
        match part {
            Part::Field(name) => {
                if i > 0 && (!after_bracket || dot_after_bracket) {
                    out.push('.');
                }
                out.push_str(name);
                after_bracket = false;
            }
            Part::Index(index) => {
                out.push_str(&format!("[{index}]"));
                after_bracket = true;
            }
        }
    }
    out
}

proptest! {
    #[test]
    fn tokenizer_recovers_rendered_parts(
        parts in proptest::collection::vec(arb_part(), 1..8),
        dot_after_bracket in any::<bool>(),
    ) {
        let path = render(&parts, dot_after_bracket);
        let segs: Vec<Segment<'_>> = PathTokens::new(&path).collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(segs.len(), parts.len());
        for (seg, part) in segs.iter().zip(&parts) {
            match (seg, part) {
                (Segment::Field(got), Part::Field(want)) => prop_assert_eq!(*got, want.as_str()),
                (Segment::Index(got), Part::Index(want)) => prop_assert_eq!(*got, want.to_string()),
                _ => prop_assert!(false, "segment {:?} does not match {:?} in {}", seg, part, path),
            }
        }
    }

    #[test]
    fn tokenizer_never_panics(path in ".{0,64}") {
        for seg in PathTokens::new(&path) {
            if seg.is_err() {
                break;
            }
        }
    }

    #[test]
    fn sequence_grows_to_highest_index(
        writes in proptest::collection::vec((0usize..64, any::<u32>()), 1..16),
    ) {
        #[derive(Form, Default)]
        struct Holder {
            items: Vec<u32>,
        }

        let mut values = FormValues::new();
        let mut expected: Vec<u32> = Vec::new();
        for &(index, value) in &writes {
            values.insert(format!("items[{index}]"), [value.to_string()]);
        }
        for (path, raw) in values.iter() {
            let index: usize = path["items[".len()..path.len() - 1].parse().unwrap();
            if expected.len() <= index {
                expected.resize(index + 1, 0);
            }
            expected[index] = raw[0].parse().unwrap();
        }

        let mut holder = Holder::default();
        decode(&values, &mut holder).unwrap();

        let highest = writes.iter().map(|&(index, _)| index).max().unwrap();
        prop_assert_eq!(holder.items.len(), highest + 1);
        prop_assert_eq!(holder.items, expected);
    }
}
