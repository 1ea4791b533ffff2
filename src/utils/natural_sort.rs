use std::cmp::Ordering;

// Natural ordering for identifiers with a trailing number, so that
// `tree_2` sorts before `tree_10` and `Tree 9` before `Tree 11`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a_prefix, a_num) = split_trailing_number(a);
    let (b_prefix, b_num) = split_trailing_number(b);

    match a_prefix.cmp(b_prefix) {
        Ordering::Equal => match (a_num, b_num) {
            (Some(x), Some(y)) => x.cmp(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        other => other,
    }
}

fn split_trailing_number(s: &str) -> (&str, Option<u64>) {
    let digits = s.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    let (prefix, number) = s.split_at(s.len() - digits);
    (prefix, number.parse::<u64>().ok())
}
