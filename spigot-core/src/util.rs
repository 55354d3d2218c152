use std::borrow::Cow;

/// Calls `f` for every element of `values`, inserting `separator` between
/// consecutive fragments.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    separator: &str,
    mut f: F,
) where
    F: FnMut(&mut String, T),
{
    let mut first = true;
    for value in values {
        if !first {
            out.push_str(separator);
        }
        first = false;
        f(out, value);
    }
}

/// Consumes the longest prefix of `input` matching `predicate` and returns
/// it, leaving `input` at the first non-matching character.
pub fn consume_while<'s>(input: &mut &'s str, mut predicate: impl FnMut(char) -> bool) -> &'s str {
    let len = input
        .find(|c: char| !predicate(c))
        .unwrap_or_else(|| input.len());
    let (result, rest) = input.split_at(len);
    *input = rest;
    result
}

/// Shortened rendering of a SQL string for log lines and error messages.
pub fn printable_sql(sql: &str) -> Cow<'_, str> {
    const LIMIT: usize = 256;
    if sql.len() <= LIMIT {
        return Cow::Borrowed(sql);
    }
    let mut cut = LIMIT;
    while !sql.is_char_boundary(cut) {
        cut -= 1;
    }
    Cow::Owned(format!("{}...", sql[..cut].trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_while_stops_at_first_mismatch() {
        let mut input = "abc123 rest";
        assert_eq!(consume_while(&mut input, |c| c.is_ascii_alphanumeric()), "abc123");
        assert_eq!(input, " rest");
        assert_eq!(consume_while(&mut input, |c| c.is_ascii_digit()), "");
        assert_eq!(input, " rest");
    }

    #[test]
    fn separated_by_joins_fragments() {
        let mut out = String::new();
        separated_by(&mut out, 0..3, ",", |out, _| out.push('?'));
        assert_eq!(out, "?,?,?");
        let mut out = String::new();
        separated_by(&mut out, 0..0, ",", |out, _| out.push('?'));
        assert_eq!(out, "");
    }

    #[test]
    fn printable_sql_truncates_long_text() {
        let long = "S".repeat(1000);
        let printed = printable_sql(&long);
        assert!(printed.ends_with("..."));
        assert!(printed.len() < long.len());
        assert_eq!(printable_sql("SELECT 1"), "SELECT 1");
    }
}
