use crate::{Error, Result, consume_while, printable_sql};

/// A classified span of SQL text.
///
/// Tokens keep enough of the original text that replaying a token list with
/// [`Token::write`] reproduces the input byte for byte; comments and
/// whitespace travel inside `Literal` spans, so a `;` or `:` inside a quote
/// or a comment is never mistaken for syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Passthrough SQL text, including comments and whitespace.
    Literal(String),
    /// A single-quoted span, quotes and `''` escapes included.
    Quoted(String),
    /// A double-quoted span, quotes and `""` escapes included.
    DoubleQuoted(String),
    /// A `:name` placeholder; the payload is the bare name without `:`.
    NamedParam(String),
    /// A statement delimiter `;`.
    StatementEnd,
}

impl Token {
    /// Appends the exact source text of this token.
    pub fn write(&self, out: &mut String) {
        match self {
            Token::Literal(text) | Token::Quoted(text) | Token::DoubleQuoted(text) => {
                out.push_str(text)
            }
            Token::NamedParam(name) => {
                out.push(':');
                out.push_str(name);
            }
            Token::StatementEnd => out.push(';'),
        }
    }
}

/// Tokenizes `sql` in one eager pass.
///
/// Recognized syntax: `'...'` and `"..."` spans with doubled-quote escapes,
/// `:identifier` named placeholders (`::` stays literal text, so casts pass
/// through), `;` statement ends, and `--`/`/* */` comments which are kept as
/// literal text. Fails on unterminated quotes or block comments.
pub fn tokenize(sql: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut input = sql;
    macro_rules! flush_literal {
        () => {
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
        };
    }
    while let Some(c) = input.chars().next() {
        match c {
            '\'' => {
                flush_literal!();
                tokens.push(Token::Quoted(quoted_span(&mut input, '\'')?));
            }
            '"' => {
                flush_literal!();
                tokens.push(Token::DoubleQuoted(quoted_span(&mut input, '"')?));
            }
            ';' => {
                flush_literal!();
                tokens.push(Token::StatementEnd);
                input = &input[1..];
            }
            ':' => {
                let rest = &input[1..];
                match rest.chars().next() {
                    Some(':') => {
                        literal.push_str("::");
                        input = &input[2..];
                    }
                    Some(start) if start == '_' || start.is_ascii_alphabetic() => {
                        flush_literal!();
                        input = rest;
                        let name =
                            consume_while(&mut input, |c| c == '_' || c.is_ascii_alphanumeric());
                        tokens.push(Token::NamedParam(name.to_owned()));
                    }
                    _ => {
                        literal.push(':');
                        input = rest;
                    }
                }
            }
            '-' if input.starts_with("--") => {
                let end = input.find('\n').unwrap_or_else(|| input.len());
                literal.push_str(&input[..end]);
                input = &input[end..];
            }
            '/' if input.starts_with("/*") => {
                let Some(end) = input.find("*/") else {
                    return Err(Error::invalid_argument(format!(
                        "unterminated block comment in SQL: {}",
                        printable_sql(sql)
                    )));
                };
                literal.push_str(&input[..end + 2]);
                input = &input[end + 2..];
            }
            _ => {
                literal.push(c);
                input = &input[c.len_utf8()..];
            }
        }
    }
    flush_literal!();
    Ok(tokens)
}

/// Consumes a quoted span starting at the opening quote, handling the
/// doubled-quote escape, and returns it with quotes included.
fn quoted_span(input: &mut &str, quote: char) -> Result<String> {
    let mut span = String::new();
    span.push(quote);
    let mut rest = &input[1..];
    loop {
        let Some(at) = rest.find(quote) else {
            return Err(Error::invalid_argument(format!(
                "unterminated {} in SQL: {}",
                if quote == '\'' {
                    "string literal"
                } else {
                    "quoted identifier"
                },
                printable_sql(input)
            )));
        };
        span.push_str(&rest[..=at]);
        rest = &rest[at + 1..];
        if rest.starts_with(quote) {
            span.push(quote);
            rest = &rest[1..];
        } else {
            break;
        }
    }
    *input = rest;
    Ok(span)
}
