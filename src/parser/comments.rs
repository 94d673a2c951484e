//! Comment stripping, the first step of reading a Jack source file.
//!
//! Comments are blanked out rather than removed: every byte of a comment
//! (except newlines) becomes a space, so that byte offsets into the stripped
//! text are also valid offsets into the original source.

use chumsky::prelude::*;

use crate::{
    common::ast::Span,
    error::{Error, LexicalErrorKind},
};

type StripError = Simple<char>;

/// Replace all `// ...` and `/* ... */` comments with whitespace.
pub fn strip(source: &str) -> Result<String, Error> {
    stripper().parse(source).map_err(|errors| {
        // report the first (earliest) problem only
        let error = errors
            .into_iter()
            .min_by_key(|error| error.span().start)
            .map_or_else(|| 0..0, |error| error.span());

        into_lexical_error(source, error)
    })
}

fn into_lexical_error(source: &str, char_span: Span) -> Error {
    let failed_at = byte_offset(source, char_span.start);
    let before = &source[..failed_at];

    let unclosed_comment = before
        .rfind("/*")
        .filter(|&i| !before[i..].contains("*/"));

    // block comments can only fail at the end of input,
    // strings fail at the end of their line
    let (kind, start) = match unclosed_comment {
        Some(start) if failed_at == source.len() => {
            (LexicalErrorKind::UnterminatedComment, start)
        }
        _ if source[failed_at..].starts_with('"') => {
            (LexicalErrorKind::UnterminatedString, failed_at)
        }
        _ => (
            LexicalErrorKind::UnterminatedString,
            before.rfind('"').unwrap_or(failed_at),
        ),
    };

    let lexeme: String = source[start..]
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(16)
        .collect();

    Error::Lexical {
        kind,
        lexeme,
        span: start..(start + 1).min(source.len()),
    }
}

/// Chumsky spans count characters, source spans count bytes.
fn byte_offset(source: &str, char_index: usize) -> usize {
    source
        .char_indices()
        .nth(char_index)
        .map_or(source.len(), |(offset, _)| offset)
}

fn blank(c: char) -> String {
    if c == '\n' {
        String::from("\n")
    } else {
        " ".repeat(c.len_utf8())
    }
}

fn blank_all(opening: &str, chars: &[char], closing: &str) -> String {
    let mut blanked = " ".repeat(opening.len());
    blanked.extend(chars.iter().map(|&c| blank(c)));
    blanked.push_str(&" ".repeat(closing.len()));
    blanked
}

fn stripper() -> impl Parser<char, String, Error = StripError> {
    // string constants are copied verbatim, so `//` inside a string is not a comment
    let string = just('"')
        .ignore_then(none_of("\"\n").repeated())
        .then_ignore(just('"'))
        .map(|chars| format!("\"{}\"", chars.into_iter().collect::<String>()))
        .labelled("string constant");

    let line_comment = just("//")
        .ignore_then(filter(|c: &char| *c != '\n').repeated())
        .map(|chars| blank_all("//", &chars, ""))
        .labelled("line comment");

    let block_comment = just("/*")
        .ignore_then(take_until(just("*/")))
        .map(|(chars, _)| blank_all("/*", &chars, "*/"))
        .labelled("block comment");

    // a lone `/` is the division symbol
    let slash = just('/')
        .then_ignore(none_of("/*").ignored().or(end()).rewind())
        .map(String::from);

    let other = none_of("\"/").map(String::from);

    string
        .or(line_comment)
        .or(block_comment)
        .or(slash)
        .or(other)
        .repeated()
        .then_ignore(end())
        .map(|pieces| pieces.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment() {
        let source = "let x = 1; // set x\nlet y = 2;";
        let stripped = strip(source).expect("should strip");

        assert_eq!(stripped.len(), source.len());
        assert_eq!(
            stripped,
            format!("let x = 1; {}\nlet y = 2;", " ".repeat(8))
        );
    }

    #[test]
    fn test_block_comment_keeps_lines() {
        let source = "/** doc\n * more\n */\nclass Main {}";
        let stripped = strip(source).expect("should strip");

        assert_eq!(stripped.len(), source.len());
        assert_eq!(stripped.lines().count(), source.lines().count());
        assert_eq!(stripped.lines().last(), Some("class Main {}"));
        assert!(stripped.lines().take(3).all(|line| line.trim().is_empty()));
    }

    #[test]
    fn test_comment_markers_inside_string() {
        let source = "do Output.printString(\"a // b /* c\");";
        assert_eq!(strip(source).expect("should strip"), source);
    }

    #[test]
    fn test_division_is_not_a_comment() {
        let source = "let x = a / b;";
        assert_eq!(strip(source).expect("should strip"), source);

        let source = "let x = a /";
        assert_eq!(strip(source).expect("should strip"), source);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let source = "class Main {\n/* never closed\n}";

        assert!(strip(source).is_err_and(|err| matches!(err, Error::Lexical { .. })));
    }

    #[test]
    fn test_unterminated_string() {
        let source = "let s = \"open;\nlet t = 1;";

        assert!(strip(source).is_err_and(|err| matches!(
            err,
            Error::Lexical {
                kind: LexicalErrorKind::UnterminatedString,
                ..
            }
        )));
    }

    #[test]
    fn test_non_ascii_comment_keeps_offsets() {
        let source = "// über\nclass";
        let stripped = strip(source).expect("should strip");

        assert_eq!(stripped.len(), source.len());
        assert_eq!(&stripped[source.len() - 5..], "class");
    }
}
