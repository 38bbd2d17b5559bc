//! Tokenizer and recursive-descent parser for key/value text.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::keyvalues::tree::KeyValues;

/// Deepest section nesting accepted. Upgrade files use three levels.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyValuesError {
    #[error("document contains no keys")]
    Empty,
    #[error("line {line}: unterminated quoted string")]
    UnterminatedString { line: usize },
    #[error("line {line}: unexpected '{found}'")]
    UnexpectedToken { line: usize, found: String },
    #[error("line {line}: unexpected end of input inside '{key}'")]
    UnexpectedEof { line: usize, key: String },
    #[error("line {line}: directive '{directive}' is not supported")]
    UnsupportedDirective { line: usize, directive: String },
    #[error("line {line}: sections nested deeper than {limit}")]
    TooDeep { line: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
    /// Platform conditional such as `[$WIN32]`; accepted and ignored.
    Conditional,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() != Some(&'/') {
                        return;
                    }
                    while let Some(ch) = self.bump() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<(Token, usize)>, KeyValuesError> {
        self.skip_trivia();
        let line = self.line;
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };
        let token = match ch {
            '{' => {
                self.bump();
                Token::Open
            }
            '}' => {
                self.bump();
                Token::Close
            }
            '"' => {
                self.bump();
                Token::Str(self.quoted(line)?)
            }
            '[' => {
                while let Some(ch) = self.bump() {
                    if ch == ']' {
                        break;
                    }
                }
                Token::Conditional
            }
            _ => {
                let bare = self.bare();
                if bare.starts_with('#') {
                    return Err(KeyValuesError::UnsupportedDirective {
                        line,
                        directive: bare,
                    });
                }
                Token::Str(bare)
            }
        };
        Ok(Some((token, line)))
    }

    fn quoted(&mut self, line: usize) -> Result<String, KeyValuesError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(KeyValuesError::UnterminatedString { line }),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => return Err(KeyValuesError::UnterminatedString { line }),
                },
                Some(ch) => out.push(ch),
            }
        }
    }

    fn bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '{' | '}' | '"') {
                break;
            }
            out.push(ch);
            self.bump();
        }
        out
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<(Token, usize)>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Result<Option<&Token>, KeyValuesError> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token()?;
        }
        Ok(self.lookahead.as_ref().map(|(token, _)| token))
    }

    fn next(&mut self) -> Result<Option<(Token, usize)>, KeyValuesError> {
        match self.lookahead.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn skip_conditional(&mut self) -> Result<(), KeyValuesError> {
        if self.peek()? == Some(&Token::Conditional) {
            self.next()?;
        }
        Ok(())
    }

    /// Parses `key value` or `key { ... }`. Returns `None` at a closing brace or end of input.
    fn pair(&mut self) -> Result<Option<KeyValues>, KeyValuesError> {
        let key = match self.next()? {
            None => return Ok(None),
            Some((Token::Close, line)) => {
                self.lookahead = Some((Token::Close, line));
                return Ok(None);
            }
            Some((Token::Str(key), _)) => key,
            Some((Token::Open, line)) => {
                return Err(KeyValuesError::UnexpectedToken {
                    line,
                    found: "{".to_string(),
                })
            }
            Some((Token::Conditional, line)) => {
                return Err(KeyValuesError::UnexpectedToken {
                    line,
                    found: "[".to_string(),
                })
            }
        };
        self.skip_conditional()?;

        match self.next()? {
            None => Err(KeyValuesError::UnexpectedEof {
                line: self.lexer.line,
                key,
            }),
            Some((Token::Str(value), _)) => {
                self.skip_conditional()?;
                Ok(Some(KeyValues::text(key, value)))
            }
            Some((Token::Open, line)) => {
                if self.depth == MAX_NESTING {
                    return Err(KeyValuesError::TooDeep {
                        line,
                        limit: MAX_NESTING,
                    });
                }
                self.depth += 1;
                let mut children = Vec::new();
                while let Some(child) = self.pair()? {
                    children.push(child);
                }
                self.depth -= 1;
                match self.next()? {
                    Some((Token::Close, _)) => {}
                    _ => {
                        return Err(KeyValuesError::UnexpectedEof {
                            line: self.lexer.line,
                            key,
                        })
                    }
                }
                self.skip_conditional()?;
                Ok(Some(KeyValues::section(key, children)))
            }
            Some((Token::Close, line)) => Err(KeyValuesError::UnexpectedToken {
                line,
                found: "}".to_string(),
            }),
            Some((Token::Conditional, line)) => Err(KeyValuesError::UnexpectedToken {
                line,
                found: "[".to_string(),
            }),
        }
    }
}

/// Parses a document and returns its first top-level key. Trailing top-level keys must
/// still be well formed but are not returned.
pub fn parse_keyvalues(input: &str) -> Result<KeyValues, KeyValuesError> {
    let mut parser = Parser {
        lexer: Lexer::new(input),
        lookahead: None,
        depth: 0,
    };
    let root = parser.pair()?.ok_or(KeyValuesError::Empty)?;
    loop {
        if parser.pair()?.is_none() {
            break;
        }
    }
    if let Some((Token::Close, line)) = parser.next()? {
        return Err(KeyValuesError::UnexpectedToken {
            line,
            found: "}".to_string(),
        });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyvalues::KvValue;

    #[test]
    fn parses_nested_sections_with_comments_and_bare_tokens() {
        let doc = r#"
            // upgrade script
            "upgrades"
            {
                "ItemUpgrades"
                {
                    1
                    {
                        "attribute" "damage bonus"   // trailing note
                        increment 0.25
                    }
                }
            }
        "#;
        let root = parse_keyvalues(doc).unwrap();
        assert_eq!(root.name, "upgrades");
        let entry = &root.find_key("itemupgrades").unwrap().children()[0];
        assert_eq!(entry.name, "1");
        assert_eq!(entry.get_str("attribute"), Some("damage bonus"));
        assert_eq!(entry.get_float("increment", 0.0), 0.25);
    }

    #[test]
    fn quoted_strings_support_escapes_and_braces() {
        let root = parse_keyvalues(r#""root" { "icon" "a\"b{c}" }"#).unwrap();
        assert_eq!(root.get_str("icon"), Some("a\"b{c}"));
    }

    #[test]
    fn conditionals_are_ignored() {
        let root = parse_keyvalues(r#""root" { "cap" "2" [$WIN32] }"#).unwrap();
        assert_eq!(root.get_int("cap", 0), 2);
    }

    #[test]
    fn reports_unterminated_strings_and_missing_braces() {
        assert_eq!(
            parse_keyvalues("\"root\" { \"a\" \"b"),
            Err(KeyValuesError::UnterminatedString { line: 1 })
        );
        assert!(matches!(
            parse_keyvalues("\"root\"\n{\n \"a\" \"b\"\n"),
            Err(KeyValuesError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse_keyvalues("\"root\" { } }"),
            Err(KeyValuesError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn rejects_include_directives_and_empty_documents() {
        assert!(matches!(
            parse_keyvalues("#base \"other.txt\""),
            Err(KeyValuesError::UnsupportedDirective { .. })
        ));
        assert_eq!(parse_keyvalues("  // nothing\n"), Err(KeyValuesError::Empty));
    }

    fn nested(levels: usize) -> String {
        let mut doc = "\"k\" {\n".repeat(levels);
        doc.push_str("\"leaf\" \"1\"\n");
        doc.push_str(&"}\n".repeat(levels));
        doc
    }

    #[test]
    fn nesting_is_bounded() {
        let root = parse_keyvalues(&nested(MAX_NESTING)).unwrap();
        assert_eq!(root.name, "k");

        assert_eq!(
            parse_keyvalues(&nested(MAX_NESTING + 1)),
            Err(KeyValuesError::TooDeep {
                line: MAX_NESTING + 1,
                limit: MAX_NESTING,
            })
        );
        assert!(matches!(
            parse_keyvalues(&nested(200_000)),
            Err(KeyValuesError::TooDeep { .. })
        ));
    }

    #[test]
    fn text_root_is_returned_as_leaf() {
        let root = parse_keyvalues("key value").unwrap();
        assert_eq!(root.value, KvValue::Text("value".to_string()));
    }
}
