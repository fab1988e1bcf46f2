//! Lexer (tokenizer) for command files
//!
//! Converts a buffered character stream into [`Token`]s on demand. The input
//! is read one line at a time, so arbitrarily large files are never held in
//! memory and the current line number is always known for error reporting.
//!
//! Lexical rules, most specific first:
//! - `{`, `}` and `;` are single-character structural tokens.
//! - `// ...` line comments and `/* ... */` block comments are discarded.
//! - A double-quoted run is one string token; it may contain whitespace and
//!   structural characters. Escapes: `\a \b \f \n \r \t \v`, octal `\NNN`
//!   (at most `\377`), and a backslash before any other character yields that
//!   character, so `\\` and `\"` work as expected.
//! - A maximal run of printable ASCII characters outside the structural set
//!   is one string token.
//! - Control characters and space separate tokens.
//! - Anything else is rejected.

use std::fmt;
use std::io::BufRead;

use tracing::trace;

use super::error::{ErrorKind, ParseError};
use super::lookahead::{ComputeNext, Lookahead, LookaheadError};

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word or a quoted string
    String(String),
    /// `{`
    OpenBlock,
    /// `}`
    CloseBlock,
    /// `;`
    StatementEnd,
    /// End of the stream; always the last token
    EndOfInput,
}

impl Token {
    pub fn is_string(&self) -> bool {
        matches!(self, Token::String(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::OpenBlock => write!(f, "'{{'"),
            Token::CloseBlock => write!(f, "'}}'"),
            Token::StatementEnd => write!(f, "';'"),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A token sequence with one token of lookahead.
///
/// Argument type resolvers receive the remaining input through this trait so
/// they can consume their own parameter tokens.
pub trait TokenStream {
    /// Returns the next token without consuming it.
    fn peek(&mut self) -> Result<&Token, ParseError>;

    /// Consumes and returns the next token.
    fn next(&mut self) -> Result<Token, ParseError>;

    /// Current 1-based line of the underlying input.
    fn line(&self) -> usize;

    fn error(&self, kind: ErrorKind, message: String) -> ParseError {
        ParseError::new(kind, message, self.line())
    }

    /// Consumes the next token, which must be a string token.
    ///
    /// `what` names the expected value in the error message, e.g. "node name".
    fn expect_string(&mut self, kind: ErrorKind, what: &str) -> Result<String, ParseError> {
        match self.next()? {
            Token::String(s) => Ok(s),
            other => Err(self.error(
                kind,
                format!("Expected string token for {} but got {}", what, other),
            )),
        }
    }

    /// Whether the next token is a string token, without consuming it.
    fn peek_is_string(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_string())
    }
}

/// Whether `ch` may appear in an unquoted word.
pub fn is_word_char(ch: char) -> bool {
    matches!(ch, '!'..='~') && !matches!(ch, '{' | '}' | ';' | '"')
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{20}')
}

/// Character source and tokenizing rules behind [`Lexer`].
#[derive(Debug)]
struct Scanner<R> {
    reader: R,
    /// Characters of the line currently being scanned, newline included
    buffer: Vec<char>,
    position: usize,
    line: usize,
    /// The reader has returned end of file
    drained: bool,
    /// `EndOfInput` has been produced
    finished: bool,
}

impl<R: BufRead> Scanner<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            position: 0,
            line: 1,
            drained: false,
            finished: false,
        }
    }

    fn line(&self) -> usize {
        self.line
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::new(ErrorKind::Lexical, message, self.line)
    }

    /// Refills the line buffer if it has been fully consumed.
    fn fill(&mut self) -> Result<(), ParseError> {
        if self.position < self.buffer.len() || self.drained {
            return Ok(());
        }

        let mut text = String::new();
        let read = self
            .reader
            .read_line(&mut text)
            .map_err(|e| ParseError::io(e, self.line))?;
        if read == 0 {
            self.drained = true;
        }
        self.buffer = text.chars().collect();
        self.position = 0;
        Ok(())
    }

    /// Current character without consuming it
    fn peek(&mut self) -> Result<Option<char>, ParseError> {
        self.fill()?;
        Ok(self.buffer.get(self.position).copied())
    }

    /// Character after the current one.
    ///
    /// Only meaningful right after `peek` returned `Some`: lines are read
    /// whole, so the following character is either in the buffer or the
    /// input has ended.
    fn peek_second(&self) -> Option<char> {
        self.buffer.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Result<Option<char>, ParseError> {
        let ch = self.peek()?;
        if let Some(ch) = ch {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
            }
        }
        Ok(ch)
    }

    fn at_comment_start(&self, ch: char) -> bool {
        ch == '/' && matches!(self.peek_second(), Some('/') | Some('*'))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        while let Some(ch) = self.peek()? {
            if is_whitespace(ch) {
                self.advance()?;
            } else if ch == '/' && self.peek_second() == Some('/') {
                self.skip_line_comment()?;
            } else if ch == '/' && self.peek_second() == Some('*') {
                self.skip_block_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) -> Result<(), ParseError> {
        while let Some(ch) = self.advance()? {
            if ch == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start_line = self.line;
        self.advance()?; // '/'
        self.advance()?; // '*'

        while let Some(ch) = self.advance()? {
            if ch == '*' && self.peek()? == Some('/') {
                self.advance()?;
                return Ok(());
            }
        }

        Err(ParseError::new(
            ErrorKind::Lexical,
            "Unterminated block comment",
            start_line,
        ))
    }

    fn word(&mut self) -> Result<Token, ParseError> {
        let mut word = String::new();
        while let Some(ch) = self.peek()? {
            if !is_word_char(ch) || self.at_comment_start(ch) {
                break;
            }
            word.push(ch);
            self.advance()?;
        }
        Ok(Token::String(word))
    }

    fn quoted_string(&mut self) -> Result<Token, ParseError> {
        self.advance()?; // opening quote
        let mut string = String::new();

        loop {
            match self.peek()? {
                None | Some('\n') => {
                    return Err(self.error("Unterminated quoted string".to_string()));
                }
                Some('"') => {
                    self.advance()?;
                    return Ok(Token::String(string));
                }
                Some('\\') => {
                    self.advance()?;
                    let escaped = self.escape()?;
                    string.push(escaped);
                }
                Some(ch) => {
                    self.advance()?;
                    string.push(ch);
                }
            }
        }
    }

    /// Decodes the escape after a backslash inside quotes.
    fn escape(&mut self) -> Result<char, ParseError> {
        let ch = match self.peek()? {
            None | Some('\n') => {
                return Err(self.error("Unterminated quoted string".to_string()));
            }
            Some(ch) => ch,
        };
        self.advance()?;

        let escaped = match ch {
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '0'..='7' => {
                // Up to three octal digits, the third only after a leading 0-3
                let max_digits = if ch <= '3' { 3 } else { 2 };
                let mut value = octal_digit(ch);
                for _ in 1..max_digits {
                    match self.peek()? {
                        Some(next @ '0'..='7') => {
                            self.advance()?;
                            value = value * 8 + octal_digit(next);
                        }
                        _ => break,
                    }
                }
                char::from(value)
            }
            other => other,
        };
        Ok(escaped)
    }
}

fn octal_digit(ch: char) -> u8 {
    ch as u8 - b'0'
}

impl<R: BufRead> ComputeNext for Scanner<R> {
    type Item = Token;
    type Error = ParseError;

    fn compute_next(&mut self) -> Result<Option<Token>, ParseError> {
        if self.finished {
            return Ok(None);
        }

        self.skip_whitespace_and_comments()?;

        let Some(ch) = self.peek()? else {
            self.finished = true;
            return Ok(Some(Token::EndOfInput));
        };

        let token = match ch {
            '{' => {
                self.advance()?;
                Token::OpenBlock
            }
            '}' => {
                self.advance()?;
                Token::CloseBlock
            }
            ';' => {
                self.advance()?;
                Token::StatementEnd
            }
            '"' => self.quoted_string()?,
            c if is_word_char(c) => self.word()?,
            other => {
                return Err(self.error(format!(
                    "Unknown token: {:?} (U+{:04X})",
                    other, other as u32
                )));
            }
        };

        trace!(line = self.line, %token, "lexed token");
        Ok(Some(token))
    }
}

/// Lexer for command files.
///
/// Implements [`TokenStream`] on top of a [`Lookahead`] over the scanner.
#[derive(Debug)]
pub struct Lexer<R: BufRead> {
    tokens: Lookahead<Scanner<R>>,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            tokens: Lookahead::new(Scanner::new(reader)),
        }
    }

    /// Whether another token is available.
    pub fn has_next(&mut self) -> Result<bool, ParseError> {
        self.tokens
            .has_next()
            .map_err(|e| misuse_or_cause(e, self.line()))
    }

    /// Tokenizes the rest of the input, up to and including `EndOfInput`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while self.has_next()? {
            tokens.push(TokenStream::next(&mut self)?);
        }
        Ok(tokens)
    }
}

impl<'a> Lexer<&'a [u8]> {
    /// Lexer over an in-memory string.
    pub fn from_source(source: &'a str) -> Self {
        Self::new(source.as_bytes())
    }
}

impl<R: BufRead> TokenStream for Lexer<R> {
    fn peek(&mut self) -> Result<&Token, ParseError> {
        let line = self.line();
        match self.tokens.peek() {
            Ok(token) => Ok(token),
            Err(e) => Err(misuse_or_cause(e, line)),
        }
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        self.tokens
            .next()
            .map_err(|e| misuse_or_cause(e, self.line()))
    }

    fn line(&self) -> usize {
        self.tokens.source().line()
    }
}

fn misuse_or_cause(err: LookaheadError<ParseError>, line: usize) -> ParseError {
    match err {
        LookaheadError::Compute(e) => e,
        LookaheadError::Poisoned => ParseError::new(
            ErrorKind::Misuse,
            "Token stream used after a previous error",
            line,
        ),
        LookaheadError::Exhausted => ParseError::new(
            ErrorKind::Misuse,
            "Token stream read past end of input",
            line,
        ),
    }
}
