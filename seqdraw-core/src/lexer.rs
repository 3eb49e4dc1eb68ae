//! Line tokenizer for the sequence diagram DSL

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{map, value},
    IResult, Parser,
};

/// Reserved words, matched case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Title,
    Participant,
    Note,
    Left,
    Right,
    Over,
    Of,
    Horizontal,
    Spacer,
    Gap,
    Line,
    Frame,
    Alt,
    ElseAlt,
    Else,
    Loop,
    End,
}

const KEYWORDS: [(&str, Keyword); 17] = [
    ("title", Keyword::Title),
    ("participant", Keyword::Participant),
    ("note", Keyword::Note),
    ("left", Keyword::Left),
    ("right", Keyword::Right),
    ("over", Keyword::Over),
    ("of", Keyword::Of),
    ("horizontal", Keyword::Horizontal),
    ("spacer", Keyword::Spacer),
    ("gap", Keyword::Gap),
    ("line", Keyword::Line),
    ("frame", Keyword::Frame),
    ("alt", Keyword::Alt),
    ("elsealt", Keyword::ElseAlt),
    ("else", Keyword::Else),
    ("loop", Keyword::Loop),
    ("end", Keyword::End),
];

impl Keyword {
    pub fn from_word(word: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(word))
            .map(|(_, keyword)| *keyword)
    }

    pub fn as_str(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| keyword == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }
}

/// A lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(Keyword),
    /// `-`
    Dash,
    /// `--`
    DoubleDash,
    /// `.`
    Dot,
    /// `=`
    Equal,
    /// `,`
    Comma,
    /// `>`
    Gt,
    /// `>>`
    DoubleGt,
    /// `/>`
    SlashGt,
    /// `\>`
    BackslashGt,
    /// Unescaped, trimmed text following a `:`
    Message(String),
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            Token::Dash => f.write_str("`-`"),
            Token::DoubleDash => f.write_str("`--`"),
            Token::Dot => f.write_str("`.`"),
            Token::Equal => f.write_str("`=`"),
            Token::Comma => f.write_str("`,`"),
            Token::Gt => f.write_str("`>`"),
            Token::DoubleGt => f.write_str("`>>`"),
            Token::SlashGt => f.write_str("`/>`"),
            Token::BackslashGt => f.write_str("`\\>`"),
            Token::Message(_) => f.write_str("message"),
            Token::Ident(ident) => write!(f, "`{}`", ident),
        }
    }
}

/// Tokenize a single source line.
///
/// A `#` outside a message starts a comment. A `:` turns the rest of the line into a
/// [`Token::Message`].
pub fn tokenize(line: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('#') {
            break;
        }
        if let Some(text) = rest.strip_prefix(':') {
            tokens.push(Token::Message(unescape(text.trim())?));
            break;
        }
        match token(rest) {
            Ok((remaining, tok)) => {
                tokens.push(tok);
                rest = remaining;
            }
            Err(_) => {
                let found = rest.chars().next().unwrap_or(' ');
                return Err(format!("unexpected character `{}`", found));
            }
        }
    }

    Ok(tokens)
}

/// Resolve `\n` and `\\` escapes; any other escape is an error
pub fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(format!("invalid escape sequence `\\{}`", other)),
            None => return Err("dangling `\\` at end of message".to_string()),
        }
    }

    Ok(out)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((punctuation, word)).parse(input)
}

/// Two-character operators are tried before their one-character prefixes
fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::DoubleDash, tag("--")),
        value(Token::Dash, tag("-")),
        value(Token::DoubleGt, tag(">>")),
        value(Token::Gt, tag(">")),
        value(Token::SlashGt, tag("/>")),
        value(Token::BackslashGt, tag("\\>")),
        value(Token::Dot, char('.')),
        value(Token::Equal, char('=')),
        value(Token::Comma, char(',')),
    ))
    .parse(input)
}

fn word(input: &str) -> IResult<&str, Token> {
    map(take_while1(is_ident_char), |word: &str| {
        match Keyword::from_word(word) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Ident(word.to_string()),
        }
    })
    .parse(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
