//! Token definitions for lexical analysis

use crate::position::FilePosition;
use crate::symbol::Symbol;
use crate::types::PlampType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token with its half-open source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: FilePosition,
    pub end: FilePosition,
}

impl Token {
    pub fn new(kind: TokenKind, start: FilePosition, end: FilePosition) -> Self {
        Token { kind, start, end }
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

/// Token types in plamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Word(Symbol),
    Keyword(Keyword),
    Literal(LiteralValue),
    Operator(Operator),
    Punctuation(Punctuation),
    /// Inline spaces and tabs
    WhiteSpace,
    /// One indentation step at the start of a line
    Scope,
    Comment,
    EndOfLine,
    /// `;`
    EndOfStatement,
    EndOfFile,
}

impl TokenKind {
    /// Returns true if this token should be skipped when looking for the next
    /// significant token on the same line
    pub fn is_inline_trivia(&self) -> bool {
        matches!(self, TokenKind::WhiteSpace | TokenKind::Comment)
    }

    /// Returns true for every token the grammar never looks at directly
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::WhiteSpace | TokenKind::Comment | TokenKind::Scope | TokenKind::EndOfLine
        )
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == keyword)
    }

    pub fn is_operator(&self, operator: Operator) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == operator)
    }

    pub fn is_punctuation(&self, punctuation: Punctuation) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == punctuation)
    }

    pub fn word(&self) -> Option<Symbol> {
        match self {
            TokenKind::Word(name) => Some(*name),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(name) => write!(f, "{name}"),
            TokenKind::Keyword(keyword) => write!(f, "{keyword}"),
            TokenKind::Literal(value) => write!(f, "{value}"),
            TokenKind::Operator(operator) => write!(f, "{operator}"),
            TokenKind::Punctuation(punctuation) => write!(f, "{punctuation}"),
            TokenKind::WhiteSpace => f.write_str("whitespace"),
            TokenKind::Scope => f.write_str("indentation"),
            TokenKind::Comment => f.write_str("comment"),
            TokenKind::EndOfLine => f.write_str("end of line"),
            TokenKind::EndOfStatement => f.write_str(";"),
            TokenKind::EndOfFile => f.write_str("end of file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Module,
    Use,
    Fn,
    If,
    Else,
    While,
    Return,
    Break,
    Continue,
    New,
}

/// Map a word onto its keyword, if it is one
pub fn keyword_from_word(word: &str) -> Option<Keyword> {
    let keyword = match word {
        "module" => Keyword::Module,
        "use" => Keyword::Use,
        "fn" => Keyword::Fn,
        "if" => Keyword::If,
        "else" => Keyword::Else,
        "while" => Keyword::While,
        "return" => Keyword::Return,
        "break" => Keyword::Break,
        "continue" => Keyword::Continue,
        "new" => Keyword::New,
        _ => return None,
    };
    Some(keyword)
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Keyword::Module => "module",
            Keyword::Use => "use",
            Keyword::Fn => "fn",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::New => "new",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Assign,       // :=
    PlusAssign,   // +=
    MinusAssign,  // -=
    StarAssign,   // *=
    SlashAssign,  // /=
    PercentAssign, // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    Increment,    // ++
    Decrement,    // --
    AndAnd,       // &&
    OrOr,         // ||
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Equal,        // = or ==
    NotEqual,     // !=
    Bang,         // !
    Ampersand,    // &
    Pipe,         // |
    Caret,        // ^
}

/// Operator spellings, longest first so that scanning is a longest match
pub const OPERATOR_SPELLINGS: &[(&str, Operator)] = &[
    (":=", Operator::Assign),
    ("+=", Operator::PlusAssign),
    ("-=", Operator::MinusAssign),
    ("*=", Operator::StarAssign),
    ("/=", Operator::SlashAssign),
    ("%=", Operator::PercentAssign),
    ("&=", Operator::AndAssign),
    ("|=", Operator::OrAssign),
    ("^=", Operator::XorAssign),
    ("++", Operator::Increment),
    ("--", Operator::Decrement),
    ("&&", Operator::AndAnd),
    ("||", Operator::OrOr),
    ("<=", Operator::LessEqual),
    (">=", Operator::GreaterEqual),
    ("!=", Operator::NotEqual),
    ("==", Operator::Equal),
    ("=", Operator::Equal),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("%", Operator::Percent),
    ("<", Operator::Less),
    (">", Operator::Greater),
    ("!", Operator::Bang),
    ("&", Operator::Ampersand),
    ("|", Operator::Pipe),
    ("^", Operator::Caret),
];

/// Binding power of prefix operators; tighter than any binary operator
pub const PREFIX_BINDING_POWER: u8 = 10;

impl Operator {
    /// Binding power of this operator in infix position (higher binds tighter)
    pub fn binding_power(&self) -> Option<u8> {
        match self {
            Operator::OrOr => Some(1),
            Operator::AndAnd => Some(2),
            Operator::Pipe => Some(3),
            Operator::Caret => Some(4),
            Operator::Ampersand => Some(5),
            Operator::Equal | Operator::NotEqual => Some(6),
            Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual => Some(7),
            Operator::Plus | Operator::Minus => Some(8),
            Operator::Star | Operator::Slash | Operator::Percent => Some(9),
            _ => None,
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::PlusAssign
                | Operator::MinusAssign
                | Operator::StarAssign
                | Operator::SlashAssign
                | Operator::PercentAssign
                | Operator::AndAssign
                | Operator::OrAssign
                | Operator::XorAssign
        )
    }

    pub fn spelling(&self) -> &'static str {
        OPERATOR_SPELLINGS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Dot,
}

impl Punctuation {
    pub fn from_char(c: char) -> Option<Punctuation> {
        let punctuation = match c {
            '(' => Punctuation::OpenParen,
            ')' => Punctuation::CloseParen,
            '{' => Punctuation::OpenBrace,
            '}' => Punctuation::CloseBrace,
            '[' => Punctuation::OpenBracket,
            ']' => Punctuation::CloseBracket,
            ',' => Punctuation::Comma,
            '.' => Punctuation::Dot,
            _ => return None,
        };
        Some(punctuation)
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Punctuation::OpenParen => "(",
            Punctuation::CloseParen => ")",
            Punctuation::OpenBrace => "{",
            Punctuation::CloseBrace => "}",
            Punctuation::OpenBracket => "[",
            Punctuation::CloseBracket => "]",
            Punctuation::Comma => ",",
            Punctuation::Dot => ".",
        };
        f.write_str(text)
    }
}

/// A decoded literal value; its variant fixes the literal's type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Byte(u8),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Char(char),
    Null,
}

impl LiteralValue {
    pub fn ty(&self) -> PlampType {
        match self {
            LiteralValue::Int(_) => PlampType::Int,
            LiteralValue::UInt(_) => PlampType::UInt,
            LiteralValue::Long(_) => PlampType::Long,
            LiteralValue::ULong(_) => PlampType::ULong,
            LiteralValue::Byte(_) => PlampType::Byte,
            LiteralValue::Float(_) => PlampType::Float,
            LiteralValue::Double(_) => PlampType::Double,
            LiteralValue::Bool(_) => PlampType::Bool,
            LiteralValue::String(_) => PlampType::String,
            LiteralValue::Char(_) => PlampType::Char,
            LiteralValue::Null => PlampType::Null,
        }
    }

    /// The zero value of a numeric, bool or char type
    pub fn zero_of(ty: &PlampType) -> Option<LiteralValue> {
        let value = match ty {
            PlampType::Int => LiteralValue::Int(0),
            PlampType::UInt => LiteralValue::UInt(0),
            PlampType::Long => LiteralValue::Long(0),
            PlampType::ULong => LiteralValue::ULong(0),
            PlampType::Byte => LiteralValue::Byte(0),
            PlampType::Float => LiteralValue::Float(0.0),
            PlampType::Double => LiteralValue::Double(0.0),
            PlampType::Bool => LiteralValue::Bool(false),
            PlampType::Char => LiteralValue::Char('\0'),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}i"),
            LiteralValue::UInt(v) => write!(f, "{v}u"),
            LiteralValue::Long(v) => write!(f, "{v}l"),
            LiteralValue::ULong(v) => write!(f, "{v}ul"),
            LiteralValue::Byte(v) => write!(f, "{v}b"),
            LiteralValue::Float(v) => write!(f, "{v}f"),
            LiteralValue::Double(v) => write!(f, "{v}d"),
            LiteralValue::Bool(v) => write!(f, "{v}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
            LiteralValue::Char(c) => write!(f, "{c:?}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spellings_are_longest_first() {
        for (i, (text, _)) in OPERATOR_SPELLINGS.iter().enumerate() {
            for (later, _) in &OPERATOR_SPELLINGS[i + 1..] {
                assert!(
                    !(later.len() > text.len() && later.starts_with(text)),
                    "{later} must come before {text}"
                );
            }
        }
    }

    #[test]
    fn test_binding_powers() {
        let plus = Operator::Plus.binding_power().unwrap();
        let star = Operator::Star.binding_power().unwrap();
        let less = Operator::Less.binding_power().unwrap();
        let and = Operator::AndAnd.binding_power().unwrap();

        assert!(star > plus);
        assert!(plus > less);
        assert!(less > and);
        assert!(PREFIX_BINDING_POWER > star);
        assert_eq!(Operator::Assign.binding_power(), None);
    }

    #[test]
    fn test_keyword_table() {
        assert_eq!(keyword_from_word("while"), Some(Keyword::While));
        assert_eq!(keyword_from_word("whilst"), None);
        assert_eq!(Keyword::Continue.to_string(), "continue");
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(LiteralValue::Byte(1).ty(), PlampType::Byte);
        assert_eq!(LiteralValue::zero_of(&PlampType::ULong), Some(LiteralValue::ULong(0)));
        assert_eq!(LiteralValue::zero_of(&PlampType::String), None);
    }
}
