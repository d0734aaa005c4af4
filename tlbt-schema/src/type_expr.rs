//! Parameter type-string parser.
//!
//! TL parameter types are small expressions: a bare name (`int`,
//! `auth.SentCode`), a generic wrapper (`Vector<User>`), the flags-word marker
//! `#`, or a conditional field `flags.N?T` that is only present on the wire
//! when bit `N` of the named flags word is set. The grammar is:
//!
//! ```text
//! expr        := '#' | conditional | named
//! conditional := ident '.' bit '?' expr
//! named       := ident ( '<' expr '>' )?
//! ```

use crate::error::ParseError;
use std::fmt;

/// Highest bit index of a 32-bit flags word.
pub const MAX_FLAG_BIT: u8 = 31;

/// Parsed parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// The `#` flags-word marker.
    FlagsWord,
    /// A bare type name.
    Named(String),
    /// A generic wrapper such as `Vector<T>`.
    Generic {
        /// Wrapper name.
        name: String,
        /// Type argument.
        arg: Box<TypeExpr>,
    },
    /// A field present only when a flag bit is set.
    Conditional {
        /// Name of the `#` parameter holding the bit.
        flags: String,
        /// Bit index, 0..=31.
        bit: u8,
        /// Type of the field when present.
        inner: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// Parses a raw parameter type string.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidType` on malformed input and
    /// `ParseError::FlagBitOutOfRange` for bits above 31.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut parser = Parser { raw, pos: 0 };
        let expr = parser.expr()?;
        if parser.pos != raw.len() {
            return Err(ParseError::invalid_type(raw, parser.pos, "unexpected trailing input"));
        }
        Ok(expr)
    }

    /// Returns the flag condition and the unconditional type.
    #[must_use]
    pub fn split_condition(&self) -> (Option<(&str, u8)>, &TypeExpr) {
        match self {
            Self::Conditional { flags, bit, inner } => (Some((flags.as_str(), *bit)), inner),
            other => (None, other),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlagsWord => f.write_str("#"),
            Self::Named(name) => f.write_str(name),
            Self::Generic { name, arg } => write!(f, "{}<{}>", name, arg),
            Self::Conditional { flags, bit, inner } => write!(f, "{}.{}?{}", flags, bit, inner),
        }
    }
}

struct Parser<'a> {
    raw: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.raw[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%' | '!') {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.raw[start..self.pos]
    }

    fn expr(&mut self) -> Result<TypeExpr, ParseError> {
        if self.eat('#') {
            return Ok(TypeExpr::FlagsWord);
        }

        let start = self.pos;
        let ident = self.ident();
        if ident.is_empty() {
            return Err(ParseError::invalid_type(self.raw, start, "expected a type name"));
        }

        if self.eat('?') {
            return self.conditional(ident, start);
        }

        if self.eat('<') {
            let arg = self.expr()?;
            if !self.eat('>') {
                return Err(ParseError::invalid_type(self.raw, self.pos, "expected '>'"));
            }
            return Ok(TypeExpr::Generic {
                name: ident.to_string(),
                arg: Box::new(arg),
            });
        }

        Ok(TypeExpr::Named(ident.to_string()))
    }

    fn conditional(&mut self, ident: &str, start: usize) -> Result<TypeExpr, ParseError> {
        let (flags, bit) = ident.rsplit_once('.').ok_or_else(|| {
            ParseError::invalid_type(self.raw, start, "expected '<flags>.<bit>?' condition")
        })?;
        if flags.is_empty() || bit.is_empty() || !bit.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::invalid_type(
                self.raw,
                start,
                "expected '<flags>.<bit>?' condition",
            ));
        }

        let bit: u64 = bit
            .parse()
            .map_err(|_| ParseError::invalid_type(self.raw, start, "flag bit is not a number"))?;
        if bit > u64::from(MAX_FLAG_BIT) {
            return Err(ParseError::FlagBitOutOfRange {
                raw: self.raw.to_string(),
                bit,
            });
        }

        let inner = self.expr()?;
        Ok(TypeExpr::Conditional {
            flags: flags.to_string(),
            bit: bit as u8,
            inner: Box::new(inner),
        })
    }
}
