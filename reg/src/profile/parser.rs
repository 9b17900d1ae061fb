//! # Profile Tokenizer
//!
//! A single pass over the text, one character at a time. The parser keeps the
//! word being accumulated, the column of that word within the current line and
//! the register definition assembled from the words seen so far.
//!
//! - `#` starts a comment that runs to the end of the line, even in the middle
//!   of a word.
//! - Spaces, tabs and carriage returns end a word. Empty words do not exist,
//!   so repeated whitespace never moves the column.
//! - A newline ends the last word and then the line: a role line binds its
//!   role, a definition line with at least four words becomes a
//!   [`RegisterItem`].
//! - A word longer than [`MAX_TOKEN_LEN`] characters fails the whole parse.
//!
//! Only complete lines count: whatever follows the last newline is dropped.
//!
//! Definition columns:
//!
//! | Column | Field             | Notes                                   |
//! |--------|-------------------|-----------------------------------------|
//! | 0      | type name         | `gpr`, `drx`, `fpu`, `mmx`, `xmm`, ...  |
//! | 1      | register name     |                                         |
//! | 2      | size              | bytes, or bits with a leading `.`       |
//! | 3      | offset            | same convention                         |
//! | 4      | packed size       | optional, same convention               |

use std::num::IntErrorKind;

use super::{FieldPolicy, Profile};
use crate::{
    error::{Diagnostic, FieldError, RegError},
    item::RegisterItem,
    register_type::{RegisterType, TypeSelector, type_by_name},
    role::{Role, role_by_name},
};

/// Longest word accepted, in characters.
pub const MAX_TOKEN_LEN: usize = 128;

/// Minimum number of words of a definition line.
const DEFINITION_WORDS: usize = 4;

/// Parses profile text.
///
/// # Errors
///
/// [`RegError::TokenTooLong`] when a word exceeds [`MAX_TOKEN_LEN`]; with
/// [`FieldPolicy::Strict`], [`RegError::Field`] on the first malformed word.
pub fn parse(text: &str, policy: FieldPolicy) -> Result<Profile, RegError> {
    let mut parser = Parser::new(policy);
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                if chars.by_ref().any(|c| c == '\n') {
                    parser.end_line()?;
                }
            }
            '\n' => parser.end_line()?,
            ' ' | '\t' | '\r' => parser.end_word()?,
            _ => parser.push_char(ch)?,
        }
    }

    if !parser.token.is_empty() || parser.column > 0 {
        tracing::debug!("dropping unterminated line {}", parser.line);
    }

    Ok(parser.profile)
}

/// Register definition being assembled from the words of one line.
#[derive(Debug, Default)]
struct PendingItem {
    ty: Option<RegisterType>,
    name: Option<String>,
    bit_size: u32,
    bit_offset: u32,
    packed_bit_size: u32,
}

impl PendingItem {
    fn set_word(&mut self, column: usize, word: &str) -> Result<(), FieldError> {
        match column {
            0 => match type_by_name(word)? {
                TypeSelector::Only(ty) => self.ty = Some(ty),
                TypeSelector::All => return Err(FieldError::NotAStorageType(word.to_string())),
            },
            1 => self.name = Some(word.to_string()),
            2 => self.bit_size = parse_bits(word)?,
            3 => self.bit_offset = parse_bits(word)?,
            4 => self.packed_bit_size = parse_bits(word)?,
            _ => {
                return Err(FieldError::ExtraColumn {
                    column,
                    word: word.to_string(),
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> Option<RegisterItem> {
        Some(RegisterItem {
            name: self.name.filter(|name| !name.is_empty())?,
            ty: self.ty?,
            bit_size: self.bit_size,
            bit_offset: self.bit_offset,
            packed_bit_size: self.packed_bit_size,
        })
    }
}

/// A line that started with `=keyword`.
#[derive(Debug)]
struct RoleLine {
    keyword: String,
    role: Option<Role>,
    target: Option<String>,
}

struct Parser {
    policy: FieldPolicy,
    line: usize,
    column: usize,
    token: String,
    token_chars: usize,
    pending: PendingItem,
    role_line: Option<RoleLine>,
    profile: Profile,
}

impl Parser {
    fn new(policy: FieldPolicy) -> Self {
        Self {
            policy,
            line: 1,
            column: 0,
            token: String::with_capacity(MAX_TOKEN_LEN),
            token_chars: 0,
            pending: PendingItem::default(),
            role_line: None,
            profile: Profile::default(),
        }
    }

    fn push_char(&mut self, ch: char) -> Result<(), RegError> {
        if self.token_chars == MAX_TOKEN_LEN {
            return Err(RegError::TokenTooLong {
                line: self.line,
                limit: MAX_TOKEN_LEN,
            });
        }
        self.token.push(ch);
        self.token_chars += 1;
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), RegError> {
        if self.token.is_empty() {
            return Ok(());
        }

        let word = std::mem::take(&mut self.token);
        self.token_chars = 0;

        if self.column == 0
            && let Some(keyword) = word.strip_prefix('=')
        {
            let role = role_by_name(keyword);
            self.role_line = Some(RoleLine {
                keyword: keyword.to_string(),
                role,
                target: None,
            });
            if role.is_none() {
                self.report(FieldError::UnknownRole(keyword.to_string()))?;
            }
        } else if let Some(role_line) = &mut self.role_line {
            if role_line.target.is_none() {
                role_line.target = Some(word);
            } else {
                let column = self.column;
                self.report(FieldError::ExtraColumn { column, word })?;
            }
        } else if let Err(error) = self.pending.set_word(self.column, &word) {
            self.report(error)?;
        }

        self.column += 1;
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), RegError> {
        self.end_word()?;

        let pending = std::mem::take(&mut self.pending);
        if let Some(role_line) = self.role_line.take() {
            match (role_line.role, role_line.target) {
                (Some(role), Some(name)) => self.profile.roles.push((role, name)),
                (Some(_), None) => {
                    self.report(FieldError::MissingRoleTarget(role_line.keyword))?;
                }
                (None, _) => {}
            }
        } else if self.column >= DEFINITION_WORDS {
            if let Some(item) = pending.finish() {
                self.profile.items.push(item);
            }
        } else if self.column > 0 {
            self.report(FieldError::IncompleteLine(self.column))?;
        }

        self.line += 1;
        self.column = 0;
        Ok(())
    }

    fn report(&mut self, error: FieldError) -> Result<(), RegError> {
        let diagnostic = Diagnostic {
            line: self.line,
            error,
        };
        tracing::warn!("{diagnostic}");

        match self.policy {
            FieldPolicy::Lenient => {
                self.profile.diagnostics.push(diagnostic);
                Ok(())
            }
            FieldPolicy::Strict => Err(RegError::Field(diagnostic)),
        }
    }
}

/// Reads a size or offset: decimal bytes, or decimal bits after a `.`.
fn parse_bits(word: &str) -> Result<u32, FieldError> {
    let (digits, scale) = word.strip_prefix('.').map_or((word, 8), |bits| (bits, 1));

    let value: u32 = digits.parse().map_err(|e: std::num::ParseIntError| {
        if *e.kind() == IntErrorKind::PosOverflow {
            FieldError::NumberOverflow(word.to_string())
        } else {
            FieldError::BadNumber(word.to_string())
        }
    })?;

    value
        .checked_mul(scale)
        .ok_or_else(|| FieldError::NumberOverflow(word.to_string()))
}
