#![forbid(unsafe_code)]

//! SGR sequence parsing.
//!
//! Accepts one complete sequence, `ESC [ p1 ; p2 ; ... m`, and produces the
//! structured statements it encodes. Parsing fails closed: any malformed
//! token, unknown code, or wrong extended-color argument count rejects the
//! whole sequence, because a misparsed statement would corrupt every cell
//! rendered after it.
//!
//! The extended color codes 38 (foreground), 48 (background) and 58
//! (underline color) consume additional parameters: `5;<index>` selects a
//! palette entry, `2;<r>;<g>;<b>` a true color.

use memchr::memchr;

use crate::statement::{Blink, Color, Emphasis, Intensity, SgrStatement, Underline};

/// Why a sequence was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SgrParseError {
    /// The sequence does not start with `ESC [`.
    MissingIntroducer,
    /// The sequence does not end with the SGR terminator `m`.
    MissingTerminator,
    /// Bytes follow the first `m` terminator.
    TrailingInput,
    /// A parameter token is empty or not a decimal number.
    BadParameter(String),
    /// A numeric code outside the supported SGR set.
    UnknownCode(u16),
    /// An extended color code (38/48/58) ran out of arguments.
    TruncatedColor(u16),
    /// An extended color code was followed by a mode other than 2 or 5.
    BadColorMode {
        /// The extended color code.
        code: u16,
        /// The offending mode parameter.
        mode: u16,
    },
    /// A palette index or RGB component exceeds 255.
    ComponentRange {
        /// The extended color code.
        code: u16,
        /// The offending component value.
        value: u16,
    },
}

impl core::fmt::Display for SgrParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingIntroducer => write!(f, "sequence does not start with CSI (ESC '[')"),
            Self::MissingTerminator => write!(f, "sequence does not end with 'm'"),
            Self::TrailingInput => write!(f, "unexpected bytes after the 'm' terminator"),
            Self::BadParameter(token) => write!(f, "parameter {token:?} is not a decimal number"),
            Self::UnknownCode(code) => write!(f, "unsupported SGR code {code}"),
            Self::TruncatedColor(code) => {
                write!(f, "extended color code {code} is missing arguments")
            }
            Self::BadColorMode { code, mode } => {
                write!(f, "extended color code {code}: mode {mode} is not 2 or 5")
            }
            Self::ComponentRange { code, value } => {
                write!(f, "extended color code {code}: component {value} exceeds 255")
            }
        }
    }
}

impl std::error::Error for SgrParseError {}

/// Parse one complete SGR sequence into statements.
///
/// `ESC [ m` (no parameters) parses as a single [`SgrStatement::Reset`],
/// matching terminal convention for the empty parameter list.
pub fn parse(sequence: &str) -> Result<Vec<SgrStatement>, SgrParseError> {
    let bytes = sequence.as_bytes();
    if bytes.len() < 2 || bytes[0] != 0x1b || bytes[1] != b'[' {
        return Err(SgrParseError::MissingIntroducer);
    }

    let Some(term) = memchr(b'm', bytes) else {
        return Err(SgrParseError::MissingTerminator);
    };
    if term != bytes.len() - 1 {
        return Err(SgrParseError::TrailingInput);
    }

    let params = &sequence[2..term];
    if params.is_empty() {
        return Ok(vec![SgrStatement::Reset]);
    }

    let codes = params
        .split(';')
        .map(parse_token)
        .collect::<Result<Vec<u16>, _>>()?;

    let mut statements = Vec::with_capacity(codes.len());
    let mut iter = codes.into_iter();
    while let Some(code) = iter.next() {
        let statement = match code {
            38 | 48 | 58 => {
                let color = parse_extended_color(code, &mut iter)?;
                match code {
                    38 => SgrStatement::Foreground(color),
                    48 => SgrStatement::Background(color),
                    _ => SgrStatement::UnderlineColor(color),
                }
            }
            _ => simple_statement(code)?,
        };
        statements.push(statement);
    }
    Ok(statements)
}

fn parse_token(token: &str) -> Result<u16, SgrParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SgrParseError::BadParameter(token.to_string()));
    }
    token
        .parse::<u16>()
        .map_err(|_| SgrParseError::BadParameter(token.to_string()))
}

fn parse_extended_color(
    code: u16,
    iter: &mut impl Iterator<Item = u16>,
) -> Result<Color, SgrParseError> {
    let mode = iter.next().ok_or(SgrParseError::TruncatedColor(code))?;
    match mode {
        5 => {
            let index = iter.next().ok_or(SgrParseError::TruncatedColor(code))?;
            component(code, index).map(Color::Palette)
        }
        2 => {
            let r = iter.next().ok_or(SgrParseError::TruncatedColor(code))?;
            let g = iter.next().ok_or(SgrParseError::TruncatedColor(code))?;
            let b = iter.next().ok_or(SgrParseError::TruncatedColor(code))?;
            Ok(Color::Rgb(
                component(code, r)?,
                component(code, g)?,
                component(code, b)?,
            ))
        }
        _ => Err(SgrParseError::BadColorMode { code, mode }),
    }
}

#[inline]
fn component(code: u16, value: u16) -> Result<u8, SgrParseError> {
    u8::try_from(value).map_err(|_| SgrParseError::ComponentRange { code, value })
}

fn simple_statement(code: u16) -> Result<SgrStatement, SgrParseError> {
    Ok(match code {
        0 => SgrStatement::Reset,
        1 => SgrStatement::Intensity(Intensity::Bold),
        2 => SgrStatement::Intensity(Intensity::Faint),
        3 => SgrStatement::Emphasis(Emphasis::Italic),
        4 => SgrStatement::Underline(Underline::Single),
        5 => SgrStatement::Blink(Blink::Slow),
        6 => SgrStatement::Blink(Blink::Rapid),
        7 => SgrStatement::Invert(true),
        8 => SgrStatement::Conceal(true),
        9 => SgrStatement::Strike(true),
        10..=19 => SgrStatement::Font((code - 10) as u8),
        20 => SgrStatement::Emphasis(Emphasis::Fraktur),
        21 => SgrStatement::Underline(Underline::Double),
        22 => SgrStatement::Intensity(Intensity::Normal),
        23 => SgrStatement::Emphasis(Emphasis::Off),
        24 => SgrStatement::Underline(Underline::Off),
        25 => SgrStatement::Blink(Blink::Off),
        26 => SgrStatement::Proportional(true),
        27 => SgrStatement::Invert(false),
        28 => SgrStatement::Conceal(false),
        29 => SgrStatement::Strike(false),
        30..=37 => SgrStatement::Foreground(Color::Standard((code - 30) as u8)),
        39 => SgrStatement::Foreground(Color::Default),
        40..=47 => SgrStatement::Background(Color::Standard((code - 40) as u8)),
        49 => SgrStatement::Background(Color::Default),
        50 => SgrStatement::Proportional(false),
        59 => SgrStatement::UnderlineColor(Color::Default),
        90..=97 => SgrStatement::Foreground(Color::Bright((code - 90) as u8)),
        100..=107 => SgrStatement::Background(Color::Bright((code - 100) as u8)),
        other => return Err(SgrParseError::UnknownCode(other)),
    })
}
