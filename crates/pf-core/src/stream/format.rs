//! Text format specifiers for formatted streams.
//!
//! A format is either list-directed (`"*"`) or a single parenthesised edit
//! descriptor with an optional repeat count, e.g. `"(ES23.15)"`,
//! `"(3E24.16E3)"`, `"(F12.4)"`, `"(G20.12)"`. The descriptor is applied to
//! every value of a statement; when a statement holds more values than the
//! repeat count, the format is reused on the next record.

use super::{StreamError, StreamResult};
use crate::numeric::Real;
use std::fmt;
use std::str::FromStr;

/// Formatted-stream layout for one write/read statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Free-form values, written with enough digits to round-trip exactly.
    #[default]
    ListDirected,
    /// Fixed-width fields described by an edit descriptor.
    Edit(EditFormat),
}

/// Edit descriptor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// `Ew.d`: normalized mantissa `0.ddd` with exponent.
    E,
    /// `ESw.d`: scientific mantissa `d.ddd` with exponent.
    ES,
    /// `Fw.d`: fixed point.
    F,
    /// `Gw.d`: fixed point when the magnitude allows it, `E` otherwise.
    G,
}

/// Largest width, digit or exponent count a descriptor may carry.
const MAX_FIELD: usize = u16::MAX as usize;

/// A repeatable real edit descriptor such as `3ES23.15E3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditFormat {
    repeat: usize,
    kind: EditKind,
    width: usize,
    digits: usize,
    exponent_digits: Option<usize>,
}

impl TextFormat {
    /// Parse a format string, `"*"` selecting list-directed mode.
    pub fn parse(spec: &str) -> StreamResult<Self> {
        spec.parse()
    }

    pub fn is_list_directed(&self) -> bool {
        matches!(self, TextFormat::ListDirected)
    }
}

impl FromStr for TextFormat {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "*" {
            return Ok(TextFormat::ListDirected);
        }
        EditFormat::parse(trimmed).map(TextFormat::Edit)
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::ListDirected => write!(f, "*"),
            TextFormat::Edit(edit) => write!(f, "{edit}"),
        }
    }
}

impl fmt::Display for EditFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            EditKind::E => "E",
            EditKind::ES => "ES",
            EditKind::F => "F",
            EditKind::G => "G",
        };
        write!(f, "(")?;
        if self.repeat != 1 {
            write!(f, "{}", self.repeat)?;
        }
        write!(f, "{kind}{}.{}", self.width, self.digits)?;
        if let Some(e) = self.exponent_digits {
            write!(f, "E{e}")?;
        }
        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TextFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TextFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Cursor over the upper-cased descriptor text.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
    }

    fn done(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

impl EditFormat {
    pub fn parse(spec: &str) -> StreamResult<Self> {
        let invalid = |reason: &'static str| StreamError::InvalidFormat {
            spec: spec.to_string(),
            reason,
        };

        let upper: String = spec
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let inner = upper
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| invalid("expected a parenthesised descriptor"))?;

        let mut sc = Scanner {
            bytes: inner.as_bytes(),
            pos: 0,
        };

        let repeat = sc.number().unwrap_or(1);

        let kind = if sc.eat(b'E') {
            if sc.eat(b'S') { EditKind::ES } else { EditKind::E }
        } else if sc.eat(b'F') {
            EditKind::F
        } else if sc.eat(b'G') {
            EditKind::G
        } else {
            return Err(invalid("unsupported edit descriptor"));
        };

        let width = sc.number().ok_or_else(|| invalid("missing field width"))?;
        if !sc.eat(b'.') {
            return Err(invalid("missing decimal digits"));
        }
        let digits = sc
            .number()
            .ok_or_else(|| invalid("missing decimal digits"))?;

        let exponent_digits = if sc.eat(b'E') {
            let e = sc
                .number()
                .ok_or_else(|| invalid("missing exponent digits"))?;
            Some(e)
        } else {
            None
        };

        if !sc.done() {
            return Err(invalid("trailing characters after descriptor"));
        }

        let edit = Self {
            repeat,
            kind,
            width,
            digits,
            exponent_digits,
        };
        edit.check().map_err(invalid)?;
        Ok(edit)
    }

    /// Build a descriptor from its parts, rejecting the combinations
    /// [`parse`](Self::parse) rejects.
    pub fn new(
        repeat: usize,
        kind: EditKind,
        width: usize,
        digits: usize,
        exponent_digits: Option<usize>,
    ) -> StreamResult<Self> {
        let edit = Self {
            repeat,
            kind,
            width,
            digits,
            exponent_digits,
        };
        edit.check().map_err(|reason| StreamError::InvalidFormat {
            spec: edit.to_string(),
            reason,
        })?;
        Ok(edit)
    }

    fn check(&self) -> Result<(), &'static str> {
        if self.repeat == 0 {
            return Err("repeat count must be positive");
        }
        if self.width == 0 {
            return Err("field width must be positive");
        }
        if self.width > MAX_FIELD || self.digits > MAX_FIELD {
            return Err("field width and digits are limited to 65535");
        }
        match self.exponent_digits {
            Some(0) => return Err("exponent digits must be positive"),
            Some(e) if e >= self.width => {
                return Err("exponent digits must be narrower than the field");
            }
            _ => {}
        }
        if matches!(self.kind, EditKind::E | EditKind::G) && self.digits == 0 {
            return Err("E and G descriptors need at least one digit");
        }
        if self.kind == EditKind::F && self.exponent_digits.is_some() {
            return Err("F descriptor takes no exponent width");
        }
        Ok(())
    }

    /// Fields per record, at least 1.
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn exponent_digits(&self) -> Option<usize> {
        self.exponent_digits
    }

    /// Render one value right-justified into exactly `width` characters.
    ///
    /// Values that do not fit are written as a field of `*`.
    pub fn render(&self, v: Real) -> String {
        let body = if !v.is_finite() {
            Some(non_finite(v, self.width))
        } else {
            match self.kind {
                EditKind::E => self.render_e(v),
                EditKind::ES => self.render_es(v),
                EditKind::F => render_f(v, self.digits, self.width),
                EditKind::G => self.render_g(v),
            }
        };
        match body {
            Some(s) if s.len() <= self.width => format!("{s:>w$}", w = self.width),
            _ => "*".repeat(self.width),
        }
    }

    fn render_e(&self, v: Real) -> Option<String> {
        let (digits, exp) = if v == 0.0 {
            ("0".repeat(self.digits), 0)
        } else {
            let (digits, e) = sci_digits(v.abs(), self.digits);
            (digits, e + 1)
        };
        let exp = exponent_field(exp, self.exponent_digits)?;
        let sign = if v.is_sign_negative() { "-" } else { "" };
        let full = format!("{sign}0.{digits}{exp}");
        if full.len() <= self.width {
            Some(full)
        } else {
            Some(format!("{sign}.{digits}{exp}"))
        }
    }

    fn render_es(&self, v: Real) -> Option<String> {
        let (digits, exp) = if v == 0.0 {
            ("0".repeat(self.digits + 1), 0)
        } else {
            sci_digits(v.abs(), self.digits + 1)
        };
        let exp = exponent_field(exp, self.exponent_digits)?;
        let sign = if v.is_sign_negative() { "-" } else { "" };
        let (lead, rest) = digits.split_at(1);
        Some(format!("{sign}{lead}.{rest}{exp}"))
    }

    fn render_g(&self, v: Real) -> Option<String> {
        let trailing = self.exponent_digits.map_or(4, |e| e + 2);
        // decimal exponent of the value once rounded to `digits` significant digits
        let k = if v == 0.0 {
            1
        } else {
            sci_digits(v.abs(), self.digits).1 + 1
        };
        let digits = self.digits as i32;
        if (0..=digits).contains(&k) && self.width > trailing {
            let decimals = (digits - k) as usize;
            let fixed = render_f(v, decimals, self.width - trailing)?;
            let fixed = format!("{fixed:>w$}", w = self.width - trailing);
            Some(format!("{fixed}{}", " ".repeat(trailing)))
        } else {
            self.render_e(v)
        }
    }
}

/// Mantissa digits (no decimal point) and decimal exponent of `v` rounded to
/// `sig` significant digits, in `d.ddd × 10^e` form.
fn sci_digits(v: Real, sig: usize) -> (String, i32) {
    let s = format!("{:.*e}", sig.saturating_sub(1), v);
    let (mantissa, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    (digits, exp.parse().unwrap_or(0))
}

fn exponent_field(exp: i32, exponent_digits: Option<usize>) -> Option<String> {
    let sign = if exp < 0 { '-' } else { '+' };
    let mag = exp.unsigned_abs();
    match exponent_digits {
        Some(e) => {
            // widths past u128 range hold any i32 exponent
            let fits = u32::try_from(e)
                .ok()
                .and_then(|e| 10u128.checked_pow(e))
                .is_none_or(|limit| u128::from(mag) < limit);
            if fits {
                Some(format!("E{sign}{mag:0e$}"))
            } else {
                None
            }
        }
        None if mag <= 99 => Some(format!("E{sign}{mag:02}")),
        None if mag <= 999 => Some(format!("{sign}{mag:03}")),
        None => None,
    }
}

fn render_f(v: Real, decimals: usize, width: usize) -> Option<String> {
    let mut mag = format!("{:.*}", decimals, v.abs());
    if decimals == 0 {
        mag.push('.');
    }
    let sign = if v.is_sign_negative() { "-" } else { "" };
    let full = format!("{sign}{mag}");
    if full.len() > width {
        if let Some(stripped) = mag.strip_prefix("0.") {
            return Some(format!("{sign}.{stripped}"));
        }
    }
    Some(full)
}

fn non_finite(v: Real, width: usize) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        let sign = if v < 0.0 { "-" } else { "" };
        let long = format!("{sign}Infinity");
        if long.len() <= width {
            long
        } else {
            format!("{sign}Inf")
        }
    }
}

/// Parse one real field as written by either text mode.
///
/// Blank fields read as zero, `D` exponents are accepted, and the
/// exponent-letter-less form `0.1234+101` is recognised.
pub fn parse_real(field: &str) -> StreamResult<Real> {
    let token = field.trim();
    if token.is_empty() {
        return Ok(0.0);
    }
    let mut normalized: String = token
        .chars()
        .map(|c| match c {
            'd' | 'D' => 'E',
            other => other,
        })
        .collect();

    let has_letter = normalized.contains(['e', 'E']);
    let is_word = normalized
        .trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_alphabetic());
    if !has_letter && !is_word {
        if let Some(pos) = normalized
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '+' || *c == '-')
            .map(|(i, _)| i)
        {
            normalized.insert(pos, 'E');
        }
    }

    normalized.parse::<Real>().map_err(|_| StreamError::Parse {
        token: token.to_string(),
    })
}
