//! Formatted (text) streams.
//!
//! List-directed statements write every value on one record and read values
//! separated by blanks or commas, spanning records as needed; `r*v` repeats
//! `v` r times and `/` ends the statement leaving the remaining values
//! unchanged. Edit statements put `repeat` fixed-width fields on each record.
//! Either way a statement always occupies at least one record.

use super::format::{EditFormat, TextFormat, parse_real};
use super::{StreamError, StreamResult};
use crate::numeric::Real;
use std::io::{BufRead, Write};
use tracing::trace;

pub struct TextWriter<W: Write> {
    inner: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one statement holding `values`.
    pub fn write_reals(&mut self, format: &TextFormat, values: &[Real]) -> StreamResult<()> {
        match format {
            TextFormat::ListDirected => {
                let mut line = String::new();
                for v in values {
                    // 17 significant digits round-trip any f64
                    line.push_str(&format!(" {v:.16E}"));
                }
                writeln!(self.inner, "{line}")?;
            }
            TextFormat::Edit(edit) => {
                if values.is_empty() {
                    writeln!(self.inner)?;
                }
                for record in values.chunks(edit.repeat()) {
                    let line: String = record.iter().map(|&v| edit.render(v)).collect();
                    writeln!(self.inner, "{line}")?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

pub struct TextReader<R: BufRead> {
    inner: R,
}

impl<R: BufRead> TextReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `out` from one statement.
    pub fn read_reals(&mut self, format: &TextFormat, out: &mut [Real]) -> StreamResult<()> {
        match format {
            TextFormat::ListDirected => self.read_list(out),
            TextFormat::Edit(edit) => self.read_edit(edit, out),
        }
    }

    /// Read a statement of `n` values into a fresh buffer.
    pub fn read_vec(&mut self, format: &TextFormat, n: usize) -> StreamResult<Vec<Real>> {
        let mut out = vec![0.0; n];
        self.read_reals(format, &mut out)?;
        Ok(out)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_record(&mut self) -> StreamResult<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn read_list(&mut self, out: &mut [Real]) -> StreamResult<()> {
        let expected = out.len();
        let mut filled = 0;
        loop {
            let Some(record) = self.next_record()? else {
                return Err(StreamError::UnexpectedEof {
                    expected,
                    got: filled,
                });
            };
            for raw in record
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
            {
                if filled == expected {
                    break;
                }
                // `/` ends the statement, also when glued to a value
                let (token, slash) = match raw.split_once('/') {
                    Some((head, _)) => (head, true),
                    None => (raw, false),
                };
                if !token.is_empty() {
                    filled += fill_list_item(token, &mut out[filled..])?;
                }
                if slash {
                    trace!(filled, expected, "list-directed statement ended by slash");
                    return Ok(());
                }
            }
            if filled == expected {
                return Ok(());
            }
        }
    }

    fn read_edit(&mut self, edit: &EditFormat, out: &mut [Real]) -> StreamResult<()> {
        let expected = out.len();
        if out.is_empty() {
            return match self.next_record()? {
                Some(_) => Ok(()),
                None => Err(StreamError::UnexpectedEof { expected, got: 0 }),
            };
        }
        let mut got = 0;
        for chunk in out.chunks_mut(edit.repeat()) {
            let Some(record) = self.next_record()? else {
                return Err(StreamError::UnexpectedEof { expected, got });
            };
            let chars: Vec<char> = record.chars().collect();
            for (j, slot) in chunk.iter_mut().enumerate() {
                let start = (j * edit.width()).min(chars.len());
                let end = ((j + 1) * edit.width()).min(chars.len());
                let field: String = chars[start..end].iter().collect();
                *slot = parse_real(&field)?;
                got += 1;
            }
        }
        Ok(())
    }
}

/// Apply one list-directed item (`v`, `r*v` or `r*`) to the front of
/// `slots`, returning how many slots it consumed.
fn fill_list_item(token: &str, slots: &mut [Real]) -> StreamResult<usize> {
    let (count, value) = match token.split_once('*') {
        Some((r, v)) => {
            let count = r.parse::<usize>().map_err(|_| StreamError::Parse {
                token: token.to_string(),
            })?;
            (count, v)
        }
        None => (1, token),
    };
    // `r*` with no value leaves r slots untouched
    let parsed = if value.is_empty() {
        None
    } else {
        Some(parse_real(value)?)
    };
    let used = count.min(slots.len());
    if let Some(v) = parsed {
        slots[..used].fill(v);
    }
    Ok(used)
}
