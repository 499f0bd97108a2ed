//! Tolerant CSV parser for spare-parts inventory exports.
//!
//! The export is comma-delimited with optional double-quote enclosure and a
//! header line. Quoting is resolved with a simple parity rule: a comma splits
//! only when an even number of quote characters precede it on the line.
//! Rows whose field count differs from the header are skipped, not fatal.

use serde::Serialize;

use crate::error::{IngestError, IngestResult};

/// One accepted data row: `(header, raw value)` pairs in header order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the (trimmed) input.
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }
}

/// A data row dropped because its field count did not match the header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub expected: usize,
    pub found: usize,
}

/// Result of reading one data line.
#[derive(Clone, Debug, PartialEq)]
pub enum LineOutcome {
    Blank,
    Row(RawRow),
    Skipped(SkippedRow),
}

/// Fully parsed input.
#[derive(Clone, Debug, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub skipped: Vec<SkippedRow>,
}

/// CSV text split into a header and data lines, read one line at a time.
pub struct CsvDocument<'a> {
    headers: Vec<String>,
    data_lines: Vec<&'a str>,
}

impl<'a> CsvDocument<'a> {
    /// Split `text` into lines and parse the header.
    ///
    /// Fails when fewer than two non-empty lines are present.
    pub fn parse(text: &'a str) -> IngestResult<Self> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
        let non_empty = lines.iter().filter(|l| !l.is_empty()).count();
        if non_empty < 2 {
            return Err(IngestError::EmptyOrMalformedInput(format!(
                "expected a header and at least one data row, found {} non-empty line{}",
                non_empty,
                if non_empty == 1 { "" } else { "s" }
            )));
        }

        let headers = split_line(lines[0])
            .into_iter()
            .map(|h| h.replace('"', "").trim().to_string())
            .collect();

        Ok(Self {
            headers,
            data_lines: lines[1..].to_vec(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of lines after the header, blank ones included.
    pub fn data_line_count(&self) -> usize {
        self.data_lines.len()
    }

    /// Read data line `index` (0-based, header excluded).
    pub fn read_line(&self, index: usize) -> LineOutcome {
        let line_number = index + 2;
        let line = match self.data_lines.get(index) {
            Some(l) if !l.is_empty() => *l,
            _ => return LineOutcome::Blank,
        };

        let values: Vec<&str> = split_line(line).into_iter().map(str::trim).collect();
        if values.len() != self.headers.len() {
            log::warn!(
                "skipping line {}: {} fields but header has {}",
                line_number,
                values.len(),
                self.headers.len()
            );
            return LineOutcome::Skipped(SkippedRow {
                line: line_number,
                expected: self.headers.len(),
                found: values.len(),
            });
        }

        let fields = self
            .headers
            .iter()
            .zip(values)
            .map(|(h, v)| (h.clone(), strip_enclosing_quotes(v).to_string()))
            .collect();
        LineOutcome::Row(RawRow {
            line: line_number,
            fields,
        })
    }

    /// Read every data line.
    pub fn into_parsed(self) -> ParsedCsv {
        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for index in 0..self.data_line_count() {
            match self.read_line(index) {
                LineOutcome::Row(row) => rows.push(row),
                LineOutcome::Skipped(s) => skipped.push(s),
                LineOutcome::Blank => {}
            }
        }
        ParsedCsv {
            headers: self.headers,
            rows,
            skipped,
        }
    }
}

/// Parse CSV text into raw rows plus the header list in file order.
pub fn parse_csv(text: &str) -> IngestResult<ParsedCsv> {
    Ok(CsvDocument::parse(text)?.into_parsed())
}

/// Split on commas preceded by an even number of quote characters.
fn split_line(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quotes = 0usize;
    let mut start = 0;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => quotes += 1,
            ',' if quotes % 2 == 0 => {
                parts.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&line[start..]);
    parts
}

fn strip_enclosing_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
