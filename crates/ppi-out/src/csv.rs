//! Report CSV: `time,word,subject,count`, one row per record.
//!
//! Fields containing a comma, quote or line break are quoted with inner
//! quotes doubled. The reader accepts the columns in any order and quoted
//! fields spanning lines.
use ppi_core::ProfanityRecord;
use std::io::{Read, Write};

use crate::error::{RenderError, Result};

pub const HEADER: [&str; 4] = ["time", "word", "subject", "count"];

pub fn write_records<W: Write>(mut writer: W, records: &[ProfanityRecord]) -> Result<()> {
    writeln!(writer, "{}", HEADER.join(","))?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{}",
            escape(&record.time),
            escape(&record.word),
            escape(&record.subject),
            record.count
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<ProfanityRecord>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut rows = parse_rows(&text)?.into_iter();
    let Some((_, header)) = rows.next() else {
        return Err(RenderError::Csv {
            line: 1,
            reason: "missing header".to_string(),
        });
    };
    let columns = Columns::from_header(&header)?;

    rows.map(|(line, fields)| columns.record(line, fields))
        .collect()
}

/// Position of each known column in the header.
struct Columns {
    time: usize,
    word: usize,
    subject: usize,
    count: usize,
    width: usize,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| RenderError::Csv {
                    line: 1,
                    reason: format!("header has no '{}' column", name),
                })
        };
        Ok(Self {
            time: find("time")?,
            word: find("word")?,
            subject: find("subject")?,
            count: find("count")?,
            width: header.len(),
        })
    }

    fn record(&self, line: usize, mut fields: Vec<String>) -> Result<ProfanityRecord> {
        if fields.len() != self.width {
            return Err(RenderError::Csv {
                line,
                reason: format!("expected {} fields, found {}", self.width, fields.len()),
            });
        }
        let count = fields[self.count]
            .trim()
            .parse::<u64>()
            .map_err(|e| RenderError::Csv {
                line,
                reason: format!("count '{}': {}", fields[self.count], e),
            })?;
        Ok(ProfanityRecord {
            time: std::mem::take(&mut fields[self.time]),
            word: std::mem::take(&mut fields[self.word]),
            subject: std::mem::take(&mut fields[self.subject]),
            count,
        })
    }
}

/// Splits `text` into rows of fields, tagging each row with the line it
/// starts on. Blank lines are dropped.
fn parse_rows(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_row(&mut rows, &mut fields, &mut field, row_start);
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(RenderError::Csv {
            line: row_start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    end_row(&mut rows, &mut fields, &mut field, row_start);
    Ok(rows)
}

fn end_row(
    rows: &mut Vec<(usize, Vec<String>)>,
    fields: &mut Vec<String>,
    field: &mut String,
    line: usize,
) {
    if fields.is_empty() && field.is_empty() {
        return;
    }
    fields.push(std::mem::take(field));
    rows.push((line, std::mem::take(fields)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_unquoted() {
        assert_eq!(escape("Trump"), "Trump");
        assert_eq!(escape("2020-11-04T00:01:00Z"), "2020-11-04T00:01:00Z");
    }

    #[test]
    fn test_special_fields_quoted() {
        assert_eq!(escape("Biden, Joe"), "\"Biden, Joe\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_parse_rows_tracks_lines() {
        let rows = parse_rows("a,b\r\n\n\"x\ny\",z\nlast,1").unwrap();
        let starts: Vec<usize> = rows.iter().map(|(line, _)| *line).collect();
        assert_eq!(starts, vec![1, 3, 5]);
        assert_eq!(rows[1].1, vec!["x\ny", "z"]);
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let err = parse_rows("a,b\n\"open,1").unwrap_err();
        assert!(matches!(err, RenderError::Csv { line: 2, .. }));
    }
}
