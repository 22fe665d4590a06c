//! Result rendering: tab-aligned tables and JSON dumps

use std::io::{self, Write};

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Command results that can be rendered in either output format
pub trait ResultWriter {
    /// Data emitted for structured output
    type Dump: Serialize + ?Sized;

    /// Write the human-readable table
    fn write(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Data to serialize for structured output
    fn dump(&self) -> &Self::Dump;
}

/// Render `result` to `w` in the requested format
pub fn write_result<R: ResultWriter>(
    result: &R,
    format: OutputFormat,
    w: &mut dyn Write,
) -> eyre::Result<()> {
    match format {
        OutputFormat::Table => result.write(w)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, result.dump())?;
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Column aligner in the style of an elastic tab writer
///
/// Every cell except the last one on a line is padded to the widest cell
/// of its column plus `padding`, but never narrower than `min_width`.
#[derive(Debug)]
pub struct TabWriter {
    min_width: usize,
    padding: usize,
    rows: Vec<Vec<String>>,
}

impl TabWriter {
    pub fn new(min_width: usize, padding: usize) -> Self {
        Self {
            min_width,
            padding,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn flush(self, w: &mut dyn Write) -> io::Result<()> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            let padded = row.len().saturating_sub(1);
            for (i, cell) in row.iter().take(padded).enumerate() {
                let width = (cell.chars().count() + self.padding).max(self.min_width);
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        for row in &self.rows {
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter().enumerate() {
                if i == last {
                    write!(w, "{cell}")?;
                } else {
                    write!(w, "{cell:<width$}", width = widths[i])?;
                }
            }
            writeln!(w)?;
        }

        Ok(())
    }
}

impl Default for TabWriter {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

/// Format a byte count like `ls -h`: one decimal and a single-letter suffix
pub fn file_size(bytes: i64) -> String {
    const UNITS: [&str; 6] = ["K", "M", "G", "T", "P", "E"];

    if bytes < 1024 {
        return format!("{bytes}B");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

/// Format a timestamp as `Jan _2 15:04:05` in its own offset
pub fn stamp(time: Option<&DateTime<FixedOffset>>) -> String {
    time.map(|t| t.format("%b %e %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn render(tw: TabWriter) -> String {
        let mut buf = Vec::new();
        tw.flush(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tab_writer_aligns_columns() {
        let mut tw = TabWriter::default();
        tw.row(vec!["a".into(), "first".into(), "x".into()]);
        tw.row(vec!["long-id".into(), "2".into(), "y".into()]);

        assert_eq!(render(tw), "a        first  x\nlong-id  2      y\n");
    }

    #[test]
    fn test_tab_writer_min_width() {
        let mut tw = TabWriter::new(6, 1);
        tw.row(vec!["ab".into(), "c".into()]);

        assert_eq!(render(tw), "ab    c\n");
    }

    #[test]
    fn test_tab_writer_last_cell_unpadded() {
        let mut tw = TabWriter::default();
        tw.row(vec!["id".into(), "name".into()]);
        tw.row(vec!["identifier".into(), String::new()]);

        assert_eq!(render(tw), "id          name\nidentifier  \n");
    }

    #[test]
    fn test_tab_writer_counts_chars_not_bytes() {
        let mut tw = TabWriter::default();
        tw.row(vec!["déjà".into(), "x".into()]);
        tw.row(vec!["abcd".into(), "y".into()]);

        assert_eq!(render(tw), "déjà  x\nabcd  y\n");
    }

    #[test]
    fn test_file_size() {
        assert_eq!(file_size(0), "0B");
        assert_eq!(file_size(512), "512B");
        assert_eq!(file_size(1024), "1.0K");
        assert_eq!(file_size(1536), "1.5K");
        assert_eq!(file_size(100 * 1024 * 1024), "100.0M");
        assert_eq!(file_size(10 * 1024 * 1024 * 1024), "10.0G");
        assert_eq!(file_size(3 * 1024_i64.pow(4)), "3.0T");
    }

    #[test]
    fn test_stamp() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let t = utc.with_ymd_and_hms(2024, 3, 5, 9, 4, 7).unwrap();
        assert_eq!(stamp(Some(&t)), "Mar  5 09:04:07");
        assert_eq!(stamp(None), "");

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let t = tokyo.with_ymd_and_hms(2024, 3, 5, 10, 15, 30).unwrap();
        assert_eq!(stamp(Some(&t)), "Mar  5 10:15:30");
    }

    struct Names(Vec<String>);

    impl ResultWriter for Names {
        type Dump = [String];

        fn write(&self, w: &mut dyn Write) -> io::Result<()> {
            for name in &self.0 {
                writeln!(w, "{name}")?;
            }
            Ok(())
        }

        fn dump(&self) -> &Self::Dump {
            &self.0
        }
    }

    #[test]
    fn test_write_result_formats() {
        let names = Names(vec!["a".into(), "b".into()]);

        let mut table = Vec::new();
        write_result(&names, OutputFormat::Table, &mut table).unwrap();
        assert_eq!(String::from_utf8(table).unwrap(), "a\nb\n");

        let mut json = Vec::new();
        write_result(&names, OutputFormat::Json, &mut json).unwrap();
        let parsed: Vec<String> = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }
}
