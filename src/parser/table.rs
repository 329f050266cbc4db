//! Header-synchronized table extraction
//!
//! Calibration logs hold several unrelated tables. Only lines that follow the
//! exact [`TABLE_HEADER`] and parse as rows are kept; the first line that does
//! not parse closes the table until the header shows up again.

use std::io::{self, BufRead};
use tracing::debug;

use super::row::{RowParse, RowParser};
use crate::constants::TABLE_HEADER;
use crate::models::Row;

/// Position of the parser relative to the TX power table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableState {
    /// Looking for the header line
    #[default]
    Seeking,
    /// Inside the table, every line is expected to be a row
    InTable,
}

impl TableState {
    /// Consume one line and return the next state plus the row it produced.
    ///
    /// A line rejected while in the table is dropped; it is not re-checked
    /// as a header.
    pub fn step<P: RowParse + ?Sized>(self, line: &str, parser: &P) -> (TableState, Option<Row>) {
        match self {
            TableState::Seeking if line == TABLE_HEADER => (TableState::InTable, None),
            TableState::Seeking => (TableState::Seeking, None),
            TableState::InTable => match parser.try_parse(line) {
                Some(row) => (TableState::InTable, Some(row)),
                None => (TableState::Seeking, None),
            },
        }
    }
}

/// Counters gathered while scanning one line stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStats {
    pub lines_read: usize,
    /// Number of times the header was matched
    pub tables_found: usize,
    pub rows_parsed: usize,
    /// Lines inside a table that failed to parse and closed it
    pub lines_rejected: usize,
}

/// Rows extracted from one stream with the statistics of the scan
#[derive(Debug, Clone, Default)]
pub struct TableParse {
    pub rows: Vec<Row>,
    pub stats: TableStats,
}

#[derive(Debug, Clone, Default)]
pub struct TableParser<P = RowParser> {
    row_parser: P,
}

impl TableParser<RowParser> {
    pub fn new() -> Self {
        Self {
            row_parser: RowParser::new(),
        }
    }
}

impl<P: RowParse> TableParser<P> {
    /// Create a table parser around a custom row parser
    pub fn with_row_parser(row_parser: P) -> Self {
        Self { row_parser }
    }

    /// Extract table rows from an in-memory line sequence
    pub fn parse_lines<I, S>(&self, lines: I) -> TableParse
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scan = Scan::default();
        for line in lines {
            scan.feed(line.as_ref(), &self.row_parser);
        }
        scan.finish()
    }

    /// Extract table rows from a reader, line by line.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`. A UTF-8 byte order mark at
    /// the start of the stream is dropped. Read or UTF-8 decoding failures
    /// abort the stream; rows collected so far are discarded together with it.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> io::Result<TableParse> {
        let mut scan = Scan::default();
        for (index, line) in LogLines::new(reader).enumerate() {
            let line = line?;
            let line = match index {
                0 => line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&line),
                _ => &line,
            };
            scan.feed(line, &self.row_parser);
        }
        Ok(scan.finish())
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Line iterator over a reader that also accepts classic Mac line endings
struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LogLines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Fill `buf` with the next line without its terminator; false at end of stream
    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let mut read_any = false;
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    let terminator = available[end];
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    if terminator == b'\r' && self.reader.fill_buf()?.first() == Some(&b'\n') {
                        self.reader.consume(1);
                    }
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line() {
            Ok(false) => None,
            Ok(true) => Some(
                std::str::from_utf8(&self.buf)
                    .map(str::to_owned)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            ),
            Err(e) => Some(Err(e)),
        }
    }
}

#[derive(Default)]
struct Scan {
    state: TableState,
    result: TableParse,
}

impl Scan {
    fn feed<P: RowParse>(&mut self, line: &str, parser: &P) {
        let stats = &mut self.result.stats;
        stats.lines_read += 1;

        let (next, row) = self.state.step(line, parser);
        match (self.state, next) {
            (TableState::Seeking, TableState::InTable) => {
                stats.tables_found += 1;
                debug!("Table header found at line {}", stats.lines_read);
            }
            (TableState::InTable, TableState::Seeking) => {
                stats.lines_rejected += 1;
                debug!(
                    "Line {} closed the table: '{}'",
                    stats.lines_read,
                    line.trim_end()
                );
            }
            _ => {}
        }

        if let Some(row) = row {
            stats.rows_parsed += 1;
            self.result.rows.push(row);
        }
        self.state = next;
    }

    fn finish(self) -> TableParse {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use std::io::Cursor;

    const DATA: &str = "GSM850, 5, 32.51429, 32.50000, 32.00000, 33.00000, PASS";

    const UNRELATED: [&str; 6] = [
        "[AGC Calibration]",
        "Band: (GSM850)",
        "Arfcn, Gain offset, MAX, MIN, Check Result",
        "140, 3.375, 8.500, -8.500, PASS",
        "150, 3.375, 8.500, -8.500, PASS",
        "160, 3.250, 8.500, -8.500, PASS",
    ];

    /// Accepts only lines equal to `DATA`, returning a fixed row
    struct ExactLineParser;

    impl RowParse for ExactLineParser {
        fn parse(&self, line: &str) -> Result<Row, RowError> {
            if line == DATA {
                Ok(Row {
                    band: "STUB".to_string(),
                    pcl: 1,
                    ..Row::default()
                })
            } else {
                Err(RowError::ColumnCount {
                    expected: 7,
                    found: 0,
                })
            }
        }
    }

    fn with_table(rows: usize) -> Vec<&'static str> {
        let mut lines = UNRELATED.to_vec();
        lines.push(TABLE_HEADER);
        lines.extend(std::iter::repeat_n(DATA, rows));
        lines.extend(UNRELATED);
        lines
    }

    #[test]
    fn test_step_transitions() {
        let parser = RowParser::new();

        assert_eq!(
            TableState::Seeking.step(TABLE_HEADER, &parser),
            (TableState::InTable, None)
        );
        assert_eq!(
            TableState::Seeking.step(DATA, &parser),
            (TableState::Seeking, None)
        );

        let (state, row) = TableState::InTable.step(DATA, &parser);
        assert_eq!(state, TableState::InTable);
        assert_eq!(row.unwrap().band, "GSM850");

        assert_eq!(
            TableState::InTable.step("garbage", &parser),
            (TableState::Seeking, None)
        );
        // The header itself is not a valid row, so inside a table it closes it
        assert_eq!(
            TableState::InTable.step(TABLE_HEADER, &parser),
            (TableState::Seeking, None)
        );
    }

    #[test]
    fn test_header_match_is_exact() {
        let parser = RowParser::new();
        for candidate in [
            " Band, PCL, TX Power, Target Power, MIN Power, MAX Power, Check Result",
            "Band, PCL, TX Power, Target Power, MIN Power, MAX Power, Check Result ",
            "band, pcl, tx power, target power, min power, max power, check result",
            "Band,PCL,TX Power,Target Power,MIN Power,MAX Power,Check Result",
        ] {
            assert_eq!(
                TableState::Seeking.step(candidate, &parser).0,
                TableState::Seeking
            );
        }
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let result = TableParser::new().parse_lines(Vec::<String>::new());
        assert!(result.rows.is_empty());
        assert_eq!(result.stats, TableStats::default());
    }

    #[test]
    fn test_only_header_yields_no_rows() {
        let result = TableParser::new().parse_lines([TABLE_HEADER]);
        assert!(result.rows.is_empty());
        assert_eq!(result.stats.tables_found, 1);
    }

    #[test]
    fn test_rows_between_unrelated_content() {
        let result = TableParser::new().parse_lines(with_table(3));

        assert_eq!(result.rows.len(), 3);
        let first = &result.rows[0];
        assert_eq!(first.band, "GSM850");
        assert_eq!(first.pcl, 5);
        assert_eq!(first.tx_power, 32.51429);
        assert_eq!(first.target_power, 32.5);
        assert_eq!(first.min_power, 32.0);
        assert_eq!(first.max_power, 33.0);
        assert!(first.is_passed);

        assert_eq!(result.stats.tables_found, 1);
        assert_eq!(result.stats.rows_parsed, 3);
        assert_eq!(result.stats.lines_rejected, 1);
    }

    #[test]
    fn test_injected_row_parser() {
        let result = TableParser::with_row_parser(ExactLineParser).parse_lines(with_table(3));
        assert_eq!(result.rows.len(), 3);
        assert!(result.rows.iter().all(|row| row.band == "STUB"));
    }

    #[test]
    fn test_rows_without_header_are_ignored() {
        let result = TableParser::new().parse_lines([DATA, DATA, "", DATA]);
        assert!(result.rows.is_empty());
        assert_eq!(result.stats.tables_found, 0);
    }

    #[test]
    fn test_malformed_line_closes_table() {
        let lines = [
            TABLE_HEADER,
            DATA,
            "GSM850, 5, X, 32.50000, 32.00000, 33.00000, PASS",
            DATA,
        ];
        let result = TableParser::new().parse_lines(lines);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.stats.lines_rejected, 1);
    }

    #[test]
    fn test_header_reopens_table() {
        let lines = [
            "garbage",
            TABLE_HEADER,
            DATA,
            DATA,
            "garbage",
            DATA,
            TABLE_HEADER,
            DATA,
        ];
        let result = TableParser::new().parse_lines(lines);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.stats.tables_found, 2);
    }

    #[test]
    fn test_parse_reader() {
        let content = with_table(2).join("\n");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.stats.lines_read, UNRELATED.len() * 2 + 3);
    }

    #[test]
    fn test_parse_reader_handles_crlf() {
        let content = format!("{TABLE_HEADER}\r\n{DATA}\r\n{DATA}\r\n");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_parse_reader_strips_byte_order_mark() {
        let content = format!("\u{feff}{TABLE_HEADER}\r\n{DATA}\r\n{DATA}\r\n");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.stats.tables_found, 1);
    }

    #[test]
    fn test_byte_order_mark_only_stripped_at_start() {
        let content = format!("garbage\n\u{feff}{TABLE_HEADER}\n{DATA}\n");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.stats.tables_found, 0);
    }

    #[test]
    fn test_parse_reader_handles_lone_cr() {
        let content = format!("[TX Calibration]\r{TABLE_HEADER}\r{DATA}\r{DATA}\rend of table\r");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.stats.lines_read, 5);
        assert_eq!(result.stats.lines_rejected, 1);
    }

    #[test]
    fn test_parse_reader_keeps_blank_lines() {
        // "\r\r\n" is a line break followed by an empty line
        let content = format!("{TABLE_HEADER}\n{DATA}\r\r\n{DATA}");
        let result = TableParser::new()
            .parse_reader(Cursor::new(content))
            .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.stats.lines_read, 4);
    }

    #[test]
    fn test_parse_reader_rejects_invalid_utf8() {
        let mut bytes = format!("{TABLE_HEADER}\n{DATA}\n").into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let result = TableParser::new().parse_reader(Cursor::new(bytes));
        assert_eq!(
            result.unwrap_err().kind(),
            std::io::ErrorKind::InvalidData
        );
    }
}
