//! CSV parser with encoding and delimiter auto-detection.
//!
//! Produces an untyped [`Table`]. Column semantics live in `transform`.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::Table;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        // WHATWG maps the latin1 labels to windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when the header contains none of the candidates.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter into a [`Table`].
///
/// Quoted fields may contain the delimiter and line breaks. Headers are
/// trimmed; cell values are kept as written. Blank lines are skipped, short
/// rows are padded and rows wider than the header are rejected.
///
/// # Example
/// ```ignore
/// use shipmerge::parser::parse_table;
///
/// let table = parse_table("name,age\nAlice,30\nBob,25", ',').unwrap();
///
/// assert_eq!(table.rows.len(), 2);
/// assert_eq!(table.rows[0][0], "Alice");
/// ```
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 1,
        message: format!("Unsupported delimiter '{}'", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut table = Table::new(headers);
    let line_index = LineIndex::new(content.as_bytes());

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| line_index.record_line(p.byte() as usize))
            .unwrap_or(i + 2);

        // Whitespace-only line
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if record.len() > table.headers.len() {
            return Err(CsvError::ParseError {
                line,
                message: format!(
                    "expected {} fields, saw {}",
                    table.headers.len(),
                    record.len()
                ),
            });
        }

        table.push_row(record.iter().map(str::to_string).collect(), line);
    }

    Ok(table)
}

/// Maps byte offsets to 1-based file lines.
///
/// A record's reported position is where the reader resumed after the
/// previous record, which can sit before blank lines or the `\n` of a
/// `\r\n` terminator. Those are skipped to find the line the record
/// actually starts on.
struct LineIndex<'a> {
    bytes: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let newlines = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { bytes, newlines }
    }

    fn record_line(&self, offset: usize) -> usize {
        let skipped = self
            .bytes
            .get(offset..)
            .unwrap_or_default()
            .iter()
            .take_while(|b| **b == b'\r' || **b == b'\n')
            .count();
        let start = offset + skipped;
        1 + self.newlines.partition_point(|&nl| nl < start)
    }
}

/// Parse CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_table("name,age\nAlice,30\nBob,25", ',').unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Alice", "30"]);
        assert_eq!(table.rows[1], vec!["Bob", "25"]);
    }

    #[test]
    fn test_quoted_values_with_delimiter() {
        let csv = "name,city\n\"Acme, Inc.\",\"Austin\"";
        let table = parse_table(csv, ',').unwrap();

        assert_eq!(table.rows[0][0], "Acme, Inc.");
        assert_eq!(table.rows[0][1], "Austin");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_table("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse_table("a,b,c\n1,,3\n1", ',').unwrap();

        assert_eq!(table.rows[0], vec!["1", "", "3"]);
        assert_eq!(table.rows[1], vec!["1", "", ""]);
    }

    #[test]
    fn test_wide_row_rejected() {
        match parse_table("a,b,c\n1,2,3\n1,2,3,EXTRA,MORE", ',') {
            Err(CsvError::ParseError { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 3 fields, saw 5"));
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_whitespace_preserved() {
        let table = parse_table("key,addr\n D1 ,  Suite 4  \nD1,x", ',').unwrap();

        assert_eq!(table.rows[0], vec![" D1 ", "  Suite 4  "]);
        assert_eq!(table.rows[1][0], "D1");
    }

    #[test]
    fn test_row_lines_follow_the_file() {
        let csv = "a,b\n1,2\n\n3,\"two\nlines\"\n5,6\n";
        let table = parse_table(csv, ',').unwrap();

        assert_eq!(table.lines, vec![2, 4, 6]);
        assert_eq!(table.rows[1][1], "two\nlines");
    }

    #[test]
    fn test_row_lines_with_crlf() {
        let table = parse_table("a,b\r\n1,2\r\n\r\n3,4\r\n", ',').unwrap();
        assert_eq!(table.lines, vec![2, 4]);
    }

    #[test]
    fn test_empty_cell_rows_are_kept() {
        let table = parse_table("a,b\n,\n   \n1,2", ',').unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["", ""]);
        assert_eq!(table.lines, vec![2, 4]);
    }

    #[test]
    fn test_headers_trimmed() {
        let table = parse_table(" Delivery Number , Product ID \nD1,P1", ',').unwrap();
        assert_eq!(table.headers, vec!["Delivery Number", "Product ID"]);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_table("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name,age\nAlice,30\nBob,25").unwrap();

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.rows.len(), 2);
    }

    #[test]
    fn test_bom_stripped() {
        let result = parse_bytes_auto("\u{feff}a,b\n1,2".as_bytes()).unwrap();
        assert_eq!(result.table.headers, vec!["a", "b"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is '¤' in latin1/windows-1252, '€' only in ISO-8859-15
        let decoded = decode_content(&[0x31, 0xA4, 0xA6], "iso-8859-1").unwrap();
        assert_eq!(decoded, "1¤¦");
    }
}
