use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

use super::{HoldingsError, HoldingsTable};

/// Prefix of the column-header line that opens the holdings table.
pub const HEADER_MARKER: &str = "ISSUER,CUSIP";

const IDENTIFIER_COLUMN: &str = "CUSIP";
const WEIGHT_COLUMN: &str = "WEIGHT";

/// A row whose weight cell could not be read as a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidRow {
    /// 1-based line number in the original document.
    pub line: u64,
    pub identifier: String,
    pub raw_weight: String,
}

#[derive(Debug, Clone)]
pub struct ParsedHoldings {
    pub table: HoldingsTable,
    pub invalid_rows: Vec<InvalidRow>,
    /// Rows without an identifier (blank, footer text, truncated rows).
    pub skipped_rows: usize,
}

/// Parses a raw holdings disclosure into a normalized identifier -> weight table.
///
/// Everything above the `ISSUER,CUSIP` header line is discarded. Weights are
/// percent strings (an optional trailing `%` is accepted) and come back as
/// fractions. Unreadable weights are stored as NaN and reported in
/// [`ParsedHoldings::invalid_rows`]; they never abort the table. A repeated
/// identifier keeps its last weight.
pub fn parse_holdings(raw: &[u8]) -> Result<ParsedHoldings, HoldingsError> {
    let text = String::from_utf8_lossy(raw);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let lines: Vec<&str> = text.lines().collect();

    let header_index = lines
        .iter()
        .position(|line| line.trim_start().starts_with(HEADER_MARKER))
        .ok_or_else(|| {
            HoldingsError::MalformedDocument(format!(
                "no line starting with '{}' found",
                HEADER_MARKER
            ))
        })?;

    let section = lines[header_index..].join("\n");
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(section.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| HoldingsError::MalformedDocument(format!("unreadable header: {}", e)))?
        .clone();
    let id_idx = column_index(&headers, IDENTIFIER_COLUMN)?;
    let weight_idx = column_index(&headers, WEIGHT_COLUMN)?;

    let mut table = HoldingsTable::new();
    let mut invalid_rows = Vec::new();
    let mut skipped_rows = 0;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        let identifier = match record.get(id_idx) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                skipped_rows += 1;
                continue;
            }
        };

        let raw_weight = record.get(weight_idx).unwrap_or("");
        let weight = match parse_weight(raw_weight) {
            Some(weight) => weight,
            None => {
                let line = record
                    .position()
                    .map(|p| header_index as u64 + p.line())
                    .unwrap_or(0);
                invalid_rows.push(InvalidRow {
                    line,
                    identifier: identifier.clone(),
                    raw_weight: raw_weight.to_string(),
                });
                f64::NAN
            }
        };

        table.insert(identifier, weight);
    }

    Ok(ParsedHoldings {
        table,
        invalid_rows,
        skipped_rows,
    })
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, HoldingsError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| HoldingsError::MalformedDocument(format!("missing column '{}'", name)))
}

/// "6.52%" -> 0.0652. Non-finite values count as unreadable.
fn parse_weight(raw: &str) -> Option<f64> {
    let value = raw.trim();
    let value = value.strip_suffix('%').unwrap_or(value).trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .map(|w| w / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "\
Fund Name,Sample Core Equity ETF
Fund Holdings as of,\"Oct 17, 2026\"
Shares Outstanding,\"12,450,000\"

ISSUER,CUSIP,NAME,WEIGHT
Apple Inc,037833100,APPLE INC,6.50%
Microsoft Corp,594918104,MICROSOFT CORP,5.25
Amazon.com Inc,023135106,AMAZON COM INC,0.00%
";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_parses_table_after_preamble() {
        let parsed = parse_holdings(DOCUMENT.as_bytes()).unwrap();

        assert_eq!(parsed.table.len(), 3);
        assert!(approx(parsed.table.get("037833100").unwrap(), 0.065));
        assert!(approx(parsed.table.get("594918104").unwrap(), 0.0525));
        assert_eq!(parsed.table.get("023135106"), Some(0.0));
        assert!(parsed.invalid_rows.is_empty());
        assert_eq!(parsed.skipped_rows, 0);
        assert!(!parsed.table.contains("Fund Name"));
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let doc = "Fund Name,Something\nCUSIP,WEIGHT\n037833100,1.0\n";
        let err = parse_holdings(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, HoldingsError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_weight_column_is_malformed() {
        let doc = "ISSUER,CUSIP,NAME\nApple Inc,037833100,APPLE INC\n";
        let err = parse_holdings(doc.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            HoldingsError::MalformedDocument("missing column 'WEIGHT'".to_string())
        );
    }

    #[test]
    fn test_unreadable_weight_becomes_nan_not_zero() {
        let doc = "meta\nISSUER,CUSIP,WEIGHT\nA,AAA,n/a\nB,BBB,\nC,CCC,12.5%\n";
        let parsed = parse_holdings(doc.as_bytes()).unwrap();

        assert!(parsed.table.get("AAA").unwrap().is_nan());
        assert!(parsed.table.get("BBB").unwrap().is_nan());
        assert!(approx(parsed.table.get("CCC").unwrap(), 0.125));
        assert_eq!(parsed.table.invalid_count(), 2);
        assert_eq!(
            parsed.invalid_rows[0],
            InvalidRow {
                line: 3,
                identifier: "AAA".to_string(),
                raw_weight: "n/a".to_string(),
            }
        );
        assert_eq!(parsed.invalid_rows[1].line, 4);
    }

    #[test]
    fn test_duplicate_identifier_keeps_last_weight() {
        let doc = "ISSUER,CUSIP,WEIGHT\nA,AAA,10\nA,AAA,30\n";
        let parsed = parse_holdings(doc.as_bytes()).unwrap();

        assert_eq!(parsed.table.len(), 1);
        assert!(approx(parsed.table.get("AAA").unwrap(), 0.3));
    }

    #[test]
    fn test_crlf_bom_and_footer_rows() {
        let doc = "\u{feff}Fund Name,X\r\n ISSUER,CUSIP,WEIGHT\r\nA,AAA,60\r\nB,\"BBB\",40%\r\n\r\n\"The content herein is for information only\"\r\n";
        let parsed = parse_holdings(doc.as_bytes()).unwrap();

        assert_eq!(parsed.table.len(), 2);
        assert!(approx(parsed.table.weight_sum(), 1.0));
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(" 50 % "), Some(0.5));
        assert_eq!(parse_weight("100"), Some(1.0));
        assert_eq!(parse_weight("-"), None);
        assert_eq!(parse_weight("inf"), None);
        assert_eq!(parse_weight("NaN"), None);
    }
}
