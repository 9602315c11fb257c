use csv::ReaderBuilder;
use serde::Serialize;

use super::HEADER_MARKER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreambleEntry {
    pub key: String,
    pub value: String,
}

/// Metadata lines found above the holdings table, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Preamble {
    entries: Vec<PreambleEntry>,
}

impl Preamble {
    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn entries(&self) -> &[PreambleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads the `key,value` metadata lines that precede the holdings header.
///
/// Independent of [`super::parse_holdings`], which drops these lines. If the
/// document has no header line, every line is treated as preamble.
pub fn parse_preamble(raw: &[u8]) -> Preamble {
    let text = String::from_utf8_lossy(raw);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let section = text
        .lines()
        .take_while(|line| !line.trim_start().starts_with(HEADER_MARKER))
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(section.as_bytes());

    let entries = reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| {
            let key = record.get(0).unwrap_or("").trim();
            let value = record.get(1).unwrap_or("").trim();
            if key.is_empty() && value.is_empty() {
                return None;
            }
            Some(PreambleEntry {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect();

    Preamble { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_metadata_up_to_header() {
        let doc = "\
Fund Name,Sample Core Equity ETF
Fund Holdings as of,\"Oct 17, 2026\"
\u{a0}
Disclosure
ISSUER,CUSIP,WEIGHT
Apple Inc,037833100,6.5
";
        let preamble = parse_preamble(doc.as_bytes());

        assert_eq!(preamble.len(), 3);
        assert_eq!(preamble.get("Fund Name"), Some("Sample Core Equity ETF"));
        assert_eq!(preamble.get("Fund Holdings as of"), Some("Oct 17, 2026"));
        assert_eq!(preamble.get("Disclosure"), Some(""));
        assert_eq!(preamble.get("Apple Inc"), None);
    }

    #[test]
    fn test_quoted_fields_follow_csv_rules() {
        let doc = "Fund Name,\"He said \"\"hi\"\"\"\n\"Fund, Inc\",x\nISSUER,CUSIP,WEIGHT\n";
        let preamble = parse_preamble(doc.as_bytes());

        assert_eq!(preamble.len(), 2);
        assert_eq!(preamble.get("Fund Name"), Some("He said \"hi\""));
        assert_eq!(preamble.get("Fund, Inc"), Some("x"));
    }

    #[test]
    fn test_document_starting_with_header_has_no_preamble() {
        let preamble = parse_preamble(b"ISSUER,CUSIP,WEIGHT\nA,AAA,100\n");
        assert!(preamble.is_empty());
    }
}
