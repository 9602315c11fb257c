use chrono::NaiveDate;
use clap::Parser;
use csv::WriterBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "lookthrough-data-gen")]
#[command(about = "Generate synthetic basket holdings disclosures")]
pub struct Args {
    /// Number of holdings rows in the table
    #[arg(short = 'n', long, default_value_t = 50)]
    pub holdings: usize,

    /// Fund name written to the preamble
    #[arg(short, long, default_value = "Synthetic Core Equity ETF")]
    pub fund_name: String,

    /// As-of date (YYYY-MM-DD format)
    #[arg(long, default_value = "2024-01-15")]
    pub as_of: String,

    /// Number of rows whose weight cell is deliberately unreadable
    #[arg(long, default_value_t = 0)]
    pub invalid_rows: usize,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Serialize)]
pub struct HoldingRecord {
    pub issuer: String,
    pub cusip: String,
    pub name: String,
    pub sector: String,
    pub shares: u64,
    pub market_value: String,
    pub weight: String,
}

pub struct DisclosureGenerator {
    rng: StdRng,
    as_of: NaiveDate,
}

const ISSUERS: &[&str] = &[
    "Apple Inc", "Microsoft Corp", "Alphabet Inc", "Amazon.com Inc", "Meta Platforms Inc",
    "NVIDIA Corp", "Tesla Inc", "JPMorgan Chase & Co", "Visa Inc", "Johnson & Johnson",
    "Walmart Inc", "Procter & Gamble Co", "Mastercard Inc", "UnitedHealth Group Inc",
    "Home Depot Inc", "Walt Disney Co", "Bank of America Corp", "Exxon Mobil Corp",
    "Pfizer Inc", "Coca-Cola Co",
];
const SECTORS: &[&str] = &[
    "Information Technology", "Health Care", "Financials", "Consumer Discretionary",
    "Communication", "Industrials", "Consumer Staples", "Energy", "Utilities", "Materials",
];
const HOLDINGS_HEADER: &[&str] = &[
    "ISSUER", "CUSIP", "NAME", "SECTOR", "SHARES", "MARKET VALUE", "WEIGHT",
];
const CUSIP_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";

impl DisclosureGenerator {
    pub fn new(seed: u64, as_of: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            as_of,
        }
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.rng.gen_range(0..items.len())]
    }

    fn gen_cusip(&mut self) -> String {
        (0..9)
            .map(|_| CUSIP_ALPHABET[self.rng.gen_range(0..CUSIP_ALPHABET.len())] as char)
            .collect()
    }

    /// Random positive weights scaled to sum to 100.
    fn gen_weights(&mut self, count: usize) -> Vec<f64> {
        let raw: Vec<f64> = (0..count).map(|_| self.rng.gen_range(0.05..10.0)).collect();
        let total: f64 = raw.iter().sum();
        let mut weights: Vec<f64> = raw.iter().map(|w| w / total * 100.0).collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        weights
    }

    pub fn preamble(&mut self, fund_name: &str) -> Vec<(String, String)> {
        let shares_outstanding = self.rng.gen_range(1_000_000..50_000_000u64);
        vec![
            ("Fund Name".to_string(), fund_name.to_string()),
            (
                "Fund Holdings as of".to_string(),
                self.as_of.format("%b %d, %Y").to_string(),
            ),
            ("Shares Outstanding".to_string(), shares_outstanding.to_string()),
        ]
    }

    /// Holdings rows with unique CUSIPs; the first `invalid` rows carry an
    /// unreadable weight instead of a percent string.
    pub fn generate_holdings(&mut self, count: usize, invalid: usize) -> Vec<HoldingRecord> {
        let weights = self.gen_weights(count);
        let mut seen = std::collections::HashSet::new();

        weights
            .into_iter()
            .enumerate()
            .map(|(i, weight)| {
                let mut cusip = self.gen_cusip();
                while !seen.insert(cusip.clone()) {
                    cusip = self.gen_cusip();
                }
                let issuer = self.pick(ISSUERS);
                let price = self.rng.gen_range(10.0..500.0);
                let shares = self.rng.gen_range(1_000..1_000_000u64);

                HoldingRecord {
                    issuer: issuer.to_string(),
                    cusip,
                    name: issuer.to_uppercase(),
                    sector: self.pick(SECTORS).to_string(),
                    shares,
                    market_value: format!("{:.2}", price * shares as f64),
                    weight: if i < invalid {
                        "-".to_string()
                    } else {
                        format!("{:.4}%", weight)
                    },
                }
            })
            .collect()
    }
}

pub struct GenerationResult {
    pub rows_generated: usize,
    pub duration_ms: u128,
    pub bytes_written: usize,
}

/// Writes one complete disclosure: preamble, blank line, holdings table.
pub fn write_disclosure<W: Write>(args: &Args, out: W) -> Result<W, Box<dyn std::error::Error>> {
    let as_of = NaiveDate::parse_from_str(&args.as_of, "%Y-%m-%d")?;
    let mut generator = DisclosureGenerator::new(args.seed, as_of);

    let mut preamble_writer = WriterBuilder::new().flexible(true).from_writer(out);
    for (key, value) in generator.preamble(&args.fund_name) {
        preamble_writer.write_record([key, value])?;
    }
    preamble_writer.flush()?;
    let mut out = preamble_writer.into_inner().map_err(|e| e.into_error())?;
    out.write_all(b"\n")?;

    // Header written by hand so an empty table still has one
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(out);
    csv_writer.write_record(HOLDINGS_HEADER)?;
    for record in generator.generate_holdings(args.holdings, args.invalid_rows) {
        csv_writer.serialize(&record)?;
    }
    csv_writer.flush()?;
    Ok(csv_writer.into_inner().map_err(|e| e.into_error())?)
}

pub fn generate_to_vec(args: &Args) -> Result<(Vec<u8>, GenerationResult), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let data = write_disclosure(args, Vec::new())?;
    let bytes = data.len();

    Ok((data, GenerationResult {
        rows_generated: args.holdings,
        duration_ms: start.elapsed().as_millis(),
        bytes_written: bytes,
    }))
}

pub fn generate_to_file(args: &Args) -> Result<GenerationResult, Box<dyn std::error::Error>> {
    let start = Instant::now();

    match &args.output {
        Some(path) => {
            write_disclosure(args, File::create(path)?)?;
            let bytes = path.metadata().map(|m| m.len() as usize).unwrap_or(0);

            Ok(GenerationResult {
                rows_generated: args.holdings,
                duration_ms: start.elapsed().as_millis(),
                bytes_written: bytes,
            })
        }
        None => {
            let (data, result) = generate_to_vec(args)?;
            io::stdout().write_all(&data)?;
            Ok(GenerationResult {
                duration_ms: start.elapsed().as_millis(),
                ..result
            })
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let result = generate_to_file(&args)?;

    eprintln!("Generated {} holdings in {}ms", result.rows_generated, result.duration_ms);
    if args.output.is_some() {
        eprintln!("Output size: {} bytes", result.bytes_written);
    }

    Ok(())
}
