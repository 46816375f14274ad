//! Writes a synthetic pair of input sheets:
//! `all_placed_data.parquet` and `all_report_data.parquet`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (company, base package in LPA)
const COMPANIES: [(&str, f64); 10] = [
    ("TCS", 3.6),
    ("Infosys", 3.8),
    ("Wipro", 3.5),
    ("Accenture", 4.5),
    ("Cognizant", 4.0),
    ("Capgemini", 4.2),
    ("Deloitte", 7.6),
    ("Amazon", 18.0),
    ("Microsoft", 24.0),
    ("L&T", 5.5),
];

/// (branch, eligible students per year, placement rate)
const BRANCHES: [(&str, u64, f64); 5] = [
    ("CSE", 60, 0.85),
    ("ECE", 60, 0.70),
    ("EEE", 45, 0.55),
    ("MECH", 50, 0.45),
    ("CIVIL", 40, 0.35),
];

const YEARS: [i64; 4] = [2021, 2022, 2023, 2024];

fn write_parquet(path: &str, columns: Vec<(&str, DataType, ArrayRef)>) {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, ty, _)| Field::new(*name, ty.clone(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, arr)| arr).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut names: Vec<String> = Vec::new();
    let mut years: Vec<i64> = Vec::new();
    let mut branches: Vec<String> = Vec::new();
    let mut companies: Vec<Option<String>> = Vec::new();
    let mut packages: Vec<Option<f64>> = Vec::new();

    let mut eligible: BTreeMap<&str, u64> = BTreeMap::new();
    let mut placed: BTreeMap<&str, HashSet<String>> = BTreeMap::new();

    for &year in &YEARS {
        for &(branch, per_year, rate) in &BRANCHES {
            *eligible.entry(branch).or_default() += per_year;
            for i in 0..per_year {
                let name = format!("{branch}-{year}-{i:03}");
                if rng.next_f64() >= rate {
                    // Unplaced students appear in roughly half the sheets.
                    if rng.next_f64() < 0.5 {
                        names.push(name);
                        years.push(year);
                        branches.push(branch.to_string());
                        companies.push(None);
                        packages.push(None);
                    }
                    continue;
                }
                let offers = if rng.next_f64() < 0.15 { 2 } else { 1 };
                for _ in 0..offers {
                    let &(company, base) = rng.pick(&COMPANIES);
                    let package = (base * (0.9 + 0.4 * rng.next_f64()) * 100.0).round() / 100.0;
                    names.push(name.clone());
                    years.push(year);
                    branches.push(branch.to_string());
                    companies.push(Some(company.to_string()));
                    packages.push(Some(package));
                }
                placed.entry(branch).or_default().insert(name);
            }
        }
    }

    let rows = names.len();
    write_parquet(
        "all_placed_data.parquet",
        vec![
            ("Name", DataType::Utf8, Arc::new(StringArray::from(names)) as ArrayRef),
            ("Year", DataType::Int64, Arc::new(Int64Array::from(years)) as ArrayRef),
            ("Branch", DataType::Utf8, Arc::new(StringArray::from(branches)) as ArrayRef),
            ("Company", DataType::Utf8, Arc::new(StringArray::from(companies)) as ArrayRef),
            ("Package", DataType::Float64, Arc::new(Float64Array::from(packages)) as ArrayRef),
        ],
    );

    let report_branches: Vec<String> = eligible.keys().map(|b| b.to_string()).collect();
    let report_eligible: Vec<i64> = eligible.values().map(|&n| n as i64).collect();
    let report_placed: Vec<i64> = eligible
        .keys()
        .map(|b| placed.get(b).map_or(0, |s| s.len() as i64))
        .collect();
    write_parquet(
        "all_report_data.parquet",
        vec![
            ("Branch", DataType::Utf8, Arc::new(StringArray::from(report_branches)) as ArrayRef),
            ("Eligible_Students", DataType::Int64, Arc::new(Int64Array::from(report_eligible)) as ArrayRef),
            ("Placed_Students", DataType::Int64, Arc::new(Int64Array::from(report_placed)) as ArrayRef),
        ],
    );

    println!(
        "Wrote {rows} placement rows to all_placed_data.parquet and {} branches to all_report_data.parquet",
        eligible.len()
    );
    println!(
        "Run: placement-overview --data all_placed_data.parquet --report-data all_report_data.parquet"
    );
}
