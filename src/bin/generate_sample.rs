//! Writes a deterministic synthetic heart-disease table for demos.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]`. The format follows the output
//! extension (`.parquet` or `.csv`); default `sample_heart.parquet`, 303 rows.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

#[derive(Default)]
struct Columns {
    age: Vec<f64>,
    sex: Vec<i64>,
    cp: Vec<i64>,
    trestbps: Vec<f64>,
    chol: Vec<f64>,
    thalach: Vec<f64>,
    oldpeak: Vec<Option<f64>>,
    num: Vec<i64>,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Columns {
    let mut c = Columns::default();
    for _ in 0..rows {
        let age = rng.gauss(54.0, 9.0).clamp(29.0, 77.0).round();
        let sex = if rng.next_f64() < 0.68 { 1 } else { 0 };
        let cp = 1 + rng.below(4) as i64;

        // Older, male, asymptomatic patients are more often diagnosed.
        let risk = 0.15
            + 0.01 * (age - 40.0).max(0.0)
            + if sex == 1 { 0.15 } else { 0.0 }
            + if cp == 4 { 0.3 } else { 0.0 };
        let num = if rng.next_f64() < risk.min(0.95) {
            1 + rng.below(4) as i64
        } else {
            0
        };

        let thalach = (rng.gauss(165.0, 15.0) - 0.8 * (age - 40.0) - 10.0 * num.min(1) as f64)
            .clamp(71.0, 202.0)
            .round();
        let oldpeak = if rng.next_f64() < 0.03 {
            None
        } else {
            let v = rng.gauss(0.6 + 0.8 * num as f64, 0.8).clamp(0.0, 6.2);
            Some((v * 10.0).round() / 10.0)
        };

        c.age.push(age);
        c.sex.push(sex);
        c.cp.push(cp);
        c.trestbps.push(rng.gauss(131.0, 17.0).clamp(94.0, 200.0).round());
        c.chol.push(rng.gauss(246.0, 50.0).clamp(126.0, 564.0).round());
        c.thalach.push(thalach);
        c.oldpeak.push(oldpeak);
        c.num.push(num);
    }
    c
}

fn write_csv(path: &Path, c: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["age", "sex", "cp", "trestbps", "chol", "thalach", "oldpeak", "num"])?;
    for i in 0..c.age.len() {
        writer.write_record([
            c.age[i].to_string(),
            c.sex[i].to_string(),
            c.cp[i].to_string(),
            c.trestbps[i].to_string(),
            c.chol[i].to_string(),
            c.thalach[i].to_string(),
            c.oldpeak[i].map(|v| v.to_string()).unwrap_or_default(),
            c.num[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, c: Columns) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Float64, false),
        Field::new("sex", DataType::Int64, false),
        Field::new("cp", DataType::Int64, false),
        Field::new("trestbps", DataType::Float64, false),
        Field::new("chol", DataType::Float64, false),
        Field::new("thalach", DataType::Float64, false),
        Field::new("oldpeak", DataType::Float64, true),
        Field::new("num", DataType::Int64, false),
    ]));

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(c.age)),
        Arc::new(Int64Array::from(c.sex)),
        Arc::new(Int64Array::from(c.cp)),
        Arc::new(Float64Array::from(c.trestbps)),
        Arc::new(Float64Array::from(c.chol)),
        Arc::new(Float64Array::from(c.thalach)),
        Arc::new(Float64Array::from(c.oldpeak)),
        Arc::new(Int64Array::from(c.num)),
    ];
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .unwrap_or_else(|| "sample_heart.parquet".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 303,
    };

    let mut rng = SimpleRng::new(45);
    let columns = generate(rows, &mut rng);
    let diseased = columns.num.iter().filter(|&&n| n > 0).count();

    let path = Path::new(&output);
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &columns)?,
        Some("parquet") | Some("pq") => write_parquet(path, columns)?,
        _ => bail!("output must end in .csv or .parquet"),
    }

    println!("Wrote {rows} patients ({diseased} with heart disease) to {output}");
    Ok(())
}
