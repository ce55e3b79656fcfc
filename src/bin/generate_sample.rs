use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const EMPLOYEES_PATH: &str = "EA.csv";
const HAPPINESS_PATH: &str = "Happiness Score Data.parquet";
const N_EMPLOYEES: u32 = 1470;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// ---------------------------------------------------------------------------
// Employee attrition table (CSV)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmployeeRow {
    age: i64,
    attrition: &'static str,
    business_travel: &'static str,
    department: &'static str,
    distance_from_home: i64,
    education_field: &'static str,
    employee_count: i64,
    employee_number: u32,
    gender: &'static str,
    job_role: &'static str,
    monthly_income: i64,
    standard_hours: i64,
    work_life_balance: i64,
}

const DEPARTMENTS: [(&str, &[&str]); 3] = [
    (
        "Sales",
        &["Sales Executive", "Sales Representative", "Manager"],
    ),
    (
        "Research & Development",
        &[
            "Research Scientist",
            "Laboratory Technician",
            "Healthcare Representative",
            "Manufacturing Director",
            "Research Director",
            "Manager",
        ],
    ),
    ("Human Resources", &["Human Resources", "Manager"]),
];

fn employee_row(number: u32, rng: &mut SimpleRng) -> EmployeeRow {
    let (department, roles) = DEPARTMENTS[(rng.next_u64() % 3) as usize];
    let job_role = rng.pick(roles);
    let age = rng.gauss(37.0, 9.0).round().clamp(18.0, 60.0) as i64;
    let distance_from_home = (rng.next_f64() * 29.0).floor() as i64 + 1;
    let work_life_balance = (rng.next_u64() % 4) as i64 + 1;
    let business_travel = rng.pick(&["Travel_Rarely", "Travel_Frequently", "Non-Travel"]);

    let seniority = if job_role.contains("Manager") || job_role.contains("Director") {
        2.5
    } else {
        1.0
    };
    let monthly_income =
        (rng.gauss(2500.0 + 110.0 * (age - 18) as f64, 1200.0) * seniority).max(1009.0) as i64;

    // Young, distant, frequent travellers with poor balance leave more often.
    let mut risk: f64 = 0.08;
    if age < 30 {
        risk += 0.10;
    }
    if distance_from_home > 15 {
        risk += 0.05;
    }
    if business_travel == "Travel_Frequently" {
        risk += 0.08;
    }
    if work_life_balance == 1 {
        risk += 0.10;
    }

    EmployeeRow {
        age,
        attrition: if rng.chance(risk) { "Yes" } else { "No" },
        business_travel,
        department,
        distance_from_home,
        education_field: rng.pick(&[
            "Life Sciences",
            "Medical",
            "Marketing",
            "Technical Degree",
            "Human Resources",
            "Other",
        ]),
        employee_count: 1,
        employee_number: number,
        gender: if rng.chance(0.6) { "Male" } else { "Female" },
        job_role,
        monthly_income,
        standard_hours: 80,
        work_life_balance,
    }
}

fn write_employees(rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(EMPLOYEES_PATH)
        .with_context(|| format!("Failed to create {EMPLOYEES_PATH}"))?;
    for number in 1..=N_EMPLOYEES {
        writer.serialize(employee_row(number, rng))?;
    }
    writer.flush()?;
    println!("Wrote {N_EMPLOYEES} employees to {EMPLOYEES_PATH}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Country happiness table (Parquet)
// ---------------------------------------------------------------------------

/// (country, region, baseline happiness)
const COUNTRIES: &[(&str, &str, f64)] = &[
    ("Denmark", "Western Europe", 7.5),
    ("Switzerland", "Western Europe", 7.5),
    ("Netherlands", "Western Europe", 7.3),
    ("Portugal", "Western Europe", 5.1),
    ("Canada", "North America", 7.3),
    ("United States", "North America", 7.1),
    ("Mexico", "Latin America and Caribbean", 6.8),
    ("Brazil", "Latin America and Caribbean", 6.9),
    ("Peru", "Latin America and Caribbean", 5.7),
    ("Poland", "Central and Eastern Europe", 5.8),
    ("Hungary", "Central and Eastern Europe", 5.1),
    ("Ukraine", "Central and Eastern Europe", 4.3),
    ("Japan", "Eastern Asia", 5.9),
    ("South Korea", "Eastern Asia", 5.8),
    ("Thailand", "Southeastern Asia", 6.5),
    ("Vietnam", "Southeastern Asia", 5.1),
    ("India", "Southern Asia", 4.4),
    ("Israel", "Middle East and Northern Africa", 7.3),
    ("Egypt", "Middle East and Northern Africa", 4.4),
    ("Nigeria", "Sub-Saharan Africa", 5.3),
    ("Kenya", "Sub-Saharan Africa", 4.4),
    ("Chad", "Sub-Saharan Africa", 3.8),
    ("Australia", "Australia and New Zealand", 7.3),
    ("New Zealand", "Australia and New Zealand", 7.3),
];

fn write_happiness(rng: &mut SimpleRng) -> Result<()> {
    let mut score = Vec::with_capacity(COUNTRIES.len());
    let mut gdp = Vec::with_capacity(COUNTRIES.len());
    let mut hdi = Vec::with_capacity(COUNTRIES.len());
    let mut alcohol = Vec::with_capacity(COUNTRIES.len());

    for &(_, _, base) in COUNTRIES {
        let s = (base + rng.gauss(0.0, 0.15)).clamp(2.5, 8.0);
        score.push((s * 1000.0).round() / 1000.0);
        gdp.push((rng.gauss(8.0 * (s - 3.0), 6.0).max(0.5) * 100.0).round() / 100.0);
        hdi.push((0.45 + 0.09 * (s - 3.5) + rng.gauss(0.0, 0.04)).clamp(0.35, 0.95));
        alcohol.push(rng.gauss(1.6 * s - 2.0, 2.0).max(0.1));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("HappinessScore", DataType::Float64, false),
        Field::new("GDP_PerCapita", DataType::Float64, false),
        Field::new("HDI", DataType::Float64, false),
        Field::new("Alcohol Consumption", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(COUNTRIES.iter().map(|c| c.0))),
            Arc::new(StringArray::from_iter_values(COUNTRIES.iter().map(|c| c.1))),
            Arc::new(Float64Array::from(score)),
            Arc::new(Float64Array::from(gdp)),
            Arc::new(Float64Array::from(hdi)),
            Arc::new(Float64Array::from(alcohol)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(HAPPINESS_PATH)
        .with_context(|| format!("Failed to create {HAPPINESS_PATH}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;

    println!("Wrote {} countries to {HAPPINESS_PATH}", COUNTRIES.len());
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    write_employees(&mut rng)?;
    write_happiness(&mut rng)?;
    Ok(())
}
