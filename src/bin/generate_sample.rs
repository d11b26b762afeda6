use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

/// One line of the generated sales table.
#[derive(Debug, Serialize)]
struct SaleRecord<'a> {
    order_id: u64,
    region: &'a str,
    product: &'a str,
    units: u32,
    unit_price: f64,
    /// Left blank for some rows and occasionally "n/a", to exercise the
    /// calculator's handling of dirty cells.
    discount: String,
}

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

fn main() -> Result<()> {
    env_logger::init();

    // Usage: generate_sample [OUTPUT] [ROWS]
    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_sales.csv".into()));
    let rows: u64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 200,
    };

    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let products = [("Widget", 2.5), ("Gadget", 12.0), ("Gizmo", 7.75)];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    for order_id in 1..=rows {
        let &(product, base_price) = rng.pick(&products);
        let discount = match rng.next_u64() % 10 {
            0..=5 => String::new(),
            6 => "n/a".to_string(),
            _ => format!("{:.2}", rng.next_f64() * 0.3),
        };

        writer
            .serialize(SaleRecord {
                order_id,
                region: *rng.pick(&regions),
                product,
                units: 1 + (rng.next_u64() % 50) as u32,
                unit_price: (base_price * (0.9 + rng.next_f64() * 0.2) * 100.0).round() / 100.0,
                discount,
            })
            .with_context(|| format!("writing order {order_id}"))?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {rows} orders to {}", output_path.display());
    println!("Wrote {rows} orders to {}", output_path.display());
    Ok(())
}
