//! Generate a synthetic WinSpectro `.dat` file and re-import it.
//!
//! Useful for exercising the importer without instrument data on hand. The
//! spectrum is a handful of gaussian Auger peaks on a sloping background
//! with Poisson-ish noise, swept over a 20–520 eV kinetic-energy axis.

use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Counts at kinetic energy `ke` for one channel: background + peaks + noise.
fn counts(ke: f64, peaks: &[(f64, f64, f64)], rng: &mut SimpleRng) -> i64 {
    let background = 800.0 - ke;
    let signal: f64 = peaks
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(ke, mu, sigma, amp))
        .sum();
    let noisy = background + signal + rng.gauss(0.0, (background + signal).sqrt());
    noisy.max(0.0).round() as i64
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // KE axis: 20 → 520 eV in 2 eV steps
    let points = 251usize;
    let start_ev = 20i64;
    let step_ev = 2i64;
    let stop_ev = start_ev + (points as i64 - 1) * step_ev;

    // Carbon KLL and oxygen KLL, roughly
    let peaks_c1 = [(272.0, 6.0, 900.0), (503.0, 8.0, 650.0)];
    let peaks_c2 = [(272.0, 6.0, 450.0), (503.0, 8.0, 320.0)];

    let mut text = String::new();
    writeln!(text, "Version :    1.1")?;
    writeln!(text, "Mode :    AES")?;
    writeln!(text, "Data Points :    {points}")?;
    writeln!(text, "Start energy[V] :    {start_ev}")?;
    writeln!(text, "Stop energy[V] :    {stop_ev}")?;
    writeln!(text, "Stepwidth :    {step_ev}")?;
    writeln!(text, "Source Energy :    0")?;
    writeln!(text, "Dwelltime[ms] :    100")?;
    for _ in 0..3 {
        writeln!(text, "reserved")?;
    }
    writeln!(text, "Basis[mV]    Channel_1    Channel_2")?;

    for i in 0..points {
        let ke = (start_ev + i as i64 * step_ev) as f64;
        let basis_mv = (start_ev + i as i64 * step_ev) * 1000;
        let c1 = counts(ke, &peaks_c1, &mut rng);
        let c2 = counts(ke, &peaks_c2, &mut rng);
        writeln!(text, "{basis_mv:>10}{c1:>12}{c2:>12}")?;
    }

    let output_path = "sample_data.dat";
    fs::write(output_path, &text).context("writing sample file")?;

    // Round-trip through the importer to prove the file is well-formed.
    let dataset = staib_dat::import(output_path).context("re-importing generated file")?;
    log::info!(
        "wrote {output_path}: {} points, {} count channels, {}–{} eV",
        dataset.data_points(),
        dataset.channels().len(),
        start_ev,
        stop_ev,
    );
    println!(
        "Wrote {} data points ({} channels) to {output_path}",
        dataset.data_points(),
        dataset.channels().len()
    );
    Ok(())
}
