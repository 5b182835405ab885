//! Synthetic dataset — seeded hourly records for offline demos and smoke runs.
//!
//! Produces a plausible daily load shape with a ramping demand reduction over
//! the period, so every payload has visible structure. Deterministic for a
//! given seed; never a substitute for real data.

use chrono::{Duration, NaiveDate};
use loadtrack_core::domain::LoadRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `days` full days of hourly records starting at `start`.
pub fn generate(start: NaiveDate, days: u32, seed: u64) -> Vec<LoadRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(days as usize * 24);

    for day in 0..days {
        let date = start + Duration::days(day as i64);
        // Demand reduction ramps from 0 to ~6% across the period.
        let impact = 0.06 * (day as f64 / days.max(1) as f64);

        for hour in 0u8..24 {
            // Double-peaked daily shape: morning and evening ramps.
            let h = hour as f64;
            let shape = 1000.0
                + 180.0 * (-((h - 8.5) / 2.5).powi(2)).exp()
                + 240.0 * (-((h - 18.5) / 3.0).powi(2)).exp();
            let predicted_load = shape * rng.gen_range(0.99..1.01);
            let noise: f64 = rng.gen_range(-0.008..0.008);
            let load = predicted_load * (1.0 - impact + noise);
            let error = (predicted_load - load) / predicted_load;

            records.push(LoadRecord {
                date,
                hour,
                load,
                predicted_load,
                error,
            });
        }
    }

    records
}
