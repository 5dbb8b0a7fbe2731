use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Criterion, Throughput};

use panelorder_core::{DetectedObject, NormalizedBox, ObjectClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("PANELORDER_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size: usize,
    pub measurement: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("PANELORDER_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size, measurement) = match tier {
        BenchTier::Quick => (20, Duration::from_secs(3)),
        BenchTier::Full => (30, Duration::from_secs(5)),
    };
    BenchConfig {
        tier,
        seed,
        sample_size,
        measurement,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig) {
    group.sample_size(cfg.sample_size);
    group.measurement_time(cfg.measurement);
}

pub fn bench_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}

pub fn pages_throughput(pages: usize) -> Throughput {
    Throughput::Elements(pages as u64)
}

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }

    pub fn gen_range(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// A page with a `rows` x `cols` panel grid and `per_panel` balloons
/// scattered inside each panel.
pub fn gen_page(seed: u64, rows: usize, cols: usize, per_panel: usize) -> Vec<DetectedObject> {
    let mut rng = XorShift64::new(seed);
    let mut objects = Vec::with_capacity(rows * cols * (per_panel + 1));
    let mut next_id = 1;
    let row_h = 1.0 / rows as f64;
    let col_w = 1.0 / cols as f64;

    for r in 0..rows {
        for c in 0..cols {
            let top = r as f64 * row_h;
            let left = c as f64 * col_w;
            let panel = NormalizedBox::new(
                top + 0.002,
                left + 0.002,
                top + row_h - 0.002,
                left + col_w - 0.002,
            );
            objects.push(DetectedObject::new(next_id, ObjectClass::Panel, 0.95, panel));
            next_id += 1;

            for _ in 0..per_panel {
                let h = rng.gen_f64(0.05, 0.2) * row_h;
                let w = rng.gen_f64(0.05, 0.3) * col_w;
                let t = rng.gen_f64(panel.top, panel.bottom - h);
                let l = rng.gen_f64(panel.left, panel.right - w);
                let class = if rng.gen_range(3) == 0 {
                    ObjectClass::Text
                } else {
                    ObjectClass::Balloon
                };
                objects.push(DetectedObject::new(
                    next_id,
                    class,
                    rng.gen_f64(0.5, 1.0) as f32,
                    NormalizedBox::new(t, l, t + h, l + w),
                ));
                next_id += 1;
            }
        }
    }
    objects
}
