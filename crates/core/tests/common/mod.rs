#![allow(dead_code)]

use panelorder_core::{DetectedObject, NormalizedBox, ObjectClass, PageContext, ReadingDirection};

pub const REF_WIDTH: u32 = 1988;
pub const REF_HEIGHT: u32 = 3056;

/// Reference-size page in the given direction.
pub fn reference_page(direction: ReadingDirection) -> PageContext {
    PageContext::new(REF_WIDTH, REF_HEIGHT, direction).unwrap()
}

/// Object from a normalized (top, left, bottom, right) box.
pub fn norm(id: i64, class: ObjectClass, b: (f64, f64, f64, f64)) -> DetectedObject {
    DetectedObject::new(id, class, 0.9, NormalizedBox::new(b.0, b.1, b.2, b.3))
}

/// Object from pixel corners (x0, y0, x1, y1) on the reference page.
pub fn px(id: i64, class: ObjectClass, r: (f64, f64, f64, f64)) -> DetectedObject {
    let w = f64::from(REF_WIDTH);
    let h = f64::from(REF_HEIGHT);
    norm(id, class, (r.1 / h, r.0 / w, r.3 / h, r.2 / w))
}

pub fn ids(objects: &[DetectedObject]) -> Vec<i64> {
    objects.iter().map(|o| o.id).collect()
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

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range(i + 1);
            items.swap(i, j);
        }
    }
}

/// Random page: a grid of panels with balloons inside, plus a few loose
/// captions outside every panel.
pub fn random_page(seed: u64) -> Vec<DetectedObject> {
    let mut rng = XorShift64::new(seed);
    let mut objects = Vec::new();
    let mut next_id = 1;

    let rows = 1 + rng.gen_range(3);
    let cols = 1 + rng.gen_range(2);
    let row_h = 0.9 / rows as f64;
    let col_w = 1.0 / cols as f64;
    for r in 0..rows {
        for c in 0..cols {
            let top = r as f64 * row_h + rng.gen_f64(0.0, 0.01);
            let left = c as f64 * col_w + rng.gen_f64(0.0, 0.01);
            let bottom = top + row_h - 0.02;
            let right = left + col_w - 0.02;
            objects.push(norm(next_id, ObjectClass::Panel, (top, left, bottom, right)));
            next_id += 1;

            for _ in 0..rng.gen_range(5) {
                let h = rng.gen_f64(0.02, 0.08);
                let w = rng.gen_f64(0.05, 0.2);
                let t = rng.gen_f64(top, (bottom - h).max(top));
                let l = rng.gen_f64(left, (right - w).max(left));
                let class = ObjectClass::from_id(1 + rng.gen_range(3) as u32);
                objects.push(norm(next_id, class, (t, l, t + h, l + w)));
                next_id += 1;
            }
        }
    }

    for _ in 0..rng.gen_range(3) {
        let l = rng.gen_f64(0.0, 0.8);
        let t = rng.gen_f64(0.91, 0.95);
        objects.push(norm(next_id, ObjectClass::Caption, (t, l, t + 0.04, l + 0.15)));
        next_id += 1;
    }

    rng.shuffle(&mut objects);
    objects
}
