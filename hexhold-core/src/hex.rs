//! Hex grid geometry with axial coordinates

use std::fmt;
use std::ops::{Add, Sub};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Axial hex coordinates
///
/// The third cube coordinate is derived as `s = -q - r`, so `q + r + s == 0`
/// holds by construction. Equality and hashing use `(q, r)` only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),   // E
    (1, -1),  // NE
    (0, -1),  // NW
    (-1, 0),  // W
    (-1, 1),  // SW
    (0, 1),   // SE
];

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived cube coordinate
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex-grid distance between two coordinates
    pub fn distance(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// The 6 adjacent coordinates, in `DIRECTIONS` order
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (i, &(dq, dr)) in DIRECTIONS.iter().enumerate() {
            out[i] = Hex::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// All coordinates at distance 1..=range, excluding `self`
    ///
    /// Empty for `range <= 0`. Generation order is q-major and deterministic.
    pub fn neighbors_within(&self, range: i32) -> Vec<Hex> {
        let mut out = Vec::new();
        if range <= 0 {
            return out;
        }
        for dq in -range..=range {
            let lo = (-range).max(-dq - range);
            let hi = range.min(-dq + range);
            for dr in lo..=hi {
                let coord = Hex::new(self.q + dq, self.r + dr);
                if coord != *self {
                    out.push(coord);
                }
            }
        }
        out
    }

    /// Whether `other` lies within `range` hexes of `self`
    pub fn is_within_range(&self, range: i32, other: Hex) -> bool {
        self.distance(other) <= range
    }

    /// Convert to screen pixel position (flat-top orientation)
    ///
    /// Geometry utility for external renderers; no effect on rules.
    pub fn to_pixel(&self, hex_size: f32) -> (f32, f32) {
        let x = hex_size * (1.5 * self.q as f32);
        let y = hex_size * (3.0f32.sqrt() / 2.0 * self.q as f32 + 3.0f32.sqrt() * self.r as f32);
        (x, y)
    }

    /// Convert a screen pixel position back to the nearest hex coordinate
    pub fn from_pixel(x: f32, y: f32, hex_size: f32) -> Hex {
        let q = (2.0 / 3.0 * x) / hex_size;
        let r = (-1.0 / 3.0 * x + 3.0f32.sqrt() / 3.0 * y) / hex_size;
        hex_round(q, r)
    }
}

/// Round fractional axial coordinates to the nearest valid hex
///
/// Recomputes whichever of q, r, s carries the largest rounding error from
/// the other two, preserving `q + r + s == 0`.
fn hex_round(q: f32, r: f32) -> Hex {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    Hex::new(rq as i32, rr as i32)
}

/// All coordinates of a hexagonal map with the given radius
///
/// `max(|q|, |r|, |s|) <= radius`; contains `3r^2 + 3r + 1` coordinates.
pub fn hex_map(radius: i32) -> FxHashSet<Hex> {
    let mut coordinates = FxHashSet::default();
    for q in -radius..=radius {
        let lo = (-radius).max(-q - radius);
        let hi = radius.min(-q + radius);
        for r in lo..=hi {
            coordinates.insert(Hex::new(q, r));
        }
    }
    coordinates
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, rhs: Hex) -> Hex {
        Hex::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
