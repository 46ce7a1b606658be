//! Map cell indexing on a hierarchical spherical grid.
//!
//! Area queries name the map cells they want. Cells come from projecting
//! the sphere onto the six faces of a cube, subdividing each face into a
//! quadtree 30 levels deep, and numbering the leaves along a Hilbert curve.
//! A cell id is a `u64`:
//!
//! ```text
//!  63  61 60                                         1 0
//! ┌──────┬────────────────────────────────────────────┬─┐
//! │ face │ 2 bits per level, Hilbert position         │1│  ← leaf (level 30)
//! └──────┴────────────────────────────────────────────┴─┘
//! ```
//!
//! Coarser cells keep the top `2 * level` position bits and move the
//! marker bit up, so a parent always sorts between its first and last
//! descendants and neighbours along the curve differ by a constant step.

use std::f64::consts::PI;
use std::fmt;

/// Deepest subdivision level.
pub const MAX_LEVEL: u8 = 30;

/// Level of the cells used for map queries.
pub const QUERY_LEVEL: u8 = 15;

/// How many cells on each side of the query cell are included.
pub const NEIGHBOR_RADIUS: usize = 10;

const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;
const MAX_SIZE: u32 = 1 << MAX_LEVEL;

const SWAP_MASK: u8 = 0x01;
const INVERT_MASK: u8 = 0x02;

/// Hilbert position of child `(i, j)` for each orientation, indexed by
/// `[orientation][i << 1 | j]`.
const IJ_TO_POS: [[u8; 4]; 4] = [
    [0, 1, 3, 2], // canonical
    [0, 3, 1, 2], // axes swapped
    [2, 3, 1, 0], // bits inverted
    [2, 1, 3, 0], // swapped and inverted
];

/// Orientation change applied after descending into child `pos`.
const POS_TO_ORIENTATION: [u8; 4] = [SWAP_MASK, 0, 0, INVERT_MASK | SWAP_MASK];

/// A 64-bit cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Wraps a raw id. No validation; see [`is_valid`](Self::is_valid).
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The leaf cell containing the point at `lat`, `lng` (degrees).
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        let (phi, theta) = (lat * PI / 180.0, lng * PI / 180.0);
        let x = phi.cos() * theta.cos();
        let y = phi.cos() * theta.sin();
        let z = phi.sin();

        let (face, u, v) = xyz_to_face_uv(x, y, z);
        let i = st_to_ij(uv_to_st(u));
        let j = st_to_ij(uv_to_st(v));
        Self::from_face_ij(face, i, j)
    }

    fn from_face_ij(face: u8, i: u32, j: u32) -> Self {
        let mut orientation = face & SWAP_MASK;
        let mut pos: u64 = 0;
        for k in (0..u32::from(MAX_LEVEL)).rev() {
            let ij = (((i >> k) & 1) << 1 | ((j >> k) & 1)) as usize;
            let child = IJ_TO_POS[orientation as usize][ij];
            pos = (pos << 2) | u64::from(child);
            orientation ^= POS_TO_ORIENTATION[child as usize];
        }
        Self((u64::from(face) << POS_BITS) | (pos << 1) | 1)
    }

    pub fn id(self) -> u64 {
        self.0
    }

    /// Which cube face (0–5) the cell lies on.
    pub fn face(self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// The lowest set bit, which marks the cell's level.
    fn lsb(self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    fn lsb_for_level(level: u8) -> u64 {
        1 << (2 * u32::from(MAX_LEVEL - level))
    }

    /// The subdivision level, 0 for face cells and 30 for leaves. The
    /// zero id has no set bit and reports level 0.
    pub fn level(self) -> u8 {
        MAX_LEVEL.saturating_sub((self.0.trailing_zeros() / 2) as u8)
    }

    pub fn is_valid(self) -> bool {
        self.face() < 6 && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    /// The ancestor at `level`. `level` must not be deeper than the cell.
    pub fn parent(self, level: u8) -> Self {
        debug_assert!(level <= self.level());
        let lsb = Self::lsb_for_level(level);
        Self((self.0 & lsb.wrapping_neg()) | lsb)
    }

    /// The next cell at the same level along the Hilbert curve.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(self.lsb() << 1))
    }

    /// The previous cell at the same level along the Hilbert curve.
    pub fn prev(self) -> Self {
        Self(self.0.wrapping_sub(self.lsb() << 1))
    }
}

/// Hex token with trailing zeros stripped, the usual short form.
impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("X");
        }
        let hex = format!("{:016x}", self.0);
        f.write_str(hex.trim_end_matches('0'))
    }
}

fn xyz_to_face_uv(x: f64, y: f64, z: f64) -> (u8, f64, f64) {
    let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
    let axis = if ax > ay {
        if ax > az { 0 } else { 2 }
    } else if ay > az {
        1
    } else {
        2
    };
    let negative = match axis {
        0 => x < 0.0,
        1 => y < 0.0,
        _ => z < 0.0,
    };
    let face = if negative { axis + 3 } else { axis };

    let (u, v) = match face {
        0 => (y / x, z / x),
        1 => (-x / y, z / y),
        2 => (-x / z, -y / z),
        3 => (z / x, y / x),
        4 => (z / y, -x / y),
        _ => (-y / z, -x / z),
    };
    (face, u, v)
}

/// Quadratic projection, keeps cell areas roughly uniform across a face.
fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

fn st_to_ij(s: f64) -> u32 {
    let scaled = (f64::from(MAX_SIZE) * s).floor();
    scaled.clamp(0.0, f64::from(MAX_SIZE - 1)) as u32
}

// ---------------------------------------------------------------------------
// CellIndexer
// ---------------------------------------------------------------------------

/// Produces the cell ids an area query should cover.
#[derive(Debug, Clone, Copy)]
pub struct CellIndexer {
    /// Level of the returned cells.
    pub level: u8,
    /// Cells taken on each side of the centre cell along the curve.
    pub radius: usize,
}

impl Default for CellIndexer {
    fn default() -> Self {
        Self {
            level: QUERY_LEVEL,
            radius: NEIGHBOR_RADIUS,
        }
    }
}

impl CellIndexer {
    /// The cell containing the point plus `radius` neighbours before and
    /// after it, as raw ids in ascending order.
    pub fn nearby_cells(&self, lat: f64, lng: f64) -> Vec<u64> {
        let center = CellId::from_lat_lng(lat, lng).parent(self.level);

        let mut cells = Vec::with_capacity(2 * self.radius + 1);
        cells.push(center.id());
        let (mut before, mut after) = (center, center);
        for _ in 0..self.radius {
            before = before.prev();
            after = after.next();
            cells.push(before.id());
            cells.push(after.id());
        }
        cells.sort_unstable();
        cells
    }
}

/// [`CellIndexer::nearby_cells`] with the protocol's level and radius.
pub fn nearby_cells(lat: f64, lng: f64) -> Vec<u64> {
    CellIndexer::default().nearby_cells(lat, lng)
}
