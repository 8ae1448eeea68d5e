//! Uniform cell grid for neighbour search
//!
//! With a cell size of at least the kernel support radius, every particle
//! within the support of a point lies in the point's cell or one of the eight
//! cells around it.
use crate::traits::SmoothingKernel;
use crate::types::{Error, Result};
use log::debug;
use rayon::prelude::*;

/// Particle indices bucketed into square cells over a rectangle.
#[derive(Clone, Debug)]
pub struct CellGrid {
    cells: Vec<Vec<usize>>,
    width: usize,
    height: usize,
    lower: [f64; 2],
    cell_size: f64,
}

impl CellGrid {
    /// Create an empty grid covering `lower..=upper`.
    pub fn new(cell_size: f64, lower: [f64; 2], upper: [f64; 2]) -> Result<Self> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(Error::InvalidGrid(format!(
                "cell size {cell_size} is not positive"
            )));
        }
        if !(lower[0] <= upper[0] && lower[1] <= upper[1]) {
            return Err(Error::InvalidGrid(format!(
                "lower corner {lower:?} is not below upper corner {upper:?}"
            )));
        }

        let width = ((upper[0] - lower[0]) / cell_size).floor() as usize + 1;
        let height = ((upper[1] - lower[1]) / cell_size).floor() as usize + 1;
        Ok(Self {
            cells: vec![Vec::new(); width * height],
            width,
            height,
            lower,
            cell_size,
        })
    }

    /// Build a grid around component-major `particles` and insert them all.
    pub fn from_particles(cell_size: f64, particles: &[f64]) -> Result<Self> {
        let npoints = particles.len() / 2;
        let (xs, ys) = particles.split_at(npoints);
        let bounds = |values: &[f64]| {
            values
                .iter()
                .fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], value| {
                    [lo.min(*value), hi.max(*value)]
                })
        };
        let [x_lo, x_hi] = if npoints == 0 { [0.0, 0.0] } else { bounds(xs) };
        let [y_lo, y_hi] = if npoints == 0 { [0.0, 0.0] } else { bounds(ys) };

        let mut grid = Self::new(cell_size, [x_lo, y_lo], [x_hi, y_hi])?;
        for (index, (x, y)) in xs.iter().zip(ys.iter()).enumerate() {
            grid.insert(index, [*x, *y]);
        }
        debug!(
            "Bucketed {} particles into a {}x{} cell grid",
            npoints, grid.width, grid.height
        );
        Ok(grid)
    }

    /// Number of cells along each axis.
    pub fn shape(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// Cell containing `point`. Points outside the grid map to the nearest
    /// boundary cell.
    pub fn cell_of(&self, point: [f64; 2]) -> [usize; 2] {
        let clamp = |value: f64, lower: f64, count: usize| {
            let index = ((value - lower) / self.cell_size).floor();
            if index <= 0.0 {
                0
            } else {
                (index as usize).min(count - 1)
            }
        };
        [
            clamp(point[0], self.lower[0], self.width),
            clamp(point[1], self.lower[1], self.height),
        ]
    }

    /// Add a particle.
    pub fn insert(&mut self, index: usize, point: [f64; 2]) {
        let [gx, gy] = self.cell_of(point);
        self.cells[gy * self.width + gx].push(index);
    }

    /// Particles in the cell of `point` and its eight neighbours.
    pub fn neighbours(&self, point: [f64; 2]) -> Vec<usize> {
        let [gx, gy] = self.cell_of(point);
        let mut neighbours = Vec::new();
        for y in gy.saturating_sub(1)..=(gy + 1).min(self.height - 1) {
            for x in gx.saturating_sub(1)..=(gx + 1).min(self.width - 1) {
                neighbours.extend_from_slice(&self.cells[y * self.width + x]);
            }
        }
        neighbours
    }
}

/// Density at every particle position using a cell grid.
///
/// Gives the same result as [crate::kernel::particle_densities] while only
/// visiting particles in neighbouring cells.
pub fn grid_particle_densities<K: SmoothingKernel<T = f64> + Sync>(
    kernel: &K,
    particles: &[f64],
    masses: &[f64],
) -> Result<Vec<f64>> {
    assert_eq!(
        particles.len(),
        2 * masses.len(),
        "Wrong dimension for `particles`. {} != {} ",
        particles.len(),
        2 * masses.len(),
    );
    let npoints = masses.len();
    let support = kernel.support_radius();
    let grid = CellGrid::from_particles(support, particles)?;

    Ok((0..npoints)
        .into_par_iter()
        .map(|index| {
            let point = [particles[index], particles[npoints + index]];
            grid.neighbours(point)
                .into_iter()
                .map(|other| {
                    let diff0 = point[0] - particles[other];
                    let diff1 = point[1] - particles[npoints + other];
                    let r = diff0.hypot(diff1);
                    if r <= support {
                        masses[other] * kernel.value(r)
                    } else {
                        0.0
                    }
                })
                .sum::<f64>()
        })
        .collect())
}
