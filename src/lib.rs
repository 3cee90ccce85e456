//! This crate is used to build and transform periodic tight-binding models:
//!
//! 1: Enter hopping amplitudes $\bra{n\bm 0}\hat H\ket{m\bm R}$ into a sparse table
//!
//! 2: Expand the cell into supercells, cut open-boundary clusters, and insert
//! magnetic flux through a Landau-gauge Peierls substitution
//!
//! 3: Assemble the Bloch Hamiltonian at any momentum and solve its spectrum
//!
//! The entry point is [`Model`]; see [`Model::tb_model`] to create one.
use ndarray::prelude::*;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod basis;
pub mod bloch;
pub mod error;
pub mod generics;
pub mod kpoints;
pub mod math;
pub mod supercell;

pub use error::{Result, TbError};
pub use kpoints::gen_kmesh;

/// The real space dimension of every model.
pub const DIM_R: usize = 3;

/// Key of one hopping entry: the orbital pair `(n, m)` and the integer
/// displacement `R` of the unit cell the `m` orbital lives in.
pub type HopKey = (usize, usize, [isize; 3]);

/// A periodic tight-binding model on a three-dimensional Bravais lattice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// The number of orbitals in the unit cell.
    pub norb: usize,
    /// The lattice vectors of the model; row `i` is $\bm a_i$.
    pub lat: Array2<f64>,
    /// The reciprocal lattice vectors; row `i` is $\bm b_i$, satisfying
    /// $\bm a_i\cdot\bm b_j=2\pi\delta_{ij}$. Derived from `lat` at
    /// construction and never mutated afterwards.
    pub rlat: Array2<f64>,
    /// The positions of the orbitals within the unit cell, in fractional
    /// coordinates (one row per orbital).
    pub orb: Array2<f64>,
    /// The hopping table, $(n,m,\bm R)\mapsto\bra{n\bm 0}\hat H\ket{m\bm R}$.
    /// [`Model::set_hop`] keeps it closed under
    /// $(n,m,\bm R)\to(m,n,-\bm R)$ with the conjugated amplitude, so every
    /// Bloch Hamiltonian assembled from it is Hermitian.
    pub hops: HashMap<HopKey, Complex<f64>>,
}

impl Model {
    /// The number of stored hopping entries, Hermitian partners included.
    #[inline(always)]
    pub fn nhop(&self) -> usize {
        self.hops.len()
    }

    /// The stored amplitude $\bra{n\bm 0}\hat H\ket{m\bm R}$, zero if absent.
    #[allow(non_snake_case)]
    #[inline(always)]
    pub fn hopping(&self, ind_i: usize, ind_j: usize, R: [isize; 3]) -> Complex<f64> {
        self.hops
            .get(&(ind_i, ind_j, R))
            .copied()
            .unwrap_or_default()
    }

    /// Cartesian orbital positions, one row per orbital.
    #[inline(always)]
    pub fn orb_cartesian(&self) -> Array2<f64> {
        self.orb.dot(&self.lat)
    }
}
