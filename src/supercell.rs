//! Structural transformations that derive a new [`Model`] from an existing
//! one: supercell expansion and open-boundary cluster truncation.
use crate::error::{Result, TbError};
use crate::{Model, DIM_R};
use ndarray::*;

/// Orbital index of original orbital `n` placed in sub-cell `cell` of the
/// supercell: `(i + j*n0 + k*n0*n1)*norb + n`.
#[inline(always)]
fn sc_index(cell: [isize; 3], ncells: [isize; 3], norb: usize, n: usize) -> usize {
    let cell_lin = cell[0] + cell[1] * ncells[0] + cell[2] * ncells[0] * ncells[1];
    (cell_lin as usize) * norb + n
}

impl Model {
    /// This function repeats the unit cell `ncells[d]` times along lattice
    /// direction `d` and returns the enlarged model; `self` is left
    /// untouched.
    ///
    /// Row `d` of the new lattice is `ncells[d]` times the original row, the
    /// orbital of sub-cell $(i,j,k)$ and original orbital $n$ sits at index
    /// $(i + j\,n_0 + k\,n_0 n_1)\,\text{norb} + n$, and its fractional
    /// position is rescaled into the enlarged cell. Every original hopping
    /// is replayed from every sub-cell: the target sub-cell is wrapped back
    /// into the supercell component-wise, and the floor-division quotient of
    /// that wrap becomes the new inter-supercell displacement. Floor
    /// division (`div_euclid`) keeps bonds with negative displacements
    /// folding onto the correct neighbour supercell.
    pub fn make_supercell(&self, ncells: &Array1<usize>) -> Result<Model> {
        if ncells.len() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "supercell repetition counts".to_string(),
                expected: DIM_R,
                found: ncells.len(),
            });
        }
        for &n in ncells.iter() {
            if n < 1 {
                return Err(TbError::InvalidSupercellSize(n));
            }
        }
        let nc = [ncells[0] as isize, ncells[1] as isize, ncells[2] as isize];
        let ncell_total = (nc[0] * nc[1] * nc[2]) as usize;
        let new_norb = self.norb * ncell_total;

        let mut new_lat = self.lat.clone();
        for d in 0..DIM_R {
            new_lat
                .row_mut(d)
                .assign(&(self.lat.row(d).to_owned() * (ncells[d] as f64)));
        }
        let mut new_orb = Array2::<f64>::zeros((new_norb, DIM_R));
        for k in 0..nc[2] {
            for j in 0..nc[1] {
                for i in 0..nc[0] {
                    let cell = [i, j, k];
                    for n in 0..self.norb {
                        let row = sc_index(cell, nc, self.norb, n);
                        for d in 0..DIM_R {
                            new_orb[[row, d]] =
                                (self.orb[[n, d]] + cell[d] as f64) / (ncells[d] as f64);
                        }
                    }
                }
            }
        }
        let mut sc = Model::tb_model(new_lat, new_orb)?;
        for k in 0..nc[2] {
            for j in 0..nc[1] {
                for i in 0..nc[0] {
                    let cell = [i, j, k];
                    for (&(n, m, r), &v) in self.hops.iter() {
                        let mut dest = [0isize; 3];
                        let mut quot = [0isize; 3];
                        for d in 0..DIM_R {
                            let t = cell[d] + r[d];
                            dest[d] = t.rem_euclid(nc[d]);
                            quot[d] = t.div_euclid(nc[d]);
                        }
                        let ind_i = sc_index(cell, nc, self.norb, n);
                        let ind_j = sc_index(dest, nc, self.norb, m);
                        sc.insert_pair(ind_i, ind_j, quot, v);
                    }
                }
            }
        }
        Ok(sc)
    }

    /// Deep copy of the model with every inter-cell hopping discarded, so
    /// only entries with $\bm R=\bm 0$ survive. The result approximates an
    /// open-boundary finite cluster cut out of the periodic bulk.
    pub fn make_cluster(&self) -> Model {
        let mut cluster = self.clone();
        cluster.hops.retain(|&(_, _, r), _| r == [0, 0, 0]);
        cluster
    }
}
