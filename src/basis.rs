//! Construction of a [`Model`] and the primitive operations on its hopping
//! table.
use crate::error::{Result, TbError};
use crate::generics::hop_use;
use crate::math::{cross, triple_product};
use crate::{Model, DIM_R};
use ndarray::*;
use num_complex::Complex;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Below this cell volume the lattice vectors count as linearly dependent.
const VOLUME_TOL: f64 = 1e-12;

impl Model {
    /// This function is used to initialize a [`Model`]. The variables that
    /// need to be input are as follows:
    ///
    /// - lat: the lattice vectors, a 3$\times$3 matrix whose row `i` is $\bm a_i$
    ///
    /// - orb: the fractional orbital coordinates, one row per orbital
    ///
    /// The reciprocal lattice vectors are derived here from the dual-basis
    /// formula $\bm b_i = 2\pi\,\bm a_j\times\bm a_k/V$ with $(i,j,k)$
    /// cyclic and $V=\bm a_1\cdot(\bm a_2\times\bm a_3)$, so that
    /// $\bm a_i\cdot\bm b_j=2\pi\delta_{ij}$. The hopping table starts empty.
    pub fn tb_model(lat: Array2<f64>, orb: Array2<f64>) -> Result<Model> {
        if lat.nrows() != DIM_R || lat.ncols() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "lattice vectors".to_string(),
                expected: DIM_R,
                found: if lat.nrows() != DIM_R {
                    lat.nrows()
                } else {
                    lat.ncols()
                },
            });
        }
        if orb.ncols() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "orbital positions".to_string(),
                expected: DIM_R,
                found: orb.ncols(),
            });
        }
        let volume = triple_product(&lat);
        if volume.abs() < VOLUME_TOL {
            return Err(TbError::DegenerateLattice { volume });
        }
        let mut rlat = Array2::<f64>::zeros((DIM_R, DIM_R));
        for i in 0..DIM_R {
            let b = cross(lat.row((i + 1) % DIM_R), lat.row((i + 2) % DIM_R));
            rlat.row_mut(i).assign(&(b * (2.0 * PI / volume)));
        }
        let norb = orb.nrows();
        Ok(Model {
            norb,
            lat,
            rlat,
            orb,
            hops: HashMap::new(),
        })
    }

    /// This function is used to add hopping to the model. The "set" indicates
    /// that it overrides any previous value at the same key.
    ///
    /// - tmp: the hopping amplitude, `f64` or `Complex<f64>`
    ///
    /// - ind_i and ind_j: the orbital indices, representing hopping from j to i
    ///
    /// - R: the unit cell the target orbital lives in
    ///
    /// In general, this function sets $\bra{i\bm 0}\hat H\ket{j\bm R}=$tmp,
    /// and at the same time $\bra{j\bm 0}\hat H\ket{i,-\bm R}=\bar{\text{tmp}}$,
    /// which keeps the table Hermitian. Callers therefore enter each
    /// independent matrix element exactly once.
    ///
    /// # Examples
    /// ```
    /// use ndarray::*;
    /// use tblat::Model;
    /// // the graphene model
    /// let lat = arr2(&[[1.0, 0.0, 0.0], [0.5, 3_f64.sqrt() / 2.0, 0.0], [0.0, 0.0, 1.0]]);
    /// let orb = arr2(&[[1.0 / 3.0, 1.0 / 3.0, 0.0], [2.0 / 3.0, 2.0 / 3.0, 0.0]]);
    /// let mut graphene_model = Model::tb_model(lat, orb).unwrap();
    /// let t = -1.0; // the nearest-neighbour hopping
    /// graphene_model.set_hop(t, 0, 1, &array![0, 0, 0]).unwrap();
    /// graphene_model.set_hop(t, 1, 0, &array![1, 0, 0]).unwrap();
    /// graphene_model.set_hop(t, 1, 0, &array![0, 1, 0]).unwrap();
    /// ```
    #[allow(non_snake_case)]
    pub fn set_hop<S, U>(
        &mut self,
        tmp: U,
        ind_i: usize,
        ind_j: usize,
        R: &ArrayBase<S, Ix1>,
    ) -> Result<()>
    where
        S: Data<Elem = isize>,
        U: hop_use,
    {
        let tmp: Complex<f64> = tmp.to_complex();
        let R = self.check_hop_args(ind_i, ind_j, R)?;
        if ind_i == ind_j && R == [0, 0, 0] && tmp.im != 0.0 {
            return Err(TbError::OnsiteMustBeReal(tmp));
        }
        self.insert_pair(ind_i, ind_j, R, tmp);
        Ok(())
    }

    /// Arguments as in [`Model::set_hop`], but
    /// $\bra{i\bm 0}\hat H\ket{j\bm R}$+=tmp, accumulating with whatever
    /// amplitude is already stored.
    #[allow(non_snake_case)]
    pub fn add_hop<S, U>(
        &mut self,
        tmp: U,
        ind_i: usize,
        ind_j: usize,
        R: &ArrayBase<S, Ix1>,
    ) -> Result<()>
    where
        S: Data<Elem = isize>,
        U: hop_use,
    {
        let tmp: Complex<f64> = tmp.to_complex();
        let R = self.check_hop_args(ind_i, ind_j, R)?;
        if ind_i == ind_j && R == [0, 0, 0] && tmp.im != 0.0 {
            return Err(TbError::OnsiteMustBeReal(tmp));
        }
        *self.hops.entry((ind_i, ind_j, R)).or_default() += tmp;
        let rev = (ind_j, ind_i, [-R[0], -R[1], -R[2]]);
        if rev != (ind_i, ind_j, R) {
            *self.hops.entry(rev).or_default() += tmp.conj();
        }
        Ok(())
    }

    /// Set the whole diagonal, $\bra{i\bm 0}\hat H\ket{i\bm 0}=$tmp\[i\].
    pub fn set_onsite(&mut self, tmp: &Array1<f64>) -> Result<()> {
        if tmp.len() != self.norb {
            return Err(TbError::DimensionMismatch {
                context: "onsite energies".to_string(),
                expected: self.norb,
                found: tmp.len(),
            });
        }
        for (i, item) in tmp.iter().enumerate() {
            self.set_onsite_one(*item, i)?;
        }
        Ok(())
    }

    /// Set a single diagonal element, $\bra{i\bm 0}\hat H\ket{i\bm 0}$.
    pub fn set_onsite_one(&mut self, tmp: f64, ind: usize) -> Result<()> {
        let R = Array1::<isize>::zeros(DIM_R);
        self.set_hop(Complex::new(tmp, 0.0), ind, ind, &R)
    }

    /// Landau-gauge Peierls substitution for a uniform field of strength `B`
    /// (flux per unit area in the model's length units).
    ///
    /// Every stored amplitude $\bra{n\bm 0}\hat H\ket{m\bm R}$ is multiplied
    /// in place by
    /// $$e^{\,i\,2\pi B\,(y_n-y_m)(x_n+x_m)/2},$$
    /// where $(x,y)$ are the Cartesian positions of the two orbitals. Both
    /// positions are taken from the home unit cell, ignoring the $\bm R$
    /// displacement of the far end of the bond. The phase is antisymmetric
    /// under swapping $n$ and $m$, so the table stays Hermitian.
    #[allow(non_snake_case)]
    pub fn add_magnetic_field(&mut self, B: f64) {
        let orb_real = self.orb_cartesian();
        for (&(n, m, _), v) in self.hops.iter_mut() {
            let phase = 2.0 * PI * B * (orb_real[[n, 1]] - orb_real[[m, 1]])
                * (orb_real[[n, 0]] + orb_real[[m, 0]])
                / 2.0;
            *v *= Complex::new(0.0, phase).exp();
        }
    }

    /// Writes `(i, j, R) -> v` together with its Hermitian partner
    /// `(j, i, -R) -> conj(v)`, overwriting both keys. The self-conjugate
    /// key `(i, i, 0)` is written once.
    #[allow(non_snake_case)]
    pub(crate) fn insert_pair(&mut self, ind_i: usize, ind_j: usize, R: [isize; 3], v: Complex<f64>) {
        self.hops.insert((ind_i, ind_j, R), v);
        let rev = (ind_j, ind_i, [-R[0], -R[1], -R[2]]);
        if rev != (ind_i, ind_j, R) {
            self.hops.insert(rev, v.conj());
        }
    }

    /// Shared validation for the hopping mutators.
    #[allow(non_snake_case)]
    fn check_hop_args<S>(
        &self,
        ind_i: usize,
        ind_j: usize,
        R: &ArrayBase<S, Ix1>,
    ) -> Result<[isize; 3]>
    where
        S: Data<Elem = isize>,
    {
        if R.len() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "cell displacement R".to_string(),
                expected: DIM_R,
                found: R.len(),
            });
        }
        for ind in [ind_i, ind_j] {
            if ind >= self.norb {
                return Err(TbError::OrbitalIndexOutOfRange {
                    index: ind,
                    norb: self.norb,
                });
            }
        }
        Ok([R[0], R[1], R[2]])
    }
}
