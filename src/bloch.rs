//! Bloch Hamiltonian assembly and the dense-eigensolver interface.
use crate::error::{Result, TbError};
use crate::{Model, DIM_R};
use ndarray::*;
use ndarray_linalg::{Eigh, EigValsh, UPLO};
use num_complex::Complex;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Largest tolerated deviation from $H=H^\dagger$ before solving.
const HERMITICITY_TOL: f64 = 1e-8;

fn hermiticity_deviation(hamk: &Array2<Complex<f64>>) -> f64 {
    let n = hamk.nrows();
    let mut dev: f64 = 0.0;
    for i in 0..n {
        for j in 0..n {
            dev = dev.max((hamk[[i, j]] - hamk[[j, i]].conj()).norm());
        }
    }
    dev
}

impl Model {
    /// This is the Fourier fold of the hopping table into momentum space,
    ///
    /// $$H_{nm}(\bm k)=\sum_{\bm R}\bra{n\bm 0}\hat H\ket{m\bm R}\,
    /// e^{\,2\pi i\,\bm k\cdot\bm R},$$
    ///
    /// with `kvec` in fractional (reciprocal-lattice) coordinates, so the
    /// phase is the plain dot product of `kvec` with the integer
    /// displacement. Entries sharing $(n,m)$ but different $\bm R$
    /// accumulate, which is what makes multi-shell models come out right.
    pub fn gen_ham<S>(&self, kvec: &ArrayBase<S, Ix1>) -> Result<Array2<Complex<f64>>>
    where
        S: Data<Elem = f64>,
    {
        if kvec.len() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "k-vector".to_string(),
                expected: DIM_R,
                found: kvec.len(),
            });
        }
        let mut hamk = Array2::<Complex<f64>>::zeros((self.norb, self.norb));
        for (&(n, m, r), &v) in self.hops.iter() {
            let kr = kvec[0] * (r[0] as f64) + kvec[1] * (r[1] as f64) + kvec[2] * (r[2] as f64);
            hamk[[n, m]] += v * Complex::new(0.0, 2.0 * PI * kr).exp();
        }
        Ok(hamk)
    }

    /// Eigenvalues of the Bloch Hamiltonian at one k-point, ascending.
    pub fn solve_band_onek<S>(&self, kvec: &ArrayBase<S, Ix1>) -> Result<Array1<f64>>
    where
        S: Data<Elem = f64>,
    {
        let hamk = self.gen_ham(kvec)?;
        let deviation = hermiticity_deviation(&hamk);
        if deviation > HERMITICITY_TOL {
            return Err(TbError::NonHermitianHamiltonian { deviation });
        }
        let eval = hamk.eigvalsh(UPLO::Lower)?;
        Ok(eval)
    }

    /// Eigenvalues (ascending) and eigenvectors of the Bloch Hamiltonian at
    /// one k-point. Column `i` of the returned matrix is the eigenvector of
    /// `eval[i]`.
    pub fn solve_onek<S>(
        &self,
        kvec: &ArrayBase<S, Ix1>,
    ) -> Result<(Array1<f64>, Array2<Complex<f64>>)>
    where
        S: Data<Elem = f64>,
    {
        let hamk = self.gen_ham(kvec)?;
        let deviation = hermiticity_deviation(&hamk);
        if deviation > HERMITICITY_TOL {
            return Err(TbError::NonHermitianHamiltonian { deviation });
        }
        let (eval, evec) = hamk.eigh(UPLO::Lower)?;
        Ok((eval, evec))
    }

    /// Band energies for every k-point in `kvec` (one row per point).
    pub fn solve_band_all<S>(&self, kvec: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let nk = kvec.len_of(Axis(0));
        let mut band = Array2::<f64>::zeros((nk, self.norb));
        for (k, mut row) in kvec.outer_iter().zip(band.outer_iter_mut()) {
            row.assign(&self.solve_band_onek(&k)?);
        }
        Ok(band)
    }

    /// Same as [`Model::solve_band_all`], distributing the k-points over the
    /// rayon thread pool.
    pub fn solve_band_all_parallel<S>(&self, kvec: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let nk = kvec.len_of(Axis(0));
        let eval: Vec<Vec<f64>> = kvec
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|k| self.solve_band_onek(&k).map(|e| e.to_vec()))
            .collect::<Result<_>>()?;
        let band =
            Array2::from_shape_vec((nk, self.norb), eval.into_iter().flatten().collect()).unwrap();
        Ok(band)
    }

    /// Band energies and eigenvectors for every k-point in `kvec`.
    pub fn solve_all<S>(
        &self,
        kvec: &ArrayBase<S, Ix2>,
    ) -> Result<(Array2<f64>, Array3<Complex<f64>>)>
    where
        S: Data<Elem = f64>,
    {
        let nk = kvec.len_of(Axis(0));
        let mut band = Array2::<f64>::zeros((nk, self.norb));
        let mut vectors = Array3::<Complex<f64>>::zeros((nk, self.norb, self.norb));
        for i in 0..nk {
            let (eval, evec) = self.solve_onek(&kvec.row(i))?;
            band.row_mut(i).assign(&eval);
            vectors.slice_mut(s![i, .., ..]).assign(&evec);
        }
        Ok((band, vectors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    fn graphene() -> Model {
        let lat = arr2(&[
            [1.0, 0.0, 0.0],
            [0.5, 3.0_f64.sqrt() / 2.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let orb = arr2(&[[1.0 / 3.0, 1.0 / 3.0, 0.0], [2.0 / 3.0, 2.0 / 3.0, 0.0]]);
        let mut model = Model::tb_model(lat, orb).unwrap();
        model.set_hop(-1.0, 0, 1, &array![0, 0, 0]).unwrap();
        model.set_hop(-1.0, 1, 0, &array![1, 0, 0]).unwrap();
        model.set_hop(-1.0, 1, 0, &array![0, 1, 0]).unwrap();
        model
    }

    #[test]
    fn graphene_gamma_point_bands() {
        let model = graphene();
        let gamma = arr1(&[0.0, 0.0, 0.0]);
        let hamk = model.gen_ham(&gamma).unwrap();
        // three coherent bonds between the two sublattices
        assert!((hamk[[0, 1]] - Complex::new(-3.0, 0.0)).norm() < 1e-12);
        assert!((hamk[[1, 0]] - Complex::new(-3.0, 0.0)).norm() < 1e-12);
        let eval = model.solve_band_onek(&gamma).unwrap();
        assert!((eval[0] + 3.0).abs() < 1e-10);
        assert!((eval[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn eigenpairs_satisfy_the_eigenproblem() {
        let model = graphene();
        let k = arr1(&[0.2, -0.1, 0.0]);
        let hamk = model.gen_ham(&k).unwrap();
        let (eval, evec) = model.solve_onek(&k).unwrap();
        let hv = hamk.dot(&evec);
        for i in 0..model.norb {
            for n in 0..model.norb {
                let residual = hv[[n, i]] - evec[[n, i]] * eval[i];
                assert!(residual.norm() < 1e-10);
            }
        }
        // and the lowest Gamma-point eigenvector explicitly
        let gamma = arr1(&[0.0, 0.0, 0.0]);
        let hamk = model.gen_ham(&gamma).unwrap();
        let (eval, evec) = model.solve_onek(&gamma).unwrap();
        let v1 = evec.column(0);
        let hv1 = hamk.dot(&v1);
        for n in 0..model.norb {
            assert!((hv1[n] - v1[n] * eval[0]).norm() < 1e-10);
        }
        assert!((eval[0] + 3.0).abs() < 1e-10);
    }

    #[test]
    fn bloch_matrix_is_hermitian_for_complex_hoppings() {
        let mut model = graphene();
        // Haldane-like imaginary next-neighbour hoppings
        let li = Complex::<f64>::i();
        model.set_hop(0.1 * li, 0, 0, &array![1, 0, 0]).unwrap();
        model.set_hop(0.1 * li, 0, 0, &array![-1, 1, 0]).unwrap();
        model.set_hop(0.1 * li, 0, 0, &array![0, -1, 0]).unwrap();
        model.set_hop(-0.1 * li, 1, 1, &array![1, 0, 0]).unwrap();
        model.set_hop(-0.1 * li, 1, 1, &array![-1, 1, 0]).unwrap();
        model.set_hop(-0.1 * li, 1, 1, &array![0, -1, 0]).unwrap();
        for k in [
            arr1(&[0.0, 0.0, 0.0]),
            arr1(&[0.31, 0.47, 0.0]),
            arr1(&[-0.2, 0.8, 0.5]),
        ] {
            let hamk = model.gen_ham(&k).unwrap();
            assert!(super::hermiticity_deviation(&hamk) < 1e-12);
            model.solve_band_onek(&k).unwrap();
        }
    }

    #[test]
    fn shells_with_equal_orbital_pair_accumulate() {
        // one orbital, two neighbour shells along x
        let mut chain = Model::tb_model(Array2::eye(3), arr2(&[[0.0, 0.0, 0.0]])).unwrap();
        chain.set_hop(-1.0, 0, 0, &array![1, 0, 0]).unwrap();
        chain.set_hop(-0.25, 0, 0, &array![2, 0, 0]).unwrap();
        let k = arr1(&[0.3, 0.0, 0.0]);
        let hamk = chain.gen_ham(&k).unwrap();
        let expected =
            -2.0 * (2.0 * PI * 0.3).cos() - 0.5 * (4.0 * PI * 0.3).cos();
        assert!((hamk[[0, 0]] - Complex::new(expected, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn k_vector_length_is_checked() {
        let model = graphene();
        assert!(matches!(
            model.gen_ham(&arr1(&[0.0, 0.0])),
            Err(TbError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn band_sweeps_agree_with_single_point_solves() {
        let model = graphene();
        let kvec = arr2(&[
            [0.0, 0.0, 0.0],
            [1.0 / 3.0, 2.0 / 3.0, 0.0],
            [0.5, 0.5, 0.0],
        ]);
        let band = model.solve_band_all(&kvec).unwrap();
        let band_par = model.solve_band_all_parallel(&kvec).unwrap();
        let (band_vec, vectors) = model.solve_all(&kvec).unwrap();
        assert_eq!(band.shape(), &[3, 2]);
        assert_eq!(vectors.shape(), &[3, 2, 2]);
        for i in 0..kvec.nrows() {
            let eval = model.solve_band_onek(&kvec.row(i)).unwrap();
            for n in 0..model.norb {
                assert!((band[[i, n]] - eval[n]).abs() < 1e-12);
                assert!((band_par[[i, n]] - eval[n]).abs() < 1e-12);
                assert!((band_vec[[i, n]] - eval[n]).abs() < 1e-12);
            }
        }
    }
}
