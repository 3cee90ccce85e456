//! k-space sampling: uniform meshes and high-symmetry paths.
use crate::error::{Result, TbError};
use crate::generics::usefloat;
use crate::{Model, DIM_R};
use ndarray::*;
use ndarray_linalg::Inverse;

/// $\Gamma$-centred uniform mesh with `k_mesh[d]` points along reciprocal
/// direction `d`, in fractional coordinates; one k-point per row, the last
/// axis running fastest.
#[allow(non_snake_case)]
pub fn gen_kmesh<T>(k_mesh: &Array1<usize>) -> Result<Array2<T>>
where
    T: usefloat + std::ops::Div<Output = T>,
{
    if k_mesh.len() != DIM_R {
        return Err(TbError::DimensionMismatch {
            context: "k-mesh".to_string(),
            expected: DIM_R,
            found: k_mesh.len(),
        });
    }
    let nk: usize = k_mesh.iter().product();
    let mut kvec = Array2::<T>::zeros((nk, DIM_R));
    let mut row = 0;
    for i in 0..k_mesh[[0]] {
        for j in 0..k_mesh[[1]] {
            for k in 0..k_mesh[[2]] {
                kvec[[row, 0]] = T::from(i) / T::from(k_mesh[[0]]);
                kvec[[row, 1]] = T::from(j) / T::from(k_mesh[[1]]);
                kvec[[row, 2]] = T::from(k) / T::from(k_mesh[[2]]);
                row += 1;
            }
        }
    }
    Ok(kvec)
}

impl Model {
    /// Interpolates `nk` k-points along the high-symmetry `path` (one node
    /// per row, fractional coordinates), spacing the nodes by their distance
    /// in the metric $(L L^T)^{-1}$ of the reciprocal cell.
    ///
    /// Returns `(k_vec, k_dist, k_node)`: the interpolated points, the
    /// distance of every point along the path, and the node distances.
    #[allow(non_snake_case)]
    pub fn k_path(
        &self,
        path: &Array2<f64>,
        nk: usize,
    ) -> Result<(Array2<f64>, Array1<f64>, Array1<f64>)> {
        if path.ncols() != DIM_R {
            return Err(TbError::DimensionMismatch {
                context: "k-path nodes".to_string(),
                expected: DIM_R,
                found: path.ncols(),
            });
        }
        if nk < 2 {
            return Err(TbError::DimensionMismatch {
                context: "k-path sample count".to_string(),
                expected: 2,
                found: nk,
            });
        }
        let n_node = path.nrows();
        let k_metric = (self.lat.dot(&self.lat.t())).inv()?;
        let mut k_node = Array1::<f64>::zeros(n_node);
        for n in 1..n_node {
            let dk = path.row(n).to_owned() - path.row(n - 1);
            let a = k_metric.dot(&dk);
            let dklen = dk.dot(&a).sqrt();
            k_node[[n]] = k_node[[n - 1]] + dklen;
        }
        let mut node_index: Vec<usize> = vec![0];
        for n in 1..n_node - 1 {
            let frac = k_node[[n]] / k_node[[n_node - 1]];
            node_index.push((frac * ((nk - 1) as f64)).round() as usize);
        }
        node_index.push(nk - 1);
        let mut k_dist = Array1::<f64>::zeros(nk);
        let mut k_vec = Array2::<f64>::zeros((nk, DIM_R));
        k_vec.row_mut(0).assign(&path.row(0));
        for n in 1..n_node {
            let n_i = node_index[n - 1];
            let n_f = node_index[n];
            let kd_i = k_node[[n - 1]];
            let kd_f = k_node[[n]];
            let k_i = path.row(n - 1);
            let k_f = path.row(n);
            for j in n_i..n_f + 1 {
                let frac: f64 = ((j - n_i) as f64) / ((n_f - n_i) as f64);
                k_dist[[j]] = kd_i + frac * (kd_f - kd_i);
                k_vec
                    .row_mut(j)
                    .assign(&((1.0 - frac) * k_i.to_owned() + frac * k_f.to_owned()));
            }
        }
        Ok((k_vec, k_dist, k_node))
    }
}
