use ndarray::{array, Array1, Array2, ArrayView1};

/// Cross product of two 3-vectors.
#[inline(always)]
pub fn cross(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array1<f64> {
    array![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0]
    ]
}

/// Signed volume of the cell spanned by the rows of `lat`.
#[inline(always)]
pub fn triple_product(lat: &Array2<f64>) -> f64 {
    lat.row(0).dot(&cross(lat.row(1), lat.row(2)))
}
