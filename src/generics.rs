//! Generic argument support for the model-building API.
use num_complex::Complex64;
use num_traits::identities::Zero;

pub trait ToFloat {
    fn to_float(self) -> f64;
}
impl ToFloat for usize {
    fn to_float(self) -> f64 {
        self as f64
    }
}

impl ToFloat for isize {
    fn to_float(self) -> f64 {
        self as f64
    }
}

impl ToFloat for f32 {
    fn to_float(self) -> f64 {
        self as f64
    }
}

impl ToFloat for f64 {
    fn to_float(self) -> f64 {
        self
    }
}

/// Floating scalar the k-mesh generators can produce.
#[allow(non_camel_case_types)]
pub trait usefloat: Copy + Clone + Zero + std::fmt::Display + PartialOrd {
    fn from<T: ToFloat>(n: T) -> Self;
}
impl usefloat for f32 {
    fn from<T: ToFloat>(n: T) -> Self {
        n.to_float() as f32
    }
}

impl usefloat for f64 {
    fn from<T: ToFloat>(n: T) -> Self {
        n.to_float()
    }
}

//this trait lets set_hop and add_hop take both f64 and Complex64 amplitudes
#[allow(non_camel_case_types)]
pub trait hop_use: Copy + Clone + Zero {
    fn to_complex(&self) -> Complex64;
}
impl hop_use for f64 {
    fn to_complex(&self) -> Complex64 {
        Complex64::new(*self, 0.0)
    }
}
impl hop_use for Complex64 {
    fn to_complex(&self) -> Complex64 {
        *self
    }
}
