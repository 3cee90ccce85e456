//! src/error.rs
//! This module defines the custom error types for the whole crate. Every
//! fallible operation validates its arguments eagerly and surfaces one of
//! these variants before mutating anything.

use num_complex::Complex;
use thiserror::Error;

/// The primary error type for all fallible operations in this library.
#[derive(Error, Debug)]
pub enum TbError {
    // --- Invalid Input and Arguments ---
    #[error("Dimension mismatch for '{context}': expected {expected}, got {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("Orbital index {index} is out of range for a model with {norb} orbitals")]
    OrbitalIndexOutOfRange { index: usize, norb: usize },

    #[error("Invalid supercell repetition count: {0}. Must be >= 1.")]
    InvalidSupercellSize(usize),

    // --- Model Consistency and Physics Errors ---
    #[error("The lattice vectors are linearly dependent (cell volume {volume:e})")]
    DegenerateLattice { volume: f64 },

    #[error("On-site hopping energy must be a real number, but got {0}")]
    OnsiteMustBeReal(Complex<f64>),

    #[error("The Bloch Hamiltonian is not Hermitian (largest deviation {deviation:e})")]
    NonHermitianHamiltonian { deviation: f64 },

    // --- Linear Algebra and Numerical Errors ---
    #[error("Linear algebra operation failed")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
}

/// A specialized `Result` type for this library's operations.
pub type Result<T> = std::result::Result<T, TbError>;
