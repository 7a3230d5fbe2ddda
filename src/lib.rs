//! Swappable forward/inverse FFT dispatch over `ndarray` arrays.
//!
//! Downstream numeric pipelines ask the factory for "a forward transform
//! and an inverse transform" without hard-coding which engine runs them.
//! Two engines exist: a pure Rust default built on `rustfft` (always
//! available, any dimensionality) and an optional FFTW-backed engine
//! behind the `use_fftw` cargo feature (multi-threaded, plan-based,
//! fixed to 2-D transforms). When FFTW is not linked, requests for it
//! transparently degrade to the default engine.
//!
//! ```
//! use fftdispatch::get_transforms;
//! use ndarray::{ArrayD, IxDyn};
//! use num_complex::Complex64;
//!
//! let pair = get_transforms(1, false)?;
//! let x = ArrayD::from_elem(IxDyn(&[8, 8]), Complex64::new(1.0, 0.0));
//! let spectrum = pair.forward(&x)?;
//! let back = pair.inverse(&spectrum)?;
//! assert!((back[[3, 3]] - x[[3, 3]]).norm() < 1e-9);
//! # Ok::<(), fftdispatch::FftError>(())
//! ```

mod error;
#[cfg(feature = "use_fftw")]
pub mod fftw;
pub mod ndfft;
mod resolver;

pub use error::FftError;
pub use resolver::{get_transforms, Engine, Resolver, TransformPair};
