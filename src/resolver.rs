use lazy_static::lazy_static;
use ndarray::ArrayD;
use num_complex::Complex64;

use crate::error::FftError;
use crate::ndfft;

/// Transform engine capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Pure Rust engine. Always available, single-threaded, transforms
    /// arrays of arbitrary dimensionality.
    Default,
    /// FFTW-backed engine. Present only when the crate is built with the
    /// `use_fftw` feature; multi-threaded, plan-based, fixed to 2-D
    /// transforms over axes (0, 1).
    Accelerated,
}

impl Engine {
    /// Startup probe for the accelerated engine.
    ///
    /// In a Rust build, availability is settled at link time: the `fftw`
    /// crate is only compiled in behind the `use_fftw` feature. The probe
    /// never fails past its own boundary; a build without the feature
    /// silently degrades to [`Engine::Default`].
    pub fn detect() -> Self {
        if cfg!(feature = "use_fftw") {
            log::info!("accelerated FFT engine linked (FFTW)");
            Engine::Accelerated
        } else {
            log::debug!("no accelerated FFT engine linked; using the default engine");
            Engine::Default
        }
    }
}

lazy_static! {
    //
    // Process-wide resolver backing the free-function factory. Probed
    // exactly once on first use and immutable afterwards, so concurrent
    // readers need no locking.
    //
    static ref RESOLVER: Resolver = Resolver::new();
}

/// Backend selection context.
///
/// Holds the engine capability resolved at construction and hands out
/// [`TransformPair`]s according to it. Construct with [`Resolver::new`]
/// for the detected capability, or [`Resolver::with_engine`] to pin one
/// explicitly (the way tests exercise both decision branches).
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    engine: Engine,
}

impl Resolver {
    /// Resolver over the capability detected at startup.
    pub fn new() -> Self {
        Self {
            engine: Engine::detect(),
        }
    }

    /// Resolver over a fixed capability.
    ///
    /// An engine that is not linked into the build cannot be fabricated:
    /// requesting [`Engine::Accelerated`] without the `use_fftw` feature
    /// clamps to [`Engine::Default`] with a logged advisory.
    pub fn with_engine(engine: Engine) -> Self {
        if engine == Engine::Accelerated && !cfg!(feature = "use_fftw") {
            log::warn!("accelerated engine requested but not linked; using the default engine");
            return Self {
                engine: Engine::Default,
            };
        }
        Self { engine }
    }

    /// The engine this resolver dispatches to.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Builds a forward/inverse transform pair.
    ///
    /// `nthreads` is the FFTW worker count, ignored when the default
    /// engine is selected; zero is rejected up front. `prefer_default`
    /// bypasses the accelerated engine even when it is available.
    ///
    /// | engine detected | `prefer_default` | selected |
    /// |---|---|---|
    /// | `Accelerated` | `false` | accelerated, bound to `nthreads` |
    /// | `Accelerated` | `true` | default |
    /// | `Default` | any | default |
    pub fn get_transforms(
        &self,
        nthreads: usize,
        prefer_default: bool,
    ) -> Result<TransformPair, FftError> {
        if nthreads == 0 {
            return Err(FftError::InvalidThreadCount {
                requested: nthreads,
            });
        }

        let backend = if prefer_default || self.engine == Engine::Default {
            log::debug!("dispatching transforms to the default engine");
            Backend::Default
        } else {
            log::debug!("dispatching transforms to FFTW with {nthreads} thread(s)");
            Backend::Accelerated { nthreads }
        };

        Ok(TransformPair { backend })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience factory over the process-wide resolver.
///
/// Equivalent to `Resolver::new().get_transforms(nthreads, prefer_default)`
/// with the detection cost paid once per process.
pub fn get_transforms(nthreads: usize, prefer_default: bool) -> Result<TransformPair, FftError> {
    RESOLVER.get_transforms(nthreads, prefer_default)
}

//
// Both directions of a pair share this one selection, which is what
// keeps a default forward from ever being paired with an accelerated
// inverse.
//
#[derive(Debug, Clone, Copy)]
enum Backend {
    Default,
    Accelerated { nthreads: usize },
}

/// A forward/inverse transform pair bound to one engine.
///
/// Pairs are built fresh per factory call, carry no shared mutable
/// state, and are owned entirely by the caller. Each transform call is
/// an independent, blocking computation: the accelerated engine builds
/// a one-shot plan inside the call and parallelizes internally, the
/// default engine runs single-threaded. There is no cancellation; large
/// transforms run to completion.
#[derive(Debug, Clone, Copy)]
pub struct TransformPair {
    backend: Backend,
}

impl TransformPair {
    /// Forward transform. Unnormalized DFT of `input`, same shape.
    ///
    /// The default engine transforms every axis; the accelerated engine
    /// is fixed to 2-D input and reports other dimensionality as
    /// [`FftError::UnsupportedDimensionality`].
    pub fn forward(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, FftError> {
        match self.backend {
            Backend::Default => Ok(ndfft::fftn(input)),
            #[cfg(feature = "use_fftw")]
            Backend::Accelerated { nthreads } => crate::fftw::fftwn(input, nthreads),
            #[cfg(not(feature = "use_fftw"))]
            Backend::Accelerated { .. } => {
                // Resolver construction clamps this variant away when
                // FFTW is not linked.
                unreachable!()
            }
        }
    }

    /// Inverse transform, scaled by `1/N` so `inverse(forward(x)) ≈ x`.
    pub fn inverse(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, FftError> {
        match self.backend {
            Backend::Default => Ok(ndfft::ifftn(input)),
            #[cfg(feature = "use_fftw")]
            Backend::Accelerated { nthreads } => crate::fftw::ifftwn(input, nthreads),
            #[cfg(not(feature = "use_fftw"))]
            Backend::Accelerated { .. } => unreachable!(),
        }
    }

    /// Engine both directions of this pair dispatch to.
    pub fn engine(&self) -> Engine {
        match self.backend {
            Backend::Default => Engine::Default,
            Backend::Accelerated { .. } => Engine::Accelerated,
        }
    }

    /// FFTW worker count this pair is bound to; `None` for the default
    /// engine.
    pub fn threads(&self) -> Option<usize> {
        match self.backend {
            Backend::Default => None,
            Backend::Accelerated { nthreads } => Some(nthreads),
        }
    }
}
