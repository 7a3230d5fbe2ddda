use fftw::plan::*;
use fftw::types::*;
use lazy_static::lazy_static;
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use parking_lot::Mutex;

use crate::error::FftError;

lazy_static! {
    //
    // FFTW's planner is not thread-safe; plan construction is serialized
    // process-wide. Plan execution parallelizes internally across the
    // requested thread count and needs no coordination here.
    //
    static ref PLANNER_LOCK: Mutex<()> = Mutex::new(());
}

/// Forward 2-D transform over axes (0, 1) using `nthreads` FFTW workers.
/// Output is the unnormalized DFT, matching [`crate::ndfft::fftn`].
pub fn fftwn(input: &ArrayD<Complex64>, nthreads: usize) -> Result<ArrayD<Complex64>, FftError> {
    transform(input, Sign::Forward, nthreads)
}

/// Inverse 2-D transform over axes (0, 1) using `nthreads` FFTW workers.
/// Result is scaled by `1/N`, matching [`crate::ndfft::ifftn`], so that
/// `ifftwn(fftwn(x)) ≈ x`.
pub fn ifftwn(input: &ArrayD<Complex64>, nthreads: usize) -> Result<ArrayD<Complex64>, FftError> {
    let mut output = transform(input, Sign::Backward, nthreads)?;
    let n = output.len();
    if n > 0 {
        let scale = 1.0 / n as f64;
        output.mapv_inplace(|v| v * scale);
    }
    Ok(output)
}

fn transform(
    input: &ArrayD<Complex64>,
    sign: Sign,
    nthreads: usize,
) -> Result<ArrayD<Complex64>, FftError> {
    if input.ndim() != 2 {
        return Err(FftError::UnsupportedDimensionality {
            ndim: input.ndim(),
        });
    }

    let shape: Vec<usize> = input.shape().to_vec();
    let plan = build_plan(&shape, sign, nthreads)?;

    //
    // Fresh one-shot buffers per call; neither plan nor buffers are
    // retained once the output array is handed back.
    //
    let mut in_buf: Vec<c64> = input.iter().map(|v| c64::new(v.re, v.im)).collect();
    let mut out_buf = vec![c64::default(); in_buf.len()];

    plan.reprocess(&mut in_buf, &mut out_buf)
        .map_err(|e| FftError::PlanFailure {
            detail: format!("{e:?}"),
        })?;

    let output: Vec<Complex64> = out_buf.iter().map(|v| Complex64::new(v.re, v.im)).collect();
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), output).expect("output buffer matches input shape"))
}

fn build_plan(shape: &[usize], sign: Sign, nthreads: usize) -> Result<C2CPlan64, FftError> {
    //
    // MEASURE planning scribbles over its buffers, so the plan is built
    // against scratch storage and executed later on the real data.
    //
    let len = shape.iter().product();
    let mut scratch_in = vec![c64::default(); len];
    let mut scratch_out = vec![c64::default(); len];

    let _guard = PLANNER_LOCK.lock();
    fftw::threading::plan_with_nthreads_f64(nthreads);

    C2CPlan::new(shape, &mut scratch_in, &mut scratch_out, sign, Flag::MEASURE).map_err(|e| {
        FftError::PlanFailure {
            detail: format!("{e:?}"),
        }
    })
}
