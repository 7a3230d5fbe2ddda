use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use ndarray::{ArrayD, Axis};
use num_complex::Complex64;
use num_traits::Float;
use parking_lot::Mutex;
use rustfft::{Fft, FftDirection, FftPlanner};

lazy_static! {
    //
    // Process-wide rustfft plan cache, keyed by (length, direction).
    //
    static ref PLAN_CACHE: Mutex<HashMap<(usize, bool), Arc<dyn Fft<f64>>>> =
        Mutex::new(HashMap::new());
}

/// Returns a cached rustfft plan for length `n`, creating it on first use.
fn find_plan(n: usize, inverse: bool) -> Arc<dyn Fft<f64>> {
    //
    // Cached plan lookup.
    //
    {
        let cache = PLAN_CACHE.lock();
        if let Some(plan) = cache.get(&(n, inverse)) {
            return plan.clone();
        }
    }

    let direction = if inverse {
        FftDirection::Inverse
    } else {
        FftDirection::Forward
    };
    let plan = FftPlanner::new().plan_fft(n, direction);

    //
    // Cache the plan.
    //
    let mut cache = PLAN_CACHE.lock();
    cache.insert((n, inverse), plan.clone());
    plan
}

/// Unnormalized forward DFT over every axis of `input`.
pub fn fftn(input: &ArrayD<Complex64>) -> ArrayD<Complex64> {
    transform_all_axes(input, false)
}

/// Inverse DFT over every axis of `input`, scaled by `1/N` where `N` is
/// the total element count, so that `ifftn(fftn(x)) ≈ x`.
pub fn ifftn(input: &ArrayD<Complex64>) -> ArrayD<Complex64> {
    let mut output = transform_all_axes(input, true);
    let n = output.len();
    if n > 0 {
        let scale = 1.0 / n as f64;
        output.mapv_inplace(|v| v * scale);
    }
    output
}

/// Widening conversion of a real array to the engines' working type.
pub fn promote<T: Float>(input: &ArrayD<T>) -> ArrayD<Complex64> {
    input.mapv(|v| Complex64::new(v.to_f64().unwrap_or(f64::NAN), 0.0))
}

fn transform_all_axes(input: &ArrayD<Complex64>, inverse: bool) -> ArrayD<Complex64> {
    let mut data = input.to_owned();
    if data.is_empty() {
        return data;
    }

    for axis in 0..data.ndim() {
        let n = data.shape()[axis];
        if n < 2 {
            // Length-1 lanes transform to themselves.
            continue;
        }

        let plan = find_plan(n, inverse);
        let mut lane_buf = vec![Complex64::default(); n];

        //
        // Gather each lane along this axis into a contiguous buffer,
        // transform it, and scatter the result back.
        //
        for mut lane in data.lanes_mut(Axis(axis)) {
            for (slot, &value) in lane_buf.iter_mut().zip(lane.iter()) {
                *slot = value;
            }
            plan.process(&mut lane_buf);
            for (slot, &value) in lane.iter_mut().zip(lane_buf.iter()) {
                *slot = value;
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::{fftn, ifftn, promote};
    use ndarray::{ArrayD, IxDyn};
    use num_complex::Complex64;
    use rand::Rng;

    fn constant(shape: &[usize], value: f64) -> ArrayD<Complex64> {
        ArrayD::from_elem(IxDyn(shape), Complex64::new(value, 0.0))
    }

    fn random(shape: &[usize]) -> ArrayD<Complex64> {
        let mut rng = rand::thread_rng();
        ArrayD::from_shape_fn(IxDyn(shape), |_| {
            Complex64::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5)
        })
    }

    fn max_abs_diff(a: &ArrayD<Complex64>, b: &ArrayD<Complex64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn constant_array_concentrates_in_dc_bin() {
        let spectrum = fftn(&constant(&[8, 8], 1.0));
        assert!((spectrum[[0, 0]] - Complex64::new(64.0, 0.0)).norm() < 1e-9);

        let off_dc = spectrum
            .indexed_iter()
            .filter(|(idx, _)| idx[0] != 0 || idx[1] != 0)
            .map(|(_, v)| v.norm())
            .fold(0.0, f64::max);
        assert!(off_dc < 1e-9);
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut x = constant(&[4, 4], 0.0);
        x[[0, 0]] = Complex64::new(1.0, 0.0);

        let spectrum = fftn(&x);
        for v in spectrum.iter() {
            assert!((v - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn inverse_applies_reciprocal_total_size() {
        let back = ifftn(&constant(&[4, 4], 1.0));
        assert!((back[[0, 0]] - Complex64::new(1.0, 0.0)).norm() < 1e-12);

        let off_dc = back
            .indexed_iter()
            .filter(|(idx, _)| idx[0] != 0 || idx[1] != 0)
            .map(|(_, v)| v.norm())
            .fold(0.0, f64::max);
        assert!(off_dc < 1e-12);
    }

    #[test]
    fn round_trip_recovers_random_2d_input() {
        let x = random(&[16, 12]);
        let back = ifftn(&fftn(&x));
        assert!(max_abs_diff(&back, &x) < 1e-9);
    }

    #[test]
    fn round_trip_recovers_random_3d_input() {
        let x = random(&[5, 7, 4]);
        let back = ifftn(&fftn(&x));
        assert!(max_abs_diff(&back, &x) < 1e-9);
    }

    #[test]
    fn empty_array_passes_through_unchanged() {
        let x = constant(&[0, 4], 0.0);
        assert_eq!(fftn(&x), x);
        assert_eq!(ifftn(&x), x);
    }

    #[test]
    fn single_element_array_is_a_fixed_point() {
        let x = constant(&[1, 1], 3.5);
        assert_eq!(fftn(&x), x);
        assert_eq!(ifftn(&x), x);
    }

    #[test]
    fn promote_widens_real_input() {
        let real = ArrayD::from_shape_fn(IxDyn(&[2, 3]), |idx| (idx[0] * 3 + idx[1]) as f64);
        let complex = promote(&real);
        assert_eq!(complex[[1, 2]], Complex64::new(5.0, 0.0));
        assert!(complex.iter().all(|v| v.im == 0.0));
    }
}
