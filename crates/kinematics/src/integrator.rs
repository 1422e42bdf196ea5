//! # Numerical Integration
//!
//! Explicit Euler integration of state vectors.

/// `state + derivative * dt`, element-wise.
#[must_use]
pub fn euler_step<const N: usize>(state: [f64; N], derivative: [f64; N], dt: f64) -> [f64; N] {
    let mut next = state;
    for (x, dx) in next.iter_mut().zip(derivative) {
        *x += dx * dt;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_derivative() {
        let next = euler_step([1.0, -2.0], [0.5, 4.0], 2.0);
        assert_eq!(next, [2.0, 6.0]);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let state = [3.0, 1.5, -0.25];
        assert_eq!(euler_step(state, [9.0, 9.0, 9.0], 0.0), state);
    }
}
