use std::fmt::Debug;

use cgmath::Point3;

use crate::{core::HalfedgeMesh, handle::VertexHandle};


/// Checks if the given code will trigger a panic. If it does, nothing happens
/// (except side effects of the given code). If no panic is caused by the given
/// code, this macro panics with a message.
macro_rules! assert_panic {
    ($($body:tt)*) => {{
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            $($body)*
        }));
        if let Ok(x) = res {
            panic!(
                "expected panic for '{}', but got '{:?}' ",
                stringify!($($body)*),
                x,
            );
        }
    }}
}

/// Macro version of `cmp_rotated` with nicer error message.
macro_rules! assert_rotated_eq {
    ($lhs:expr, $rhs:expr) => {{
        let lhs = $lhs;
        let rhs = $rhs;
        if let Err(rotated) = crate::test_utils::cmp_rotated(&lhs, &rhs) {
            panic!(
                "assert_rotated_eq failed:\n\
                    |  left: {:?} ({})\n\
                    | right: {:?} ({}, closest rotation: {:?})\n",
                lhs,
                stringify!($lhs),
                rhs,
                stringify!($rhs),
                rotated,
            );
        }
    }};
}

/// Compares `actual` and `expected`. This function checks if both slices are
/// equal when treating them like a "ring". This means that if we can rotate
/// one slice so that it equals the other slice, we consider them equal.
/// `[a, b, c, d]` and `[b, c, d, a]` and `[d, a, b, c]` are all equal.
///
/// If the slices are equal, `Ok(())` is returned. Otherwise, `Err(rotated)` is
/// returned, where `rotated` is `expected` but potentially rotated by some
/// amount.
pub(crate) fn cmp_rotated<T: Debug + PartialEq + Clone>(
    actual: &[T],
    expected: &[T],
) -> Result<(), Vec<T>> {
    let mut rotated = expected.to_vec();

    if actual.len() != expected.len() {
        return Err(rotated);
    }

    if !actual.is_empty() {
        // Find the rotate-offset
        let pos = match actual.iter().position(|e| e == &expected[0]) {
            Some(pos) => pos,
            None => return Err(rotated),
        };

        // Align by rotating back
        rotated.rotate_right(pos);

        if actual != &rotated[..] {
            return Err(rotated);
        }
    }

    Ok(())
}

/// Adds vertices at the given `(x, y)` positions in the `z = 0` plane.
pub(crate) fn add_planar_vertices(m: &mut HalfedgeMesh, positions: &[(f64, f64)]) -> Vec<VertexHandle> {
    positions.iter().map(|&(x, y)| m.add_vertex(Point3::new(x, y, 0.0))).collect()
}


#[test]
fn rotated_comparison() {
    assert!(cmp_rotated(&[1, 2, 3], &[1, 2, 3]).is_ok());
    assert!(cmp_rotated(&[2, 3, 1], &[1, 2, 3]).is_ok());
    assert!(cmp_rotated(&[3, 2, 1], &[1, 2, 3]).is_err());
    assert!(cmp_rotated(&[1, 2], &[1, 2, 3]).is_err());
    assert!(cmp_rotated::<u8>(&[], &[]).is_ok());
}
