//! Pareto dominance over (time, energy) costs.
//!
//! Both objectives are minimised. The filter is the plain pairwise check:
//! every candidate is compared against every other point of the *original*
//! input, so the result never depends on which points were dropped first,
//! and points with identical costs never knock each other out.

// ---------------------------------------------------------------------------
// CostPoint – one solution's objective values
// ---------------------------------------------------------------------------

/// A pair of objective values, both to be minimised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPoint {
    pub time: f64,
    pub energy: f64,
}

impl CostPoint {
    pub const fn new(time: f64, energy: f64) -> Self {
        Self { time, energy }
    }
}

impl From<(f64, f64)> for CostPoint {
    fn from((time, energy): (f64, f64)) -> Self {
        Self { time, energy }
    }
}

/// Anything that can be placed in objective space.
pub trait Costed {
    fn cost(&self) -> CostPoint;
}

impl Costed for CostPoint {
    fn cost(&self) -> CostPoint {
        *self
    }
}

impl<T: Costed + ?Sized> Costed for &T {
    fn cost(&self) -> CostPoint {
        (**self).cost()
    }
}

// ---------------------------------------------------------------------------
// Dominance
// ---------------------------------------------------------------------------

/// `a` dominates `b` when it is no worse in both objectives and strictly
/// better in at least one.
#[inline]
pub fn dominates(a: CostPoint, b: CostPoint) -> bool {
    (a.time <= b.time && a.energy <= b.energy) && (a.time < b.time || a.energy < b.energy)
}

/// Positions of the non-dominated items, ascending.
pub fn front_indices<T: Costed>(items: &[T]) -> Vec<usize> {
    let costs: Vec<CostPoint> = items.iter().map(Costed::cost).collect();

    (0..costs.len())
        .filter(|&i| {
            let candidate = costs[i];
            // An equal point never dominates, so comparing against itself is harmless.
            !costs.iter().any(|&other| dominates(other, candidate))
        })
        .collect()
}

/// Keep the items no other item dominates, in their original order.
pub fn filter<T: Costed + Clone>(items: &[T]) -> Vec<T> {
    front_indices(items)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn points(raw: &[(f64, f64)]) -> Vec<CostPoint> {
        raw.iter().copied().map(CostPoint::from).collect()
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<CostPoint> = Vec::new();
        assert!(filter(&empty).is_empty());
        assert!(front_indices(&empty).is_empty());
    }

    #[test]
    fn test_single_point() {
        let set = points(&[(7.0, 3.0)]);
        assert_eq!(filter(&set), set);
    }

    #[test]
    fn test_identical_points_are_all_kept() {
        let set = points(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(filter(&set), set);
    }

    #[test]
    fn test_trade_off_chain_is_kept() {
        let set = points(&[(1.0, 5.0), (2.0, 4.0), (3.0, 3.0), (4.0, 2.0), (5.0, 1.0)]);
        assert_eq!(filter(&set), set);
    }

    #[test]
    fn test_clear_domination() {
        let set = points(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(filter(&set), points(&[(1.0, 1.0)]));
    }

    #[test]
    fn test_mixed_set() {
        let set = points(&[(1.0, 5.0), (2.0, 4.0), (5.0, 5.0), (3.0, 3.0), (4.0, 2.0), (1.0, 1.0)]);
        assert_eq!(filter(&set), points(&[(1.0, 1.0)]));
        assert_eq!(front_indices(&set), vec![5]);
    }

    #[test]
    fn test_weak_domination_on_one_axis() {
        // Same time, lower energy still dominates.
        let set = points(&[(2.0, 3.0), (2.0, 1.0), (4.0, 1.0)]);
        assert_eq!(filter(&set), points(&[(2.0, 1.0)]));
    }

    #[test]
    fn test_duplicates_on_the_front_survive_together() {
        let set = points(&[(3.0, 1.0), (1.0, 3.0), (3.0, 1.0), (4.0, 4.0)]);
        assert_eq!(front_indices(&set), vec![0, 1, 2]);
    }

    #[test]
    fn test_dominates_relation() {
        let a = CostPoint::new(1.0, 2.0);
        assert!(dominates(a, CostPoint::new(1.0, 3.0)));
        assert!(dominates(a, CostPoint::new(2.0, 2.0)));
        assert!(!dominates(a, a));
        assert!(!dominates(a, CostPoint::new(0.5, 3.0)));
        assert!(!dominates(CostPoint::new(2.0, 2.0), a));
    }

    fn sample() -> Vec<CostPoint> {
        points(&[
            (10.0, 80.0),
            (12.0, 70.0),
            (12.0, 70.0),
            (15.0, 75.0),
            (20.0, 40.0),
            (22.0, 40.0),
            (30.0, 35.0),
            (31.0, 90.0),
            (9.0, 95.0),
            (25.0, 38.0),
        ])
    }

    #[test]
    fn test_idempotent() {
        let once = filter(&sample());
        assert_eq!(filter(&once), once);
    }

    #[test]
    fn test_output_is_ordered_subsequence() {
        let set = sample();
        let kept = front_indices(&set);
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(kept, vec![0, 1, 2, 4, 6, 8, 9]);
    }

    #[test]
    fn test_invariant_to_input_order() {
        fn sorted(mut v: Vec<CostPoint>) -> Vec<CostPoint> {
            v.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.energy.total_cmp(&b.energy)));
            v
        }

        let set = sample();
        let expected = sorted(filter(&set));

        let mut reversed = set.clone();
        reversed.reverse();
        assert_eq!(sorted(filter(&reversed)), expected);

        for shift in 1..set.len() {
            let mut rotated = set.clone();
            rotated.rotate_left(shift);
            assert_eq!(sorted(filter(&rotated)), expected);
        }
    }

    #[test]
    fn test_filter_keeps_references() {
        let set = sample();
        let refs: Vec<&CostPoint> = set.iter().collect();
        let kept = filter(&refs);
        assert_eq!(kept.len(), 7);
        assert!(std::ptr::eq(kept[0], &set[0]));
    }
}
