use proptest::prelude::*;

use crate::configuration::Direction;
use crate::twiddle::{create_twiddle, two_n_offset};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}

proptest! {
    #[test]
    fn twiddles_lie_on_unit_circle(
        factors in prop::collection::vec(2usize..9, 2..4),
        direction in direction(),
        have_2n in any::<bool>(),
    ) {
        let n: usize = factors.iter().product();
        let table = create_twiddle(direction, &factors, have_2n);
        prop_assert_eq!(table.len(), two_n_offset(&factors) + if have_2n { n } else { 0 });
        for tw in &table {
            prop_assert!((tw.norm() - 1.0).abs() < 1e-12, "{:?}", tw);
        }
    }

    #[test]
    fn directions_are_conjugate(factors in prop::collection::vec(2usize..9, 2..4)) {
        let forward = create_twiddle(Direction::Forward, &factors, false);
        let backward = create_twiddle(Direction::Backward, &factors, false);
        for (f, b) in forward.iter().zip(&backward) {
            let c = b.conj();
            prop_assert!((f.re - c.re).abs() < 1e-12 && (f.im - c.im).abs() < 1e-12);
        }
    }
}
