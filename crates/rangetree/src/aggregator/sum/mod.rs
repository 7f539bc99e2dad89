use super::{Aggregator, RangeSumAggregator};

// Signed integers and floats use plain arithmetic, so an overflowing sum panics in debug
// builds. Unsigned integers wrap: an assign that lowers a sum produces a diff below zero,
// which only lands on the right total under modular arithmetic.
macro_rules! sum_impl {
    ($struct:tt, $type:ty) => {
        #[derive(Default, Debug, Clone, Copy)]
        #[allow(missing_docs)]
        pub struct $struct;

        impl Aggregator for $struct {
            const IDENTITY: Self::PartialAggregate = 0 as $type;

            type PartialAggregate = $type;

            #[inline]
            fn combine(
                a: Self::PartialAggregate,
                b: Self::PartialAggregate,
            ) -> Self::PartialAggregate {
                a + b
            }
        }

        impl RangeSumAggregator for $struct {
            #[inline]
            fn scale(value: Self::PartialAggregate, len: usize) -> Self::PartialAggregate {
                value * (len as $type)
            }

            #[inline]
            fn inverse(
                a: Self::PartialAggregate,
                b: Self::PartialAggregate,
            ) -> Self::PartialAggregate {
                a - b
            }
        }
    };
}

macro_rules! wrapping_sum_impl {
    ($struct:tt, $type:ty) => {
        #[derive(Default, Debug, Clone, Copy)]
        #[allow(missing_docs)]
        pub struct $struct;

        impl Aggregator for $struct {
            const IDENTITY: Self::PartialAggregate = 0;

            type PartialAggregate = $type;

            #[inline]
            fn combine(
                a: Self::PartialAggregate,
                b: Self::PartialAggregate,
            ) -> Self::PartialAggregate {
                a.wrapping_add(b)
            }
        }

        impl RangeSumAggregator for $struct {
            #[inline]
            fn scale(value: Self::PartialAggregate, len: usize) -> Self::PartialAggregate {
                value.wrapping_mul(len as $type)
            }

            #[inline]
            fn inverse(
                a: Self::PartialAggregate,
                b: Self::PartialAggregate,
            ) -> Self::PartialAggregate {
                a.wrapping_sub(b)
            }
        }
    };
}

sum_impl!(I32SumAggregator, i32);
sum_impl!(I64SumAggregator, i64);
sum_impl!(I128SumAggregator, i128);
sum_impl!(F32SumAggregator, f32);
sum_impl!(F64SumAggregator, f64);

wrapping_sum_impl!(U32SumAggregator, u32);
wrapping_sum_impl!(U64SumAggregator, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_sum() {
        assert_eq!(I64SumAggregator::combine(4, -6), -2);
        assert_eq!(I64SumAggregator::scale(3, 5), 15);
        assert_eq!(I64SumAggregator::inverse(3, 5), -2);
        assert_eq!(I32SumAggregator::combine_slice(&[1, 2, 3, 4]), 10);
    }

    #[test]
    fn unsigned_sum_wraps_negative_diff() {
        let diff = U32SumAggregator::inverse(3, 10);
        assert_eq!(U32SumAggregator::combine(10, diff), 3);
        assert_eq!(U64SumAggregator::scale(7, 3), 21);
    }

    #[test]
    fn float_sum() {
        assert_eq!(F64SumAggregator::scale(0.5, 4), 2.0);
        assert_eq!(F32SumAggregator::combine_slice(&[]), 0.0);
    }
}
