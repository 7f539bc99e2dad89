use super::Aggregator;

macro_rules! max_impl {
    ($struct:tt, $type:ty, $identity:expr) => {
        #[derive(Default, Debug, Clone, Copy)]
        #[allow(missing_docs)]
        pub struct $struct;

        impl Aggregator for $struct {
            const IDENTITY: Self::PartialAggregate = $identity;

            type PartialAggregate = $type;

            #[inline]
            fn combine(
                a: Self::PartialAggregate,
                b: Self::PartialAggregate,
            ) -> Self::PartialAggregate {
                <$type>::max(a, b)
            }
        }
    };
}

max_impl!(I32MaxAggregator, i32, i32::MIN);
max_impl!(I64MaxAggregator, i64, i64::MIN);
max_impl!(U32MaxAggregator, u32, u32::MIN);
max_impl!(U64MaxAggregator, u64, u64::MIN);
max_impl!(F32MaxAggregator, f32, f32::NEG_INFINITY);
max_impl!(F64MaxAggregator, f64, f64::NEG_INFINITY);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_identity() {
        assert_eq!(I32MaxAggregator::combine_slice(&[5, -3, 8]), 8);
        assert_eq!(I64MaxAggregator::combine_slice(&[]), i64::MIN);
        assert_eq!(F32MaxAggregator::combine(1.5, 0.5), 1.5);
    }
}
