use super::Aggregator;

macro_rules! min_impl {
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
                <$type>::min(a, b)
            }
        }
    };
}

min_impl!(I32MinAggregator, i32, i32::MAX);
min_impl!(I64MinAggregator, i64, i64::MAX);
min_impl!(U32MinAggregator, u32, u32::MAX);
min_impl!(U64MinAggregator, u64, u64::MAX);
min_impl!(F32MinAggregator, f32, f32::INFINITY);
min_impl!(F64MinAggregator, f64, f64::INFINITY);
