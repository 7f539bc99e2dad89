use core::fmt::Debug;

/// Incremental MAX aggregation
pub mod max;
/// Incremental MIN aggregation
pub mod min;
/// Incremental SUM aggregation
pub mod sum;

/// Aggregation interface that the trees in this crate are generic over
///
/// rangetree provides a bunch of pre-defined aggregator implementations including:
/// - [sum]
/// - [min]
/// - [max]
///
/// # Example
///
/// Here is a simple example showing how to create a SUM aggregator using u16.
/// ```
/// use rangetree::Aggregator;
///
/// #[derive(Default, Debug, Clone, Copy)]
/// struct MySumAggregator;
///
/// impl Aggregator for MySumAggregator {
///     const IDENTITY: Self::PartialAggregate = 0u16;
///     type PartialAggregate = u16;
///
///     fn combine(a: Self::PartialAggregate, b: Self::PartialAggregate) -> Self::PartialAggregate {
///        a + b
///     }
/// }
/// ```
pub trait Aggregator: Default + Debug + Clone + Copy + 'static {
    /// Identity value for [Self::PartialAggregate].
    ///
    /// For example, for SUM types the identity value should be set to 0.
    const IDENTITY: Self::PartialAggregate;

    /// The value type stored in every tree node.
    type PartialAggregate: PartialAggregateType;

    /// Combine two partial aggregates and produces a new [Self::PartialAggregate].
    ///
    /// Must be associative.
    fn combine(a: Self::PartialAggregate, b: Self::PartialAggregate) -> Self::PartialAggregate;

    /// Combines a slice of partial aggregates into a single partial aggregate
    #[inline]
    fn combine_slice(slice: &[Self::PartialAggregate]) -> Self::PartialAggregate {
        slice.iter().copied().fold(Self::IDENTITY, Self::combine)
    }
}

/// An [Aggregator] whose combine is a sum, which makes range-add and range-assign expressible
///
/// Required by [LazySegmentTree](crate::LazySegmentTree). The lazy tree needs to turn a
/// per-element value into the aggregate of `len` such elements, and to compute the signed
/// change between two aggregates.
pub trait RangeSumAggregator: Aggregator {
    /// Returns the aggregate of `len` elements that all equal `value`
    fn scale(value: Self::PartialAggregate, len: usize) -> Self::PartialAggregate;

    /// Returns `a - b`, the change that turns `b` into `a` when combined
    fn inverse(a: Self::PartialAggregate, b: Self::PartialAggregate) -> Self::PartialAggregate;
}

/// Trait bounds for a partial aggregate type
#[cfg(not(feature = "serde"))]
pub trait PartialAggregateBounds: Default + Debug + Clone + Copy + PartialEq + Send {}

/// Trait bounds for a partial aggregate type
#[cfg(feature = "serde")]
pub trait PartialAggregateBounds:
    Default
    + Debug
    + Clone
    + Copy
    + PartialEq
    + Send
    + serde::Serialize
    + for<'a> serde::Deserialize<'a>
{
}

#[cfg(not(feature = "serde"))]
impl<T> PartialAggregateBounds for T where T: Default + Debug + Clone + Copy + PartialEq + Send {}

#[cfg(feature = "serde")]
impl<T> PartialAggregateBounds for T where
    T: Default
        + Debug
        + Clone
        + Copy
        + PartialEq
        + Send
        + serde::Serialize
        + for<'a> serde::Deserialize<'a>
{
}

/// A value type that can be stored in a tree node
pub trait PartialAggregateType: PartialAggregateBounds {}

macro_rules! primitive_partial {
    ($type:ty) => {
        impl PartialAggregateType for $type {}
    };
}

primitive_partial!(u8);
primitive_partial!(u16);
primitive_partial!(u32);
primitive_partial!(u64);
primitive_partial!(u128);
primitive_partial!(i8);
primitive_partial!(i16);
primitive_partial!(i32);
primitive_partial!(i64);
primitive_partial!(i128);
primitive_partial!(f32);
primitive_partial!(f64);
