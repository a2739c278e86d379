//! Numeric domains for accumulation.

/// A numeric domain with an additive identity and domain-native overflow behavior.
///
/// Integral domains (and `Decimal`) return `None` when a sum leaves the representable range.
/// Binary floating point never fails; out-of-range sums become infinities.
pub trait Summand: Copy + Send + 'static {
	/// Additive identity.
	const ZERO: Self;
	/// Increment used by counting accumulators.
	const ONE: Self;
	/// Domain name reported by [`Error::Overflow`](crate::Error::Overflow).
	const DOMAIN: &'static str;

	/// Adds `rhs`, or `None` on overflow.
	fn checked_sum(self, rhs: Self) -> Option<Self>;
}

/// An element that can be folded into a [`Summand`] accumulator.
///
/// Implemented for every summand `N` and its nullable form `Option<N>`, where an absent value
/// contributes zero.
pub trait SumValue: Copy + Send {
	/// Accumulator domain.
	type Sum: Summand;

	/// Value contributed to the running sum.
	fn into_summand(self) -> Self::Sum;
}

macro_rules! sum_values {
	($($ty:ty),* $(,)?) => {$(
		impl SumValue for $ty {
			type Sum = $ty;

			#[inline]
			fn into_summand(self) -> $ty {
				self
			}
		}

		impl SumValue for Option<$ty> {
			type Sum = $ty;

			#[inline]
			fn into_summand(self) -> $ty {
				self.unwrap_or(<$ty as Summand>::ZERO)
			}
		}
	)*};
}

macro_rules! checked_summands {
	($($ty:ident),* $(,)?) => {$(
		impl Summand for $ty {
			const ZERO: Self = 0;
			const ONE: Self = 1;
			const DOMAIN: &'static str = stringify!($ty);

			#[inline]
			fn checked_sum(self, rhs: Self) -> Option<Self> {
				self.checked_add(rhs)
			}
		}

		sum_values!($ty);
	)*};
}

macro_rules! float_summands {
	($($ty:ident),* $(,)?) => {$(
		impl Summand for $ty {
			const ZERO: Self = 0.0;
			const ONE: Self = 1.0;
			const DOMAIN: &'static str = stringify!($ty);

			#[inline]
			fn checked_sum(self, rhs: Self) -> Option<Self> {
				Some(self + rhs)
			}
		}

		sum_values!($ty);
	)*};
}

checked_summands!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_summands!(f32, f64);

#[cfg(feature = "decimal")]
impl Summand for rust_decimal::Decimal {
	const ZERO: Self = rust_decimal::Decimal::ZERO;
	const ONE: Self = rust_decimal::Decimal::ONE;
	const DOMAIN: &'static str = "decimal";

	#[inline]
	fn checked_sum(self, rhs: Self) -> Option<Self> {
		self.checked_add(rhs)
	}
}

#[cfg(feature = "decimal")]
sum_values!(rust_decimal::Decimal);
