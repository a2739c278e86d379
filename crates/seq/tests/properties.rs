//! Fast paths must agree with full enumeration.

use futures::executor::block_on;
use proptest::prelude::*;
use xeno_seq::{
	AsyncSequence, BoxCursor, CancellationToken, Error, ListSequence, Window, count, count_if_cheap, last_or_default, long_count,
	sequence_equal, sum, to_lookup,
};

/// Hides every capability of the wrapped source.
struct Opaque<S>(S);

impl<S: AsyncSequence> AsyncSequence for Opaque<S> {
	type Item = S::Item;

	fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, S::Item> {
		self.0.open(cancel)
	}
}

fn opaque(items: &[i32]) -> Opaque<ListSequence<i32>> {
	Opaque(ListSequence::new(items.to_vec()))
}

proptest! {
	#[test]
	fn count_agrees_across_capabilities(items in prop::collection::vec(any::<i32>(), 0..64)) {
		let cancel = CancellationToken::new();
		let list = ListSequence::new(items.clone());
		prop_assert_eq!(block_on(count(&list, &cancel)).unwrap(), items.len());
		prop_assert_eq!(block_on(count(&opaque(&items), &cancel)).unwrap(), items.len());
		prop_assert_eq!(block_on(long_count(&opaque(&items), &cancel)).unwrap(), items.len() as u64);
		prop_assert_eq!(block_on(count_if_cheap(&opaque(&items), &cancel)).unwrap(), None);
	}

	#[test]
	fn window_matches_skip_take(items in prop::collection::vec(any::<i32>(), 0..32), skip in 0usize..40, take in 0usize..40) {
		let cancel = CancellationToken::new();
		let expected: Vec<i32> = items.iter().copied().skip(skip).take(take).collect();
		let window = Window::new(items.clone()).skip(skip).take(take);

		prop_assert_eq!(block_on(count(&window, &cancel)).unwrap(), expected.len());
		prop_assert_eq!(block_on(last_or_default(&window, &cancel)).unwrap(), expected.last().copied().unwrap_or_default());
		prop_assert!(block_on(sequence_equal(&window, &ListSequence::new(expected), &cancel)).unwrap());
	}

	#[test]
	fn last_agrees_across_capabilities(items in prop::collection::vec(any::<i32>(), 0..32)) {
		let cancel = CancellationToken::new();
		let expected = items.last().copied().unwrap_or_default();
		prop_assert_eq!(block_on(last_or_default(&ListSequence::new(items.clone()), &cancel)).unwrap(), expected);
		prop_assert_eq!(block_on(last_or_default(&opaque(&items), &cancel)).unwrap(), expected);
	}

	#[test]
	fn sequence_equal_matches_vec_equality(
		left in prop::collection::vec(0i32..3, 0..8),
		right in prop::collection::vec(0i32..3, 0..8),
	) {
		let cancel = CancellationToken::new();
		let expected = left == right;
		let indexed = block_on(sequence_equal(&ListSequence::new(left.clone()), &ListSequence::new(right.clone()), &cancel)).unwrap();
		let walked = block_on(sequence_equal(&opaque(&left), &opaque(&right), &cancel)).unwrap();
		let mixed = block_on(sequence_equal(&ListSequence::new(left.clone()), &opaque(&right), &cancel)).unwrap();
		prop_assert_eq!(indexed, expected);
		prop_assert_eq!(walked, expected);
		prop_assert_eq!(mixed, expected);
	}

	#[test]
	fn narrow_sum_overflows_exactly_when_wide_sum_leaves_range(items in prop::collection::vec(any::<i32>(), 0..16)) {
		let cancel = CancellationToken::new();
		let list = ListSequence::new(items.clone());
		let narrow = block_on(sum(&list, &cancel));

		let mut running = Some(0i32);
		for item in &items {
			running = running.and_then(|total| total.checked_add(*item));
		}
		match running {
			Some(total) => prop_assert_eq!(narrow.unwrap(), total),
			None => prop_assert!(matches!(narrow, Err(Error::Overflow { domain: "i32" })), "expected i32 overflow, got {:?}", narrow),
		}

		let wide = block_on(sum(&ListSequence::new(items.iter().map(|x| i64::from(*x)).collect::<Vec<_>>()), &cancel)).unwrap();
		prop_assert_eq!(wide, items.iter().map(|x| i64::from(*x)).sum::<i64>());
	}

	#[test]
	fn lookup_partitions_source_in_first_seen_order(items in prop::collection::vec(0u8..20, 0..64)) {
		let cancel = CancellationToken::new();
		let lookup = block_on(to_lookup(&opaque(&items.iter().map(|x| i32::from(*x)).collect::<Vec<_>>()), |x| x % 5, &cancel)).unwrap();

		let mut first_seen = Vec::new();
		for item in &items {
			let key = i32::from(*item) % 5;
			if !first_seen.contains(&key) {
				first_seen.push(key);
			}
		}
		prop_assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), first_seen);

		let mut total = 0;
		for group in &lookup {
			let expected: Vec<i32> = items.iter().map(|x| i32::from(*x)).filter(|x| x % 5 == *group.key()).collect();
			prop_assert_eq!(group.elements(), expected.as_slice());
			total += group.elements().len();
		}
		prop_assert_eq!(total, items.len());
	}
}
