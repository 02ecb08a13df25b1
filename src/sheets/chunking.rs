//! Grouping cards into fixed-capacity sheet strips.
//!
//! Cards are taken in catalog order and split into consecutive groups of
//! `chunk_size`. The last group is topped up with the filler card so that every
//! strip comes out the same width. Nothing here touches pixels; the packer
//! turns the groups into images.

/// Number of groups needed for `count` cards.
pub fn group_count(count: usize, chunk_size: usize) -> usize {
    assert!(chunk_size > 0, "chunk size must be positive");
    count.div_ceil(chunk_size)
}

/// Split `items` into groups of exactly `chunk_size`, padding the last one
/// with copies of `filler`.
pub fn chunk_padded<T: Clone>(items: &[T], chunk_size: usize, filler: &T) -> Vec<Vec<T>> {
    assert!(chunk_size > 0, "chunk size must be positive");

    items
        .chunks(chunk_size)
        .map(|chunk| {
            let mut group = Vec::with_capacity(chunk_size);
            group.extend_from_slice(chunk);
            group.resize(chunk_size, filler.clone());
            group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Which group, and which slot within it, the card at `index` lands in.
    fn position_of(index: usize, chunk_size: usize) -> (usize, usize) {
        (index / chunk_size, index % chunk_size)
    }

    #[test]
    fn seven_cards_make_two_groups() {
        let cards: Vec<i32> = (0..7).collect();
        let groups = chunk_padded(&cards, 5, &-1);
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4], vec![5, 6, -1, -1, -1]]);
    }

    #[test]
    fn exact_chunk_has_no_filler() {
        let cards: Vec<i32> = (0..5).collect();
        let groups = chunk_padded(&cards, 5, &-1);
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn no_cards_no_groups() {
        let groups = chunk_padded::<i32>(&[], 5, &-1);
        assert!(groups.is_empty());
        assert_eq!(group_count(0, 5), 0);
    }

    #[test]
    #[should_panic(expected = "chunk size must be positive")]
    fn zero_chunk_size_panics() {
        chunk_padded(&[1, 2, 3], 0, &0);
    }

    proptest! {
        #[test]
        fn groups_are_full_and_ordered(n in 0usize..200, chunk_size in 1usize..12) {
            let cards: Vec<Option<usize>> = (0..n).map(Some).collect();
            let groups = chunk_padded(&cards, chunk_size, &None);

            prop_assert_eq!(groups.len(), group_count(n, chunk_size));
            prop_assert!(groups.iter().all(|g| g.len() == chunk_size));

            for i in 0..n {
                let (g, slot) = position_of(i, chunk_size);
                prop_assert_eq!(groups[g][slot], Some(i));
            }

            if let Some(last) = groups.last() {
                let real = last.iter().filter(|c| c.is_some()).count();
                let expected = if n % chunk_size == 0 { chunk_size } else { n % chunk_size };
                prop_assert_eq!(real, expected);
                prop_assert!(last[real..].iter().all(Option::is_none));
            }
        }
    }
}
