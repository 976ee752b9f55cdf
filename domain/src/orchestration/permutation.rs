//! Orderings of a small id set.
//!
//! The refine round explores every order in which an agent could read its
//! chosen peers' chunks, so the work grows as `n!` in the number of peers.
//! `n` is bounded by the council size: 5 peers give 120 orderings, 8 give
//! 40 320. Large councils should cap how many peers an agent may follow.

/// All orderings of `items`, in lexicographic order of input positions.
///
/// ```
/// use docquorum_domain::orchestration::permutations;
///
/// assert_eq!(
///     permutations(&[1, 2, 3]),
///     vec![
///         vec![1, 2, 3], vec![1, 3, 2],
///         vec![2, 1, 3], vec![2, 3, 1],
///         vec![3, 1, 2], vec![3, 2, 1],
///     ]
/// );
/// ```
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }

    let mut result = Vec::new();
    for (i, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}
