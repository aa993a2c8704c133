/// Out-of-range index policy for neighborhood reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Repeat the edge pixel.
    #[default]
    Clamp,
    /// Mirror around the edge pixel without repeating it (`gfedcb|abcdefgh|gfedcba`).
    Reflect101,
}

/// Maps a possibly out-of-range index into `[0, len)`.
///
/// Returns `None` only for an empty axis.
pub fn map_index(i: isize, len: usize, mode: BorderMode) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        BorderMode::Clamp => {
            if i < 0 {
                Some(0)
            } else {
                Some((i as usize).min(len - 1))
            }
        }
        BorderMode::Reflect101 => {
            if len == 1 {
                return Some(0);
            }

            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len { Some(r) } else { Some((2 * len - 2) - r) }
        }
    }
}

/// Indices of the left and right neighbors of `i` on an axis of length `len`.
///
/// `i` must be in `[0, len)`.
#[inline]
pub fn neighbor_pair(i: usize, len: usize, mode: BorderMode) -> (usize, usize) {
    debug_assert!(i < len);
    let prev = map_index(i as isize - 1, len, mode).unwrap_or(i);
    let next = map_index(i as isize + 1, len, mode).unwrap_or(i);
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index, neighbor_pair};

    #[test]
    fn clamp_mapping_handles_negative_and_overflow() {
        let mode = BorderMode::Clamp;

        assert_eq!(map_index(-3, 5, mode), Some(0));
        assert_eq!(map_index(0, 5, mode), Some(0));
        assert_eq!(map_index(4, 5, mode), Some(4));
        assert_eq!(map_index(99, 5, mode), Some(4));
        assert_eq!(map_index(0, 0, mode), None);
    }

    #[test]
    fn reflect101_len1_len2_len5() {
        let mode = BorderMode::Reflect101;

        for i in -8..=8 {
            assert_eq!(map_index(i, 1, mode), Some(0));
        }

        let expected_len2 = [0, 1, 0, 1, 0, 1, 0, 1, 0];
        for (offset, expected) in (-4..=4).zip(expected_len2) {
            assert_eq!(map_index(offset, 2, mode), Some(expected));
        }

        let cases_len5 = [(-5, 3), (-2, 2), (-1, 1), (0, 0), (4, 4), (5, 3), (7, 1)];
        for (i, expected) in cases_len5 {
            assert_eq!(map_index(i, 5, mode), Some(expected));
        }
    }

    #[test]
    fn neighbor_pair_at_edges() {
        assert_eq!(neighbor_pair(0, 4, BorderMode::Reflect101), (1, 1));
        assert_eq!(neighbor_pair(3, 4, BorderMode::Reflect101), (2, 2));
        assert_eq!(neighbor_pair(0, 4, BorderMode::Clamp), (0, 1));
        assert_eq!(neighbor_pair(2, 4, BorderMode::Clamp), (1, 3));
        assert_eq!(neighbor_pair(0, 1, BorderMode::Reflect101), (0, 0));
    }
}
