//! Chirality repair: localise and heuristically fix transcription damage
//! using the position-parity structure of the display alphabets.
//!
//! Every parsed character carries a chirality tag (0 or 1) taken from the
//! alphabet set it was found in. A correctly transcribed code satisfies
//! `chirality[i] == i & 1`, so insertions, deletions and adjacent
//! transpositions show up as parity breaks that can be located and
//! patched before the Reed-Solomon decoder sees the stream.
//!
//! The repairs are deliberately heuristic. The only guarantee is that
//! the pass loop terminates within `expected_len` rounds and hands back
//! a stream of the expected length whenever that is achievable, not that
//! every recovery succeeds; anything mis-patched is left for
//! Reed-Solomon to correct or reject.

use tracing::trace;

use crate::buffer::SymbolBuffer;

/// Outcome of a single repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// No further passes are useful.
    Done,
    /// A change was made; run another pass.
    Retry,
}

/// First position whose chirality tag does not match its position parity.
pub fn first_error(chirality: &SymbolBuffer) -> Option<usize> {
    (0..chirality.len()).find(|&p| chirality.get(p) != (p & 1) as u8)
}

/// Run one repair pass over the parsed stream. Callers loop until `Done`
/// or until `expected_len` passes have run.
pub fn repair(
    expected_len: usize,
    codes: &mut SymbolBuffer,
    chirality: &mut SymbolBuffer,
) -> Repair {
    if codes.len() != chirality.len() {
        // Inconsistent parse state; leave it for RS to reject cleanly.
        return Repair::Done;
    }

    let current_len = codes.len();
    let min_len = (2 * expected_len) / 3;
    if current_len < min_len {
        // Too much missing to recover accurately.
        return Repair::Done;
    }

    let first_err = first_error(chirality);
    if current_len == expected_len && first_err.is_none() {
        return Repair::Done;
    }

    // Shorter than expected: guess where a deletion occurred and insert
    // a zero placeholder with the parity the stream needs.
    if current_len < expected_len {
        match first_err {
            None => {
                // Every tag checks out, so the loss is at the tail.
                let chi = (current_len & 1) as u8;
                let end_chi = (expected_len & 1) as u8;
                let diff = expected_len - current_len;
                if diff == 1 && chi == end_chi {
                    // Off by one with a matching tail parity: appending
                    // would plant a wrong tag, so the loss was up front.
                    trace!("prepending placeholder for a leading deletion");
                    codes.push_front(0);
                    chirality.push_front(0);
                } else {
                    trace!(chi, "appending placeholder at tail");
                    codes.push(0);
                    chirality.push(chi);
                }
            }
            Some(pos) => {
                let chi = (pos & 1) as u8;
                let chi_next = ((pos + 1) & 1) as u8;
                let chi_after = ((pos + 2) & 1) as u8;

                // Two wrong tags followed by a correct one is an adjacent
                // transpose, not the first deletion.
                if pos + 3 < current_len
                    && chirality.get(pos) != chi
                    && chirality.get(pos + 1) != chi_next
                    && chirality.get(pos + 2) == chi_after
                {
                    trace!(pos, "swapping transposed pair");
                    codes.swap(pos, pos + 1);
                    chirality.swap(pos, pos + 1);
                    return Repair::Retry;
                }

                trace!(pos, "inserting placeholder at inferred deletion");
                codes.insert_at(pos, 0);
                chirality.insert_at(pos, chi);
            }
        }
        return Repair::Retry;
    }

    // Longer than expected: guess where the surplus is and delete it.
    if current_len > expected_len {
        // A bad tail tag goes first (a duplicated last character).
        let expected_last_chi = ((1 + expected_len) & 1) as u8;
        if chirality.get(current_len - 1) != expected_last_chi {
            trace!("dropping surplus tail symbol");
            codes.pop();
            chirality.pop();
            return Repair::Retry;
        }

        let pos = first_err.unwrap_or(current_len - 1);
        trace!(pos, "deleting surplus symbol");
        codes.delete_at(pos);
        chirality.delete_at(pos);
        return Repair::Retry;
    }

    // Correct length but a parity break remains: probably a transpose.
    let pos = match first_err {
        Some(pos) if pos < expected_len - 1 => pos,
        _ => return Repair::Done,
    };

    if chirality.get(pos) == chirality.get(pos + 1) {
        // A swap cannot fix matching tags. Either the code is wrong or
        // there were stacked insertions and deletions; flip the tag so
        // later passes can look past this position.
        trace!(pos, "flipping unresolvable chirality tag");
        chirality.set(pos, 1 - chirality.get(pos));
        return Repair::Retry;
    }

    trace!(pos, "swapping transposed pair");
    codes.swap(pos, pos + 1);
    chirality.swap(pos, pos + 1);
    Repair::Retry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers(codes: &[u8], chirality: &[u8]) -> (SymbolBuffer, SymbolBuffer) {
        (
            SymbolBuffer::from_symbols(codes),
            SymbolBuffer::from_symbols(chirality),
        )
    }

    fn run_to_done(expected_len: usize, codes: &mut SymbolBuffer, chirality: &mut SymbolBuffer) {
        for _ in 0..expected_len {
            if repair(expected_len, codes, chirality) == Repair::Done {
                return;
            }
        }
    }

    #[test]
    fn test_clean_stream_is_done() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 4], &[0, 1, 0, 1]);
        assert_eq!(repair(4, &mut codes, &mut chirality), Repair::Done);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_length_mismatch_between_buffers_is_done() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3], &[0, 1]);
        assert_eq!(repair(4, &mut codes, &mut chirality), Repair::Done);
    }

    #[test]
    fn test_too_short_to_recover_is_done() {
        let (mut codes, mut chirality) = buffers(&[1, 2], &[0, 1]);
        assert_eq!(repair(12, &mut codes, &mut chirality), Repair::Done);
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn test_adjacent_transpose_at_correct_length() {
        let (mut codes, mut chirality) = buffers(&[2, 1, 3, 4], &[1, 0, 0, 1]);
        run_to_done(4, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(chirality.as_slice(), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_every_pair_transposed() {
        let (mut codes, mut chirality) =
            buffers(&[2, 1, 4, 3, 6, 5], &[1, 0, 1, 0, 1, 0]);
        run_to_done(6, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_mid_stream_deletion_gets_placeholder() {
        // symbol at position 2 deleted: tags run 0,1,1,0 afterwards
        let (mut codes, mut chirality) = buffers(&[1, 2, 4, 5, 6], &[0, 1, 1, 0, 1]);
        run_to_done(6, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 0, 4, 5, 6]);
        assert_eq!(chirality.as_slice(), &[0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_tail_deletion_gets_appended_placeholder() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 4, 5], &[0, 1, 0, 1, 0]);
        run_to_done(6, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4, 5, 0]);
        assert_eq!(chirality.as_slice(), &[0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_leading_deletion_gets_placeholder_at_break() {
        // first symbol deleted: every tag is off by one position
        let (mut codes, mut chirality) = buffers(&[2, 3, 4], &[1, 0, 1]);
        run_to_done(4, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[0, 2, 3, 4]);
        assert_eq!(chirality.as_slice(), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_transpose_while_short_is_swapped_not_padded() {
        // One deletion at the tail plus a transpose at the front; the
        // front pair must be swapped before the placeholder lands.
        let (mut codes, mut chirality) =
            buffers(&[2, 1, 3, 4, 5, 6, 7], &[1, 0, 0, 1, 0, 1, 0]);
        run_to_done(8, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_duplicated_tail_is_dropped() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 4, 4], &[0, 1, 0, 1, 1]);
        run_to_done(4, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_mid_stream_duplicate_is_deleted() {
        // duplicated symbol at position 2 breaks parity from there on
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 3, 4], &[0, 1, 0, 0, 1]);
        run_to_done(4, &mut codes, &mut chirality);
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(chirality.as_slice(), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_matching_tags_flip_instead_of_swap() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 4], &[1, 1, 0, 1]);
        assert_eq!(repair(4, &mut codes, &mut chirality), Repair::Retry);
        // values untouched, only the tag flipped
        assert_eq!(codes.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(chirality.get(0), 0);
    }

    #[test]
    fn test_trailing_error_at_last_position_is_done() {
        let (mut codes, mut chirality) = buffers(&[1, 2, 3, 4], &[0, 1, 0, 0]);
        assert_eq!(repair(4, &mut codes, &mut chirality), Repair::Done);
    }

    #[test]
    fn test_pass_budget_always_terminates() {
        let (mut codes, mut chirality) =
            buffers(&[5, 5, 5, 5, 5, 5], &[1, 1, 1, 1, 1, 1]);
        for _ in 0..8 {
            if repair(8, &mut codes, &mut chirality) == Repair::Done {
                break;
            }
        }
        assert_eq!(codes.len(), chirality.len());
    }
}
