//! Display codec: render symbols in position-parity alphabets and parse
//! noisy human input back into a symbol stream.
//!
//! Odd and even code positions draw from disjoint character sets, so a
//! parsed character reveals which parity it was written for. The sets
//! avoid the worst confusion pairs, and the parser maps the remaining
//! ones (O/0, L/1, I/1, U/V) back before lookup.

use crate::buffer::SymbolBuffer;
use crate::chirality::{self, Repair};
use crate::Error;

/// Characters for the first, third, fifth... code positions.
const ODD_SET: [char; 17] = [
    '0', '1', '2', '3', '6', '7', '8', '9', 'b', 'G', 'J', 'N', 'q', 'X', 'Y', 'Z', '~',
];

/// Characters for the second, fourth, sixth... code positions.
const EVEN_SET: [char; 17] = [
    '4', '5', 'A', 'C', 'D', 'E', 'F', 'H', 'K', 'M', 'P', 'R', 's', 'T', 'V', 'W', '~',
];

/// Characters likely to be typed as grouping noise; skipped on input.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '_' | '+' | '*' | '#')
}

/// Map anticipated transcription mistakes to their intended characters.
fn correction(c: char) -> char {
    match c {
        'O' => '0',
        'L' | 'I' => '1',
        'U' => 'V',
        _ => c,
    }
}

/// Fold a few letters to lower case to keep them distinct from digits
/// (B/8, Q/0, S/5).
fn case_changes(c: char) -> char {
    match c {
        'B' => 'b',
        'Q' => 'q',
        'S' => 's',
        _ => c,
    }
}

fn index_of(set: &[char; 17], target: char) -> Option<usize> {
    set.iter().position(|&c| c == target)
}

/// Display character for a symbol at a given code position. Out-of-range
/// symbols render as the reserved overflow marker.
fn encode_display(symbol: u8, position: usize) -> char {
    if symbol > 15 {
        return '~';
    }
    if position & 1 == 0 {
        ODD_SET[symbol as usize]
    } else {
        EVEN_SET[symbol as usize]
    }
}

/// Render a symbol stream as a grouped display string: `' '` between
/// pairs, `'-'` between groups of four.
pub fn display(message: &SymbolBuffer) -> String {
    let mut out = String::with_capacity(message.len() * 2);
    for i in 0..message.len() {
        if i > 0 {
            if i % 4 == 0 {
                out.push('-');
            } else if i % 2 == 0 {
                out.push(' ');
            }
        }
        out.push(encode_display(message.get(i), i));
    }
    out
}

/// Parse a display string into a symbol stream of (ideally)
/// `expected_len` symbols, repairing chirality damage along the way.
///
/// Unknown characters are counted against the expected length: while the
/// stream is short they become zero placeholders, otherwise they are
/// dropped as strays. The dropped-stray path intentionally does not
/// toggle the placeholder parity flip-flop, matching the reference
/// behaviour for pathological inputs.
pub fn decode_display(expected_len: usize, input: &str) -> Result<SymbolBuffer, Error> {
    // First pass: count characters that map into exactly one alphabet.
    let mut valid_count = 0usize;
    for c in input.chars() {
        let src = c.to_ascii_uppercase();
        if is_space(src) {
            continue;
        }
        let src = correction(case_changes(src));
        if index_of(&ODD_SET, src).is_some() || index_of(&EVEN_SET, src).is_some() {
            valid_count += 1;
        }
    }

    // negative = too many characters, positive = too few
    let mut mismatch = expected_len as isize - valid_count as isize;

    let mut codes = SymbolBuffer::with_capacity(valid_count);
    let mut chirality = SymbolBuffer::with_capacity(valid_count);

    // Second pass: collect symbols and chirality tags.
    let mut next_chir = 0u8;
    for c in input.chars() {
        let src = c.to_ascii_uppercase();
        if is_space(src) {
            continue;
        }
        let src = correction(case_changes(src));

        match (index_of(&ODD_SET, src), index_of(&EVEN_SET, src)) {
            (None, None) => {
                if mismatch > 0 {
                    // Probably a mistyped code character: stand in a zero
                    // with the parity the stream expects next.
                    codes.push(0);
                    chirality.push(next_chir);
                    next_chir = 1 - next_chir;
                    mismatch -= 1;
                } else {
                    // Probably a stray insertion: drop it.
                    mismatch += 1;
                }
            }
            (Some(_), Some(_)) => {
                // Only the overflow marker lives in both sets, and it
                // never appears in a transcribable code.
                return Err(Error::OverflowMarker);
            }
            (Some(idx), None) => {
                codes.push(idx as u8);
                chirality.push(0);
                next_chir = 1;
            }
            (None, Some(idx)) => {
                codes.push(idx as u8);
                chirality.push(1);
                next_chir = 0;
            }
        }
    }

    for _ in 0..expected_len {
        if chirality::repair(expected_len, &mut codes, &mut chirality) == Repair::Done {
            break;
        }
    }

    Ok(codes)
}
