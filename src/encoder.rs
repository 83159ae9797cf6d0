//! Encoder: bytes → human-transcribable display string.

use crate::buffer::SymbolBuffer;
use crate::display;
use crate::reed_solomon;

/// Encode a payload as a transcribable code string.
///
/// Each byte becomes two nybble symbols (high first), `sym_count`
/// Reed-Solomon parity symbols are appended, and the codeword is
/// rendered in the grouped dual-alphabet display form.
pub fn encode(data: &[u8], sym_count: usize) -> String {
    let mut src = SymbolBuffer::with_capacity(data.len() * 2);
    for &byte in data {
        src.push((byte >> 4) & 0x0f);
        src.push(byte & 0x0f);
    }

    let encoded = reed_solomon::encode(&src, sym_count);

    display::display(&encoded)
}
