//! Decoder: display string → bytes.
//!
//! Parsing and chirality repair bring the symbol stream to the expected
//! length; the robust shell then wraps the Reed-Solomon decoder with
//! zero-gated rotation retries to absorb residual phase drift from
//! placeholders that landed at the wrong end.

use tracing::debug;

use crate::buffer::SymbolBuffer;
use crate::display;
use crate::reed_solomon;
use crate::Error;

/// Decode a transcribed code string back into `byte_len` bytes.
pub fn decode(code: &str, byte_len: usize, sym_count: usize) -> Result<Vec<u8>, Error> {
    let expected_len = byte_len * 2 + sym_count;

    let mut codes = display::decode_display(expected_len, code)?;

    if codes.len() != expected_len {
        debug!(
            expected = expected_len,
            actual = codes.len(),
            "stream length still wrong after repair"
        );
        return Err(Error::LengthMismatch {
            expected: expected_len,
            actual: codes.len(),
        });
    }

    let mut decoded =
        try_hard_decode(&mut codes, sym_count, expected_len).ok_or(Error::Uncorrectable)?;

    // Drop the parity, then fold nybble pairs back into bytes.
    decoded.trim_end(sym_count);
    let mut bytes = Vec::with_capacity(byte_len);
    for _ in 0..byte_len {
        let upper = decoded.pop_front().unwrap_or(0);
        let lower = decoded.pop_front().unwrap_or(0);
        bytes.push((upper << 4) | lower);
    }

    Ok(bytes)
}

/// Attempt a Reed-Solomon decode; on failure retry under rotations while
/// the element coming off the rotated end is zero, at most half the
/// buffer length in each direction.
///
/// The buffer is restored to its original order before returning, even
/// on success, so callers can keep reasoning about its contents.
pub fn try_hard_decode(
    msg: &mut SymbolBuffer,
    sym_count: usize,
    expected_len: usize,
) -> Option<SymbolBuffer> {
    if let Some(decoded) = reed_solomon::decode(msg, sym_count, expected_len) {
        return Some(decoded);
    }

    debug!("plain decode failed, retrying under rotation");

    let half = msg.len() / 2;
    let mut result = None;

    // Rotate left while zeros come off the front.
    let mut steps = 0;
    while steps < half {
        let Some(front) = msg.pop_front() else { break };
        if front != 0 {
            msg.push_front(front);
            break;
        }
        msg.push(front);
        steps += 1;

        if let Some(decoded) = reed_solomon::decode(msg, sym_count, expected_len) {
            result = Some(decoded);
            break;
        }
    }
    for _ in 0..steps {
        if let Some(back) = msg.pop() {
            msg.push_front(back);
        }
    }
    if result.is_some() {
        return result;
    }

    // Rotate right while zeros come off the back.
    let mut steps = 0;
    while steps < half {
        let Some(back) = msg.pop() else { break };
        if back != 0 {
            msg.push(back);
            break;
        }
        msg.push_front(back);
        steps += 1;

        if let Some(decoded) = reed_solomon::decode(msg, sym_count, expected_len) {
            result = Some(decoded);
            break;
        }
    }
    for _ in 0..steps {
        if let Some(front) = msg.pop_front() {
            msg.push(front);
        }
    }

    result
}
