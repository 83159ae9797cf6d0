//! GF(16) arithmetic: field tables, scalar ops and polynomial helpers.
//!
//! The field is generated by 2 under the irreducible polynomial
//! x^4 + x + 1 (value 19). All elements are nybbles in 0..=15.
//! Polynomials are big-endian: index 0 holds the highest-order
//! coefficient.

use std::sync::OnceLock;

use crate::buffer::SymbolBuffer;

/// Irreducible polynomial x^4 + x + 1. Must be fixed across implementations.
const PRIME: u32 = 19;

struct Tables {
    /// alpha^i for i in 0..32. The top half repeats the cycle so that
    /// `exp[a + b]` needs no reduction for small sums.
    exp: [u8; 32],
    /// log_alpha(x) for x in 1..=15. `log[0]` is never consulted.
    log: [u8; 16],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 32];
        let mut log = [0u8; 16];
        let mut x: u32 = 1;
        for i in 0..16 {
            exp[i] = (x & 0x0f) as u8;
            log[(x & 0x0f) as usize] = (i & 0x0f) as u8;
            x <<= 1;
            if x & 0x110 != 0 {
                x ^= PRIME;
            }
        }
        for i in 15..32 {
            exp[i] = exp[i - 15];
        }
        Tables { exp, log }
    })
}

// --- Scalar arithmetic ---

/// Add or subtract two field elements. The operations coincide in
/// characteristic 2.
#[inline]
pub fn add_sub(a: u8, b: u8) -> u8 {
    (a ^ b) & 0x0f
}

#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    t.exp[(t.log[a as usize] as usize + t.log[b as usize] as usize) % 15]
}

#[inline]
pub fn div(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    t.exp[(t.log[a as usize] as usize + 15 - t.log[b as usize] as usize) % 15]
}

/// Raise `n` to the power `p`. Undefined for `n == 0`.
#[inline]
pub fn pow(n: u8, p: usize) -> u8 {
    debug_assert!(n != 0);
    let t = tables();
    t.exp[(t.log[n as usize] as usize * p) % 15]
}

/// Multiplicative inverse of `n`. Undefined for `n == 0`.
#[inline]
pub fn inverse(n: u8) -> u8 {
    debug_assert!(n != 0);
    let t = tables();
    t.exp[15 - t.log[n as usize] as usize]
}

// --- Polynomial operations ---

/// Multiply every coefficient of `p` by the scalar `sc`.
pub fn poly_mul_scalar(p: &SymbolBuffer, sc: u8) -> SymbolBuffer {
    let mut result = SymbolBuffer::zeroed(p.len());
    for i in 0..p.len() {
        result.set(i, mul(p.get(i), sc));
    }
    result
}

/// Add two polynomials, right-aligning the shorter one.
pub fn poly_add(p: &SymbolBuffer, q: &SymbolBuffer) -> SymbolBuffer {
    let len = p.len().max(q.len());
    let mut result = SymbolBuffer::zeroed(len);
    for i in 0..p.len() {
        result.set(i + len - p.len(), p.get(i));
    }
    for i in 0..q.len() {
        let idx = i + len - q.len();
        result.set(idx, result.get(idx) ^ q.get(i));
    }
    result
}

/// Schoolbook polynomial product.
pub fn poly_mul(p: &SymbolBuffer, q: &SymbolBuffer) -> SymbolBuffer {
    debug_assert!(!p.is_empty() && !q.is_empty());
    let mut result = SymbolBuffer::zeroed(p.len() + q.len() - 1);
    for j in 0..q.len() {
        for i in 0..p.len() {
            let acc = add_sub(result.get(i + j), mul(p.get(i), q.get(j)));
            result.set(i + j, acc);
        }
    }
    result
}

/// Evaluate `p` at `x` by Horner's rule over the big-endian coefficients.
pub fn poly_eval(p: &SymbolBuffer, x: u8) -> u8 {
    let Some((&first, rest)) = p.as_slice().split_first() else {
        return 0;
    };
    let mut y = first;
    for &c in rest {
        y = mul(y, x) ^ c;
    }
    y & 0x0f
}

/// Generator polynomial for `sym` parity symbols: the product of
/// `(x + 2^i)` for i in 0..sym.
pub fn generator_poly(sym: usize) -> SymbolBuffer {
    let mut gen = SymbolBuffer::from_symbols(&[1]);
    for i in 0..sym {
        let factor = SymbolBuffer::from_symbols(&[1, pow(2, i)]);
        gen = poly_mul(&gen, &factor);
    }
    gen
}
