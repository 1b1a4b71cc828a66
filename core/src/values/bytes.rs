//! Byte sequence helpers.
//!
//! Native shift operators only work on integers, so byte sequences get their
//! own routines. A sequence is treated as one big-endian bit string: byte 0
//! holds the most significant bits. Shifts keep the length and fill vacated
//! bits with zeros.

/// Concatenate two byte sequences.
pub fn concat(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    out.extend_from_slice(left);
    out.extend_from_slice(right);
    out
}

/// Shift towards the most significant end by `bits`.
///
/// Negative amounts shift the other way.
pub fn shift_left(bytes: &[u8], bits: i64) -> Vec<u8> {
    if bits < 0 {
        return shift_right(bytes, bits.saturating_neg());
    }
    let len = bytes.len();
    let mut out = vec![0u8; len];
    let Ok(bits) = usize::try_from(bits) else {
        return out;
    };
    let byte_shift = bits / 8;
    let bit_shift = (bits % 8) as u32;
    if byte_shift >= len {
        return out;
    }
    for (i, slot) in out.iter_mut().enumerate().take(len - byte_shift) {
        let src = i + byte_shift;
        let mut byte = bytes[src] << bit_shift;
        if bit_shift > 0 && src + 1 < len {
            byte |= bytes[src + 1] >> (8 - bit_shift);
        }
        *slot = byte;
    }
    out
}

/// Shift towards the least significant end by `bits`.
///
/// Negative amounts shift the other way.
pub fn shift_right(bytes: &[u8], bits: i64) -> Vec<u8> {
    if bits < 0 {
        return shift_left(bytes, bits.saturating_neg());
    }
    let len = bytes.len();
    let mut out = vec![0u8; len];
    let Ok(bits) = usize::try_from(bits) else {
        return out;
    };
    let byte_shift = bits / 8;
    let bit_shift = (bits % 8) as u32;
    if byte_shift >= len {
        return out;
    }
    for (i, slot) in out.iter_mut().enumerate().skip(byte_shift) {
        let src = i - byte_shift;
        let mut byte = bytes[src] >> bit_shift;
        if bit_shift > 0 && src > 0 {
            byte |= bytes[src - 1] << (8 - bit_shift);
        }
        *slot = byte;
    }
    out
}

/// Bytewise AND; the shorter operand is zero-extended at the end.
pub fn and(left: &[u8], right: &[u8]) -> Vec<u8> {
    zip_padded(left, right, |a, b| a & b)
}

/// Bytewise OR; the shorter operand is zero-extended at the end.
pub fn or(left: &[u8], right: &[u8]) -> Vec<u8> {
    zip_padded(left, right, |a, b| a | b)
}

fn zip_padded(left: &[u8], right: &[u8], op: impl Fn(u8, u8) -> u8) -> Vec<u8> {
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| {
            let a = left.get(i).copied().unwrap_or(0);
            let b = right.get(i).copied().unwrap_or(0);
            op(a, b)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat() {
        assert_eq!(concat(&[1, 2], &[3]), vec![1, 2, 3]);
        assert_eq!(concat(&[], &[]), Vec::<u8>::new());
    }

    #[test]
    fn test_shift_right_within_byte() {
        assert_eq!(shift_right(&[0b1000_0001, 0b1111_0000], 1), vec![0b0100_0000, 0b1111_1000]);
    }

    #[test]
    fn test_shift_right_preserves_length() {
        let input = [0xff, 0xff, 0xff];
        for k in 0..30 {
            assert_eq!(shift_right(&input, k).len(), 3, "shift by {}", k);
        }
        assert_eq!(shift_right(&input, 12), vec![0x00, 0x0f, 0xff]);
        assert_eq!(shift_right(&input, 24), vec![0, 0, 0]);
        assert_eq!(shift_right(&input, 1000), vec![0, 0, 0]);
    }

    #[test]
    fn test_shift_left() {
        assert_eq!(shift_left(&[0x01, 0x80], 1), vec![0x03, 0x00]);
        assert_eq!(shift_left(&[0x12, 0x34], 8), vec![0x34, 0x00]);
        assert_eq!(shift_left(&[0x12, 0x34], 4), vec![0x23, 0x40]);
    }

    #[test]
    fn test_negative_shift_reverses_direction() {
        assert_eq!(shift_left(&[0x12, 0x34], -4), shift_right(&[0x12, 0x34], 4));
        assert_eq!(shift_right(&[0x12, 0x34], i64::MIN), vec![0, 0]);
    }

    #[test]
    fn test_bitwise_zero_extends() {
        assert_eq!(and(&[0xff, 0x0f], &[0x3c]), vec![0x3c, 0x00]);
        assert_eq!(or(&[0xf0], &[0x0f, 0x01]), vec![0xff, 0x01]);
    }
}
