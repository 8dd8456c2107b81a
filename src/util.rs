//! Private utility module
use byteordered::Endianness;

/// Reverse the byte order of every element in a row of samples, in place.
///
/// `width` is the size of a single element in bytes. Rows whose elements
/// are a single byte wide are left untouched, as are any trailing bytes
/// that do not make up a whole element.
pub fn swap_row_bytes(row: &mut [u8], width: usize) {
    if width <= 1 {
        return;
    }
    for element in row.chunks_exact_mut(width) {
        element.reverse();
    }
}

/// Human readable name of a byte order.
pub fn endianness_name(endianness: Endianness) -> &'static str {
    match endianness {
        Endianness::Little => "LittleEndian",
        Endianness::Big => "BigEndian",
    }
}

#[cfg(test)]
mod tests {
    use super::{endianness_name, swap_row_bytes};
    use byteordered::Endianness;

    #[test]
    fn endianness() {
        assert_eq!(endianness_name(Endianness::Little), "LittleEndian");
        assert_eq!(endianness_name(Endianness::Big), "BigEndian");
    }

    #[test]
    fn swap_u16_row() {
        let values: [u16; 3] = [0x0102, 0xA0B0, 0x00FF];
        let mut row: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes().to_vec()).collect();
        swap_row_bytes(&mut row, 2);
        let swapped: Vec<u16> = row
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(swapped, vec![0x0201, 0xB0A0, 0xFF00]);
    }

    #[test]
    fn swap_u32_and_f64() {
        let mut row = 0x0102_0304_u32.to_ne_bytes().to_vec();
        swap_row_bytes(&mut row, 4);
        assert_eq!(row, 0x0403_0201_u32.to_ne_bytes().to_vec());

        let value = -1234.5678_f64;
        let mut row = value.to_ne_bytes().to_vec();
        swap_row_bytes(&mut row, 8);
        assert_eq!(row, value.to_bits().swap_bytes().to_ne_bytes().to_vec());
    }

    #[test]
    fn swap_twice_is_identity() {
        let original: Vec<u8> = (0..48).map(|x| (x * 7 + 3) as u8).collect();
        for width in &[2, 4, 8] {
            let mut row = original.clone();
            swap_row_bytes(&mut row, *width);
            assert_ne!(row, original, "width {}", width);
            swap_row_bytes(&mut row, *width);
            assert_eq!(row, original, "width {}", width);
        }
    }

    #[test]
    fn single_byte_elements_untouched() {
        let original = vec![1u8, 2, 3, 4, 5];
        let mut row = original.clone();
        swap_row_bytes(&mut row, 1);
        assert_eq!(row, original);
    }
}
