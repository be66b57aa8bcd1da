//! Check digits for supplier documents: the 11-digit individual taxpayer
//! number and the 14-digit company registration number. Both use mod-11
//! weighted sums over the leading digits.

use crate::models::SupplierKind;

const COMPANY_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const COMPANY_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Whether `document` is a well-formed number of the given kind.
pub fn is_valid(document: &str, kind: SupplierKind) -> bool {
    let Some(digits) = digits(document) else {
        return false;
    };
    if digits.len() != kind.document_length() {
        return false;
    }
    // Repeated digits pass the checksum but are never issued.
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    match kind {
        SupplierKind::Individual => individual_check_digits(&digits[..9]) == (digits[9], digits[10]),
        SupplierKind::Company => company_check_digits(&digits[..12]) == (digits[12], digits[13]),
    }
}

fn digits(document: &str) -> Option<Vec<u32>> {
    document.chars().map(|c| c.to_digit(10)).collect()
}

fn individual_check_digits(base: &[u32]) -> (u32, u32) {
    let digit = |values: &[u32]| {
        let top = values.len() as u32 + 1;
        let sum: u32 = values
            .iter()
            .enumerate()
            .map(|(i, d)| d * (top - i as u32))
            .sum();
        (sum * 10 % 11) % 10
    };

    let first = digit(base);
    let mut extended = base.to_vec();
    extended.push(first);
    (first, digit(&extended))
}

fn company_check_digits(base: &[u32]) -> (u32, u32) {
    let digit = |values: &[u32], weights: &[u32]| {
        let sum: u32 = values.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };

    let first = digit(base, &COMPANY_FIRST_WEIGHTS);
    let mut extended = base.to_vec();
    extended.push(first);
    (first, digit(&extended, &COMPANY_SECOND_WEIGHTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_individual_number() {
        assert!(is_valid("52998224725", SupplierKind::Individual));
    }

    #[test]
    fn accepts_valid_company_number() {
        assert!(is_valid("11222333000181", SupplierKind::Company));
    }

    #[test]
    fn rejects_wrong_check_digits() {
        assert!(!is_valid("52998224724", SupplierKind::Individual));
        assert!(!is_valid("11222333000182", SupplierKind::Company));
    }

    #[test]
    fn rejects_length_for_other_kind() {
        assert!(!is_valid("52998224725", SupplierKind::Company));
        assert!(!is_valid("11222333000181", SupplierKind::Individual));
    }

    #[test]
    fn rejects_punctuation_and_repeated_digits() {
        assert!(!is_valid("529.982.247-25", SupplierKind::Individual));
        assert!(!is_valid("11111111111", SupplierKind::Individual));
        assert!(!is_valid("", SupplierKind::Individual));
    }
}
