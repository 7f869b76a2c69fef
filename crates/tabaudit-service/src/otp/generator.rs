//! Random numeric code generation.

use rand::Rng;

/// Generate `length` uniformly random decimal digits, zero-padded.
pub fn generate_code(length: u32) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabaudit_entity::otp::is_well_formed;

    #[test]
    fn test_codes_are_digits_of_requested_length() {
        for _ in 0..200 {
            let code = generate_code(6);
            assert!(is_well_formed(&code, 6), "bad code {code}");
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code(6)).collect();
        assert!(codes.len() > 1);
    }
}
