//! Human-shareable redemption code generation.
//!
//! Codes are uppercase alphanumeric, grouped into hyphen-separated segments
//! (`XXXX-XXXX-XXXX` by default). They are meant to be typed or pasted by a
//! person, so the alphabet avoids lowercase and punctuation. Collision
//! avoidance is probabilistic only; the database enforces uniqueness and
//! callers regenerate on conflict.

use rand::Rng;

/// Alphabet used for generated codes.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of hyphen-separated groups in a code.
pub const CODE_GROUPS: usize = 3;

/// Characters per group.
pub const CODE_GROUP_LEN: usize = 4;

/// Generate a code in the default `XXXX-XXXX-XXXX` shape.
#[must_use]
pub fn generate_code() -> String {
    generate_code_with_groups(CODE_GROUPS)
}

/// Generate a code with the given number of 4-character groups.
#[must_use]
pub fn generate_code_with_groups(groups: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(groups * (CODE_GROUP_LEN + 1));

    for group in 0..groups {
        if group > 0 {
            code.push('-');
        }
        for _ in 0..CODE_GROUP_LEN {
            let idx = rng.gen_range(0..ALPHABET.len());
            code.push(char::from(ALPHABET[idx]));
        }
    }

    code
}

/// Check whether a (normalized) string has the default code shape.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    let groups: Vec<&str> = code.split('-').collect();
    groups.len() == CODE_GROUPS
        && groups.iter().all(|g| {
            g.len() == CODE_GROUP_LEN
                && g.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        })
}

/// Normalize user input for code lookup: trim whitespace and uppercase.
#[must_use]
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 14); // 12 chars + 2 hyphens
            assert!(is_valid_code(&code), "bad code: {code}");
        }
    }

    #[test]
    fn test_group_count() {
        let code = generate_code_with_groups(5);
        assert_eq!(code.split('-').count(), 5);
        assert_eq!(code.len(), 5 * 4 + 4);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("ABCD-EFGH-1234"));
        assert!(!is_valid_code("abcd-efgh-1234"));
        assert!(!is_valid_code("ABCD-EFGH"));
        assert!(!is_valid_code("ABCDE-FGH1-234"));
        assert!(!is_valid_code("ABCD_EFGH_1234"));
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  abcd-efgh-1234 "), "ABCD-EFGH-1234");
        assert_eq!(normalize_code("ABCD-EFGH-1234"), "ABCD-EFGH-1234");
    }
}
