use rand::Rng;

pub const ROOM_CODE_LENGTH: usize = 5;
pub const MAX_ROOM_CODE_LENGTH: usize = 16;

const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[index] as char
        })
        .collect()
}

/// Trims and uppercases a client-supplied room code. Returns `None`
/// for empty, oversized, or non-alphanumeric input.
pub fn normalize_room_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_ROOM_CODE_LENGTH {
        return None;
    }
    if !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_uppercase_alphanumeric() {
        for _ in 0..100 {
            let code = generate_room_code();
            assert_eq!(code.len(), ROOM_CODE_LENGTH);
            assert!(code
                .bytes()
                .all(|byte| ROOM_CODE_CHARSET.contains(&byte)));
        }
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_room_code("  ab1cd "), Some("AB1CD".to_string()));
        assert_eq!(normalize_room_code("XYZ99"), Some("XYZ99".to_string()));
    }

    #[test]
    fn normalize_rejects_malformed_codes() {
        assert_eq!(normalize_room_code(""), None);
        assert_eq!(normalize_room_code("   "), None);
        assert_eq!(normalize_room_code("ab-cd"), None);
        assert_eq!(normalize_room_code("a".repeat(40).as_str()), None);
    }
}
