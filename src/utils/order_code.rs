use rand::Rng;

/// Generate a human-readable order code: `ORD` + the last six digits of the
/// unix-millis clock + three random digits. Best-effort uniqueness only; the
/// unique constraint on `orders.order_code` is the real guard.
pub fn generate_order_code() -> String {
    let millis = chrono::Utc::now().timestamp_millis().to_string();
    let time_part = &millis[millis.len() - 6..];
    let random_part: u32 = rand::thread_rng().gen_range(0..1000);

    format!("ORD{}{:03}", time_part, random_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_expected_shape() {
        let code = generate_order_code();
        assert_eq!(code.len(), 12);
        assert!(code.starts_with("ORD"));
        assert!(code[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn codes_rarely_collide_back_to_back() {
        let codes: std::collections::HashSet<String> =
            (0..20).map(|_| generate_order_code()).collect();
        // time prefix is shared within a millisecond, the random suffix
        // should still spread consecutive codes out
        assert!(codes.len() > 1);
    }
}
