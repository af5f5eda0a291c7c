//! Order Number Generation
//!
//! Human-readable unique numbers: configurable prefix, the last 8 digits of a
//! millisecond timestamp, and a zero-padded 3-digit random suffix. The unique
//! index on `order_number` backstops the (unlikely) same-millisecond collision.

use crate::utils::time::now_millis;
use rand::Rng;

/// Generate an order number for the given prefix
pub fn generate(prefix: &str) -> String {
    let millis = now_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{}{:08}{:03}", prefix, millis % 100_000_000, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let number = generate("ORD");
        assert!(number.starts_with("ORD"));
        assert_eq!(number.len(), 3 + 8 + 3);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_prefix_is_configurable() {
        let number = generate("SHOP-");
        assert!(number.starts_with("SHOP-"));
        assert_eq!(number.len(), 5 + 8 + 3);
    }
}
