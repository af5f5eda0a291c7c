//! Product Derived-State Rules
//!
//! Explicit recomputation functions the write paths call after mutating a
//! product's review set or image list. Keeping these out of save hooks makes
//! the side effects visible and testable in isolation.

use crate::db::models::{ProductImage, Ratings, Review};
use rust_decimal::prelude::*;

/// Recompute aggregated ratings from the full review set
///
/// Average is the mean of all review ratings rounded half-up to 2 decimal
/// places; the distribution is a histogram by integer star.
pub fn recompute_ratings(reviews: &[Review]) -> Ratings {
    if reviews.is_empty() {
        return Ratings::default();
    }

    let mut distribution = [0u32; 5];
    let mut sum = Decimal::ZERO;
    for review in reviews {
        let star = review.rating.clamp(1, 5);
        distribution[(star - 1) as usize] += 1;
        sum += Decimal::from(star);
    }

    let average = (sum / Decimal::from(reviews.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default();

    Ratings {
        average,
        count: reviews.len() as u32,
        distribution,
    }
}

/// Ensure exactly one primary image
///
/// If none is flagged, the first image becomes primary; if several are, only
/// the first flagged one is kept. Empty lists stay empty.
pub fn normalize_primary_image(images: &mut [ProductImage]) {
    if images.is_empty() {
        return;
    }

    let first_primary = images.iter().position(|img| img.is_primary);
    let keep = first_primary.unwrap_or(0);
    for (idx, img) in images.iter_mut().enumerate() {
        img.is_primary = idx == keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn review(rating: u8) -> Review {
        Review {
            user: RecordId::from_table_key("user", "u1"),
            rating,
            title: None,
            comment: None,
            created_at: 0,
        }
    }

    fn image(url: &str, primary: bool) -> ProductImage {
        ProductImage {
            url: url.to_string(),
            alt: None,
            is_primary: primary,
        }
    }

    #[test]
    fn test_empty_reviews_yield_default() {
        let ratings = recompute_ratings(&[]);
        assert_eq!(ratings.average, 0.0);
        assert_eq!(ratings.count, 0);
        assert_eq!(ratings.distribution, [0; 5]);
    }

    #[test]
    fn test_average_and_histogram() {
        let reviews = vec![review(5), review(4), review(4), review(1)];
        let ratings = recompute_ratings(&reviews);
        // (5 + 4 + 4 + 1) / 4 = 3.5
        assert_eq!(ratings.average, 3.5);
        assert_eq!(ratings.count, 4);
        assert_eq!(ratings.distribution, [1, 0, 0, 2, 1]);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.33
        let ratings = recompute_ratings(&[review(5), review(4), review(4)]);
        assert_eq!(ratings.average, 4.33);
    }

    #[test]
    fn test_no_primary_promotes_first() {
        let mut images = vec![image("a", false), image("b", false)];
        normalize_primary_image(&mut images);
        assert!(images[0].is_primary);
        assert!(!images[1].is_primary);
    }

    #[test]
    fn test_multiple_primaries_keep_first_flagged() {
        let mut images = vec![image("a", false), image("b", true), image("c", true)];
        normalize_primary_image(&mut images);
        assert!(!images[0].is_primary);
        assert!(images[1].is_primary);
        assert!(!images[2].is_primary);
    }

    #[test]
    fn test_empty_image_list() {
        let mut images: Vec<ProductImage> = Vec::new();
        normalize_primary_image(&mut images);
        assert!(images.is_empty());
    }
}
