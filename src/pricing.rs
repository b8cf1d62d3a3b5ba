//! Final-price computation for finalized ideas.
//!
//! The listed price rewards engagement: every comment gathered while the
//! idea was published raises the pre-markup amount by a per-comment unit,
//! and the whole thing is marked up by a fixed factor.

use crate::errors::AppError;

/// The only base prices an author may pick at finalization.
pub const BASE_PRICE_CHOICES: [i64; 3] = [10_000, 30_000, 50_000];

/// Ideas may not close below this final price.
pub const PRICE_FLOOR: i64 = 10_000;

const MARKUP: f64 = 1.375;
const UNIT_EXCLUSIVE: i64 = 1_000;
const UNIT_STANDARD: i64 = 50;

/// Per-comment increment; exclusive-contract ideas earn a larger one.
pub fn comment_unit_price(is_exclusive: bool) -> i64 {
    if is_exclusive {
        UNIT_EXCLUSIVE
    } else {
        UNIT_STANDARD
    }
}

/// Computes the listed price from the author's chosen base and the comment
/// count at finalization. Halves round away from zero.
pub fn compute_final_price(
    base_price: i64,
    comment_count: i64,
    is_exclusive: bool,
) -> Result<i64, AppError> {
    if !BASE_PRICE_CHOICES.contains(&base_price) {
        return Err(AppError::InvalidBasePrice(base_price));
    }
    if comment_count < 0 {
        return Err(AppError::Validation(
            "comment count cannot be negative".to_string(),
        ));
    }
    let pre_markup = base_price + comment_count * comment_unit_price(is_exclusive);
    Ok((MARKUP * pre_markup as f64).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_only_standard() {
        assert_eq!(compute_final_price(10_000, 0, false).expect("priced"), 13_750);
    }

    #[test]
    fn ten_comments_standard_rounds_half_up() {
        // 1.375 * (10000 + 10 * 50) = 14437.5
        assert_eq!(compute_final_price(10_000, 10, false).expect("priced"), 14_438);
    }

    #[test]
    fn ten_comments_exclusive() {
        assert_eq!(compute_final_price(10_000, 10, true).expect("priced"), 27_500);
    }

    #[test]
    fn larger_bases() {
        assert_eq!(compute_final_price(30_000, 0, false).expect("priced"), 41_250);
        assert_eq!(compute_final_price(50_000, 0, false).expect("priced"), 68_750);
    }

    #[test]
    fn rejects_base_outside_choices() {
        match compute_final_price(12_345, 0, false) {
            Err(AppError::InvalidBasePrice(12_345)) => {}
            other => panic!("expected InvalidBasePrice, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_comment_count() {
        assert!(matches!(
            compute_final_price(10_000, -1, false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn exclusive_unit_dwarfs_standard() {
        assert_eq!(comment_unit_price(true), 1_000);
        assert_eq!(comment_unit_price(false), 50);
    }

    #[test]
    fn price_never_decreases_with_more_comments() {
        for &base in &BASE_PRICE_CHOICES {
            for &exclusive in &[false, true] {
                let mut previous = 0;
                for count in 0..200 {
                    let price =
                        compute_final_price(base, count, exclusive).expect("priced");
                    assert!(
                        price >= previous,
                        "price dropped from {previous} to {price} at {count} comments"
                    );
                    previous = price;
                }
            }
        }
    }

    #[test]
    fn price_never_falls_below_marked_up_base() {
        for &base in &BASE_PRICE_CHOICES {
            let marked_up_base = (MARKUP * base as f64).round() as i64;
            for count in 0..50 {
                let price = compute_final_price(base, count, false).expect("priced");
                assert!(price >= marked_up_base);
            }
        }
    }
}
