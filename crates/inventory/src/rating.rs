use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ItemId, UserId};

/// Lowest accepted score.
pub const MIN_SCORE: i32 = 1;
/// Highest accepted score.
pub const MAX_SCORE: i32 = 5;

/// One shopper's score for one item. At most one per (user, item); later
/// ratings overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub score: i32,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, score: i32) -> DomainResult<Self> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(DomainError::validation(format!(
                "score must be between {MIN_SCORE} and {MAX_SCORE} (got {score})"
            )));
        }
        Ok(Self {
            user_id,
            item_id,
            score,
        })
    }
}

/// Arithmetic mean of the scores; `0.0` when there are none.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: i64 = ratings.iter().map(|r| i64::from(r.score)).sum();
    total as f64 / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user: i64, score: i32) -> Rating {
        Rating::new(UserId::new(user), ItemId::new(1), score).unwrap()
    }

    #[test]
    fn empty_average_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        assert_eq!(average_rating(&[rating(1, 4), rating(2, 2)]), 3.0);
        assert_eq!(average_rating(&[rating(1, 5), rating(2, 4)]), 4.5);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        for score in [0, 6, -1] {
            let err = Rating::new(UserId::new(1), ItemId::new(1), score).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }
}
