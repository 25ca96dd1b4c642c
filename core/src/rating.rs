//! Running-average rating aggregation
//!
//! Ratings are whole numbers in `MIN_RATING..=MAX_RATING`. The average is kept
//! as a truncating integer and updated incrementally:
//!
//! ```text
//! count'   = count + 1
//! average' = (average * count + rating) / count'
//! ```
//!
//! The total is rebuilt from the already truncated average, so after three or
//! more ratings the stored average can fall below the floor of the exact mean.
//! It never exceeds it.

use serde::{Serialize, Deserialize};

use crate::error::{RegistryError, Result};

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating
pub const MAX_RATING: u8 = 5;

/// A validated rating in `MIN_RATING..=MAX_RATING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating
    pub fn new(value: u8) -> Result<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(RegistryError::InvalidRating {
                rating: value,
                min: MIN_RATING,
                max: MAX_RATING,
            })
        }
    }

    /// Raw rating value
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RegistryError;

    fn try_from(value: u8) -> Result<Self> {
        Rating::new(value)
    }
}

/// Rating statistics embedded in a data-source record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Truncated average of all ratings
    pub average: u64,

    /// Number of ratings submitted
    pub count: u64,
}

impl RatingStats {
    /// Fold one more rating into the statistics.
    ///
    /// Returns the new statistics; `self` is left untouched so callers can
    /// commit average and count together.
    pub fn update(self, rating: Rating) -> RatingStats {
        let count = self.count.saturating_add(1);
        // average <= MAX_RATING, so the widened product cannot overflow
        let total = u128::from(self.average) * u128::from(self.count) + u128::from(rating.value());
        let average = (total / u128::from(count)) as u64;

        RatingStats { average, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(3, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(255, false)]
    fn test_rating_bounds(#[case] value: u8, #[case] accepted: bool) {
        let result = Rating::new(value);
        assert_eq!(result.is_ok(), accepted);

        if !accepted {
            assert!(matches!(
                result,
                Err(RegistryError::InvalidRating { rating, min: 1, max: 5 }) if rating == value
            ));
        }
    }

    #[test]
    fn test_first_rating_is_exact() {
        for value in MIN_RATING..=MAX_RATING {
            let stats = RatingStats::default().update(Rating::new(value).unwrap());
            assert_eq!(stats, RatingStats { average: u64::from(value), count: 1 });
        }
    }

    #[test]
    fn test_average_sequence() {
        let mut stats = RatingStats::default();
        let mut averages = Vec::new();

        for value in [4, 2, 5] {
            stats = stats.update(Rating::new(value).unwrap());
            averages.push(stats.average);
        }

        assert_eq!(averages, vec![4, 3, 3]);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_average_drifts_below_exact_mean() {
        let mut stats = RatingStats::default();
        let mut averages = Vec::new();

        for value in [1, 2, 3] {
            stats = stats.update(Rating::new(value).unwrap());
            averages.push(stats.average);
        }

        // Exact floor mean of 1, 2, 3 is 2
        assert_eq!(averages, vec![1, 1, 1]);
        assert_eq!(stats.count, 3);
    }

    proptest! {
        #[test]
        fn prop_average_stays_in_range(values in prop::collection::vec(MIN_RATING..=MAX_RATING, 1..64)) {
            let mut stats = RatingStats::default();
            for value in &values {
                stats = stats.update(Rating::new(*value).unwrap());
                prop_assert!(stats.average >= u64::from(MIN_RATING));
                prop_assert!(stats.average <= u64::from(MAX_RATING));
            }
            prop_assert_eq!(stats.count, values.len() as u64);
        }

        #[test]
        fn prop_average_never_exceeds_floor_mean(values in prop::collection::vec(MIN_RATING..=MAX_RATING, 1..64)) {
            let mut stats = RatingStats::default();
            let mut sum = 0u64;
            for (seen, value) in values.iter().enumerate() {
                stats = stats.update(Rating::new(*value).unwrap());
                sum += u64::from(*value);
                prop_assert!(stats.average <= sum / (seen as u64 + 1));
            }
        }
    }
}
