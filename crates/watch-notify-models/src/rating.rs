use serde::{Deserialize, Serialize};

/// Ratings from the optional third provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RatingPair {
    /// Decimal string such as "8.4"
    pub imdb_rating: Option<String>,
    /// Percentage string such as "91%"
    pub tomato_meter: Option<String>,
}

impl RatingPair {
    pub fn is_empty(&self) -> bool {
        self.imdb_rating.is_none() && self.tomato_meter.is_none()
    }
}
