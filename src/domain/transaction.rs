use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Latest valid hour of day.
pub const MAX_HOUR: i64 = 23;

/// Raw transaction attributes submitted for scoring.
///
/// `feature_3`..`feature_7` are only consumed in passthrough mode; missing
/// values default to 0.0 at the wire boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Transaction amount (currency-agnostic, non-negative)
    pub amount: f64,

    /// Hour of day, 0-23 inclusive
    pub hour: i64,

    pub feature_3: f64,
    pub feature_4: f64,
    pub feature_5: f64,
    pub feature_6: f64,
    pub feature_7: f64,
}

impl TransactionRequest {
    /// Request with only the required fields set.
    pub fn new(amount: f64, hour: i64) -> Self {
        TransactionRequest {
            amount,
            hour,
            feature_3: 0.0,
            feature_4: 0.0,
            feature_5: 0.0,
            feature_6: 0.0,
            feature_7: 0.0,
        }
    }

    /// Set the auxiliary features in order `feature_3`..`feature_7`.
    pub fn with_auxiliary(mut self, aux: [f64; 5]) -> Self {
        let [f3, f4, f5, f6, f7] = aux;
        self.feature_3 = f3;
        self.feature_4 = f4;
        self.feature_5 = f5;
        self.feature_6 = f6;
        self.feature_7 = f7;
        self
    }

    /// Auxiliary features in wire order.
    #[inline]
    pub fn auxiliary(&self) -> [f64; 5] {
        [
            self.feature_3,
            self.feature_4,
            self.feature_5,
            self.feature_6,
            self.feature_7,
        ]
    }

    /// Check ranges. Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.amount.is_finite() {
            return Err(ScoringError::invalid_input(
                "amount",
                "must be a finite number",
            ));
        }
        if self.amount < 0.0 {
            return Err(ScoringError::invalid_input(
                "amount",
                format!("must be non-negative, got {}", self.amount),
            ));
        }
        if !(0..=MAX_HOUR).contains(&self.hour) {
            return Err(ScoringError::invalid_input(
                "hour",
                format!("must be between 0 and {}, got {}", MAX_HOUR, self.hour),
            ));
        }

        let names = ["feature_3", "feature_4", "feature_5", "feature_6", "feature_7"];
        for (name, value) in names.iter().zip(self.auxiliary()) {
            if !value.is_finite() {
                return Err(ScoringError::invalid_input(*name, "must be a finite number"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(TransactionRequest::new(200.0, 14).validate().is_ok());
        assert!(TransactionRequest::new(0.0, 0).validate().is_ok());
        assert!(TransactionRequest::new(1e12, 23).validate().is_ok());
    }

    #[test]
    fn test_hour_out_of_range() {
        for hour in [-1, 24, 100] {
            let err = TransactionRequest::new(10.0, hour).validate().unwrap_err();
            assert_eq!(err.field(), Some("hour"));
        }
    }

    #[test]
    fn test_negative_amount() {
        let err = TransactionRequest::new(-0.01, 12).validate().unwrap_err();
        assert_eq!(err.field(), Some("amount"));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_non_finite_values() {
        let err = TransactionRequest::new(f64::NAN, 12).validate().unwrap_err();
        assert_eq!(err.field(), Some("amount"));

        let err = TransactionRequest::new(10.0, 12)
            .with_auxiliary([0.0, 0.0, f64::INFINITY, 0.0, 0.0])
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("feature_5"));
    }
}
