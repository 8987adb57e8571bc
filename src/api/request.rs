use serde::{Deserialize, Serialize};

use crate::domain::TransactionRequest;

/// Body of a prediction request.
///
/// Auxiliary features accept both the `feature_N` names and the `vN` names
/// used by engineered training data. Absent values default to 0.0.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub amount: f64,

    pub hour: i64,

    #[serde(default, alias = "v1")]
    pub feature_3: Option<f64>,

    #[serde(default, alias = "v2")]
    pub feature_4: Option<f64>,

    #[serde(default, alias = "v3")]
    pub feature_5: Option<f64>,

    #[serde(default, alias = "v4")]
    pub feature_6: Option<f64>,

    #[serde(default, alias = "v5")]
    pub feature_7: Option<f64>,
}

impl PredictRequest {
    /// Convert to the domain request, filling absent auxiliaries with 0.0.
    pub fn into_transaction(self) -> TransactionRequest {
        TransactionRequest::new(self.amount, self.hour).with_auxiliary([
            self.feature_3.unwrap_or(0.0),
            self.feature_4.unwrap_or(0.0),
            self.feature_5.unwrap_or(0.0),
            self.feature_6.unwrap_or(0.0),
            self.feature_7.unwrap_or(0.0),
        ])
    }
}
