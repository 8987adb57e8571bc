use crate::domain::{FeatureMode, FeatureVector, TransactionRequest};

const AMOUNT_SCALE: f64 = 10_000.0;
const HOURS_PER_DAY: f64 = 24.0;
const INTERACTION_SCALE: f64 = 100_000.0;
const AMOUNT_RESIDUE_MODULUS: f64 = 5_000.0;
const MIDDAY: f64 = 12.0;

/// Maps a validated request to the model's feature vector.
///
/// Pure and total over valid input. No clamping: extreme amounts pass
/// through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver {
    mode: FeatureMode,
}

impl FeatureDeriver {
    pub fn new(mode: FeatureMode) -> Self {
        FeatureDeriver { mode }
    }

    pub fn mode(&self) -> FeatureMode {
        self.mode
    }

    /// Ordered names of the features `derive` produces.
    pub fn feature_names(&self) -> &'static [&'static str] {
        self.mode.feature_names()
    }

    /// Build the vector in the order given by `feature_names`.
    pub fn derive(&self, request: &TransactionRequest) -> FeatureVector {
        let amount = request.amount;
        let hour = request.hour as f64;

        match self.mode {
            FeatureMode::Passthrough => {
                let [f3, f4, f5, f6, f7] = request.auxiliary();
                FeatureVector::new([amount, hour, f3, f4, f5, f6, f7])
            }
            FeatureMode::Engineered => FeatureVector::new([
                amount,
                hour,
                amount / AMOUNT_SCALE,
                hour / HOURS_PER_DAY,
                amount * hour / INTERACTION_SCALE,
                amount % AMOUNT_RESIDUE_MODULUS,
                (hour - MIDDAY).powi(2),
            ]),
        }
    }
}
