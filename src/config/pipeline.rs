//! Stage pipeline configuration
//!
//! Stages are listed in order; list values are easiest to supply through
//! the `admissions.toml` file:
//!
//! ```toml
//! [[pipeline.stages]]
//! name = "Registration"
//!
//! [[pipeline.stages]]
//! name = "Final"
//! fee = { payment_type = "final_round_fee", amount_minor = 2500, currency = "USD" }
//! ```

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payment::{Money, PaymentType};
use crate::domain::stage::{StageFee, StagePipeline};

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub name: String,
    #[serde(default)]
    pub fee: Option<FeeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    pub payment_type: String,
    pub amount_minor: i64,
    pub currency: String,
}

impl PipelineConfig {
    /// Builds the domain pipeline, validating every stage.
    pub fn to_pipeline(&self) -> Result<StagePipeline, ValidationError> {
        let definitions = self
            .stages
            .iter()
            .map(|stage| {
                let fee = stage
                    .fee
                    .as_ref()
                    .map(|fee| -> Result<StageFee, ValidationError> {
                        Ok(StageFee {
                            payment_type: PaymentType::new(&fee.payment_type).map_err(invalid)?,
                            amount: Money::new(fee.amount_minor, &fee.currency).map_err(invalid)?,
                        })
                    })
                    .transpose()?;
                Ok((stage.name.clone(), fee))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        StagePipeline::new(definitions).map_err(invalid)
    }

    /// Validate pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_pipeline().map(|_| ())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

fn invalid(err: crate::domain::foundation::ValidationError) -> ValidationError {
    ValidationError::InvalidPipeline(err.to_string())
}

fn default_stages() -> Vec<StageConfig> {
    let stage = |name: &str| StageConfig {
        name: name.to_string(),
        fee: None,
    };
    vec![
        stage("Registration"),
        stage("Idea Submission"),
        stage("Prototype"),
        StageConfig {
            name: "Final".to_string(),
            fee: Some(FeeConfig {
                payment_type: "final_round_fee".to_string(),
                amount_minor: 2500,
                currency: "USD".to_string(),
            }),
        },
    ]
}
