//! The fixed, linear stage pipeline.
//!
//! Stage topology is read-only configuration. Stage 0 is registration;
//! the last stage is the final round.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::payment::{Money, PaymentType};

/// Position of a stage in the pipeline, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageIndex(u32);

impl StageIndex {
    pub const REGISTRATION: StageIndex = StageIndex(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> StageIndex {
        StageIndex(self.0.saturating_add(1))
    }
}

impl fmt::Display for StageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fee that must be settled after being selected into a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFee {
    pub payment_type: PaymentType,
    pub amount: Money,
}

/// One stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub index: StageIndex,
    pub name: String,
    pub fee: Option<StageFee>,
}

impl Stage {
    pub fn requires_payment(&self) -> bool {
        self.fee.is_some()
    }
}

/// Ordered list of stages.
///
/// # Invariants
///
/// - At least two stages (registration plus one round)
/// - Stage 0 carries no fee
/// - Payment types are unique across stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePipeline {
    stages: Vec<Stage>,
}

impl StagePipeline {
    /// Builds a pipeline from `(name, fee)` pairs in order.
    pub fn new(definitions: Vec<(String, Option<StageFee>)>) -> Result<Self, ValidationError> {
        if definitions.len() < 2 {
            return Err(ValidationError::out_of_range(
                "stages",
                2,
                u32::MAX as i64,
                definitions.len() as i64,
            ));
        }

        let mut stages = Vec::with_capacity(definitions.len());
        for (position, (name, fee)) in definitions.into_iter().enumerate() {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ValidationError::empty_field(format!("stages[{}].name", position)));
            }
            if position == 0 && fee.is_some() {
                return Err(ValidationError::invalid_format(
                    "stages[0].fee",
                    "the registration stage cannot require a fee",
                ));
            }
            if let Some(fee) = &fee {
                let clash = stages.iter().any(|s: &Stage| {
                    s.fee.as_ref().map(|f| &f.payment_type) == Some(&fee.payment_type)
                });
                if clash {
                    return Err(ValidationError::invalid_format(
                        format!("stages[{}].fee.payment_type", position),
                        format!("payment type '{}' is used by more than one stage", fee.payment_type),
                    ));
                }
            }
            stages.push(Stage {
                index: StageIndex::new(position as u32),
                name,
                fee,
            });
        }

        Ok(Self { stages })
    }

    /// Registration, Idea Submission, Prototype, Final.
    pub fn standard() -> Self {
        let names = ["Registration", "Idea Submission", "Prototype", "Final"];
        Self {
            stages: names
                .iter()
                .enumerate()
                .map(|(i, name)| Stage {
                    index: StageIndex::new(i as u32),
                    name: name.to_string(),
                    fee: None,
                })
                .collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, index: StageIndex) -> Option<&Stage> {
        self.stages.get(index.value() as usize)
    }

    pub fn contains(&self, index: StageIndex) -> bool {
        self.stage(index).is_some()
    }

    pub fn final_stage(&self) -> StageIndex {
        StageIndex::new(self.stages.len().saturating_sub(1) as u32)
    }

    pub fn is_final(&self, index: StageIndex) -> bool {
        index == self.final_stage()
    }

    /// Fee owed after entering `index`, if any.
    pub fn fee_for(&self, index: StageIndex) -> Option<&StageFee> {
        self.stage(index).and_then(|s| s.fee.as_ref())
    }
}
