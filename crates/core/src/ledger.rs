use rust_decimal::Decimal;
use serde::Serialize;

/// Authoritative cost row for a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCostRecord {
    pub step_id: String,
    pub description: Option<String>,
    pub cost: Decimal,
}

/// Result of merging one report into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCostUpdate {
    /// Cost stored before the merge; zero for a first report.
    pub previous_cost: Decimal,
    pub record: StepCostRecord,
    pub created: bool,
}

impl StepCostUpdate {
    /// Amount the owning project's total must move by.
    pub fn delta(&self) -> Decimal {
        self.record.cost - self.previous_cost
    }
}

/// Folds an incoming report into the existing row.
///
/// A known description is never erased by an absent one, and a stored cost is only
/// replaced by a strictly positive new cost.
pub fn merge_step_cost(
    existing: Option<StepCostRecord>,
    step_id: &str,
    description: Option<&str>,
    new_cost: Decimal,
) -> StepCostUpdate {
    match existing {
        None => StepCostUpdate {
            previous_cost: Decimal::ZERO,
            record: StepCostRecord {
                step_id: step_id.to_string(),
                description: description.map(str::to_string),
                cost: new_cost.max(Decimal::ZERO),
            },
            created: true,
        },
        Some(existing) => {
            let previous_cost = existing.cost;
            let cost = if new_cost > Decimal::ZERO {
                new_cost
            } else {
                existing.cost
            };
            let description = description.map(str::to_string).or(existing.description);
            StepCostUpdate {
                previous_cost,
                record: StepCostRecord {
                    step_id: existing.step_id,
                    description,
                    cost,
                },
                created: false,
            }
        }
    }
}
