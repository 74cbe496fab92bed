mod rules;

use super::record::EligibilityRecord;
use serde::{Deserialize, Serialize};

/// Codes and thresholds applied by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRules {
    pub qualifying_score: i8,
    pub credit_level_code: String,
    pub exempt_level_code: String,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            qualifying_score: 4,
            credit_level_code: "CR".to_string(),
            exempt_level_code: "AA".to_string(),
        }
    }
}

/// The four program requirements, numbered as they appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    FafsaFiled,
    CreditLevel,
    ResidencyDecoded,
    ServiceAreaOrExempt,
}

impl Criterion {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FafsaFiled,
            Self::CreditLevel,
            Self::ResidencyDecoded,
            Self::ServiceAreaOrExempt,
        ]
    }

    /// 1-based number used in the `yes-N` / `no-N` / `req-N` element ids.
    pub const fn number(self) -> u8 {
        match self {
            Self::FafsaFiled => 1,
            Self::CreditLevel => 2,
            Self::ResidencyDecoded => 3,
            Self::ServiceAreaOrExempt => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|criterion| criterion.number() == number)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FafsaFiled => "FAFSA or CADAA on file",
            Self::CreditLevel => "Enrolled at the credit level",
            Self::ResidencyDecoded => "California resident or AB 540 eligible",
            Self::ServiceAreaOrExempt => "Lives in the district service area",
        }
    }
}

/// Individual contribution to the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: i8,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Employment,
    Requirement(Criterion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub met: bool,
}

/// Derived result for one student and term. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub score: i8,
    pub qualifies: bool,
    pub employee_ineligible: bool,
    /// False whenever the student is an employee, whatever the score.
    pub panel_shown: bool,
    pub criteria: Vec<CriterionResult>,
    pub components: Vec<ScoreComponent>,
}

impl EligibilityOutcome {
    pub fn criterion_met(&self, criterion: Criterion) -> bool {
        self.criteria
            .iter()
            .any(|result| result.criterion == criterion && result.met)
    }

    pub fn met_count(&self) -> usize {
        self.criteria.iter().filter(|result| result.met).count()
    }

    pub fn summary(&self) -> String {
        if self.employee_ineligible {
            "Not eligible: district employees cannot receive the waiver.".to_string()
        } else if self.qualifies {
            format!("Eligible: {} of 4 requirements met.", self.met_count())
        } else {
            format!(
                "Not yet eligible: {} of 4 requirements met (score {}).",
                self.met_count(),
                self.score
            )
        }
    }
}

/// Stateless evaluator applying the program rules to a Banner record.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    rules: EligibilityRules,
}

impl EligibilityEvaluator {
    pub fn new(rules: EligibilityRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    pub fn evaluate(&self, record: &EligibilityRecord) -> EligibilityOutcome {
        let (components, score, signals) = rules::score_record(record, &self.rules);

        let employee_ineligible = signals.employee;
        // Employment disqualifies whatever threshold the rules carry.
        let qualifies = !employee_ineligible && score >= self.rules.qualifying_score;

        EligibilityOutcome {
            score,
            qualifies,
            employee_ineligible,
            panel_shown: !employee_ineligible,
            criteria: signals.criteria,
            components,
        }
    }
}
