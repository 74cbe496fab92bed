use super::super::record::EligibilityRecord;
use super::{Criterion, CriterionResult, EligibilityRules, ScoreComponent, ScoreFactor};

pub(crate) struct ScoreSignals {
    pub employee: bool,
    pub criteria: Vec<CriterionResult>,
}

pub(crate) fn score_record(
    record: &EligibilityRecord,
    rules: &EligibilityRules,
) -> (Vec<ScoreComponent>, i8, ScoreSignals) {
    let mut components = Vec::new();
    let mut total_score: i8 = 0;

    let employee = record.employee_ind.is_set();
    if employee {
        components.push(ScoreComponent {
            factor: ScoreFactor::Employment,
            score: -1,
            notes: "current district employee".to_string(),
        });
        total_score -= 1;
    }

    let mut criteria = Vec::with_capacity(4);
    for criterion in Criterion::ordered() {
        let (met, notes) = check(criterion, record, rules);
        if met {
            components.push(ScoreComponent {
                factor: ScoreFactor::Requirement(criterion),
                score: 1,
                notes,
            });
            total_score += 1;
        }
        criteria.push(CriterionResult { criterion, met });
    }

    (
        components,
        total_score,
        ScoreSignals { employee, criteria },
    )
}

fn check(
    criterion: Criterion,
    record: &EligibilityRecord,
    rules: &EligibilityRules,
) -> (bool, String) {
    match criterion {
        Criterion::FafsaFiled => (
            record.fafsa_ind.is_set(),
            "financial aid application on file".to_string(),
        ),
        Criterion::CreditLevel => {
            let level = record.level_code.as_deref().unwrap_or_default();
            (
                level == rules.credit_level_code,
                format!("student level {level}"),
            )
        }
        Criterion::ResidencyDecoded => (
            record.decode_resd_code.is_set(),
            "residency decodes as in-state".to_string(),
        ),
        Criterion::ServiceAreaOrExempt => {
            let in_service_area = record.service_zip_ind.is_set();
            let exempt = record.exempt_lvl.as_deref() == Some(rules.exempt_level_code.as_str());
            let notes = if in_service_area {
                "address zip within service area".to_string()
            } else {
                format!("exemption level {}", rules.exempt_level_code)
            };
            (in_service_area || exempt, notes)
        }
    }
}
