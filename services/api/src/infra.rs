use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use efg_portal::config::AppConfig;
use efg_portal::error::AppError;
use efg_portal::portal::{
    BannerGateway, BannerHttpClient, EligibilityEvaluator, EligibilityPortal, EligibilityQuery,
    EligibilityRecord, GatewayError, Indicator, StudentGid, Term, TermCode,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn banner_portal(
    config: &AppConfig,
) -> Result<EligibilityPortal<BannerHttpClient>, AppError> {
    let client = BannerHttpClient::new(config.banner.base_url.clone())?;
    Ok(
        EligibilityPortal::new(Arc::new(client), EligibilityEvaluator::default())
            .with_default_term(config.portal.default_term.clone()),
    )
}

/// Offline stand-in for Banner used by the demo command.
#[derive(Debug, Clone)]
pub(crate) struct SampleGateway {
    terms: Vec<Term>,
    signed_in: EligibilityRecord,
    students: Vec<(String, EligibilityRecord)>,
}

impl Default for SampleGateway {
    fn default() -> Self {
        let signed_in = EligibilityRecord {
            stu_name: Some("Rivera, Ana".to_string()),
            address_type: Some("Mailing".to_string()),
            street1: Some("12345 El Monte Rd".to_string()),
            city: Some("Los Altos Hills".to_string()),
            state: Some("CA".to_string()),
            zip: Some("94022".to_string()),
            fafsa_ind: Indicator::Yes,
            level_code: Some("CR".to_string()),
            decode_resd_code: Indicator::Yes,
            service_zip_ind: Indicator::Yes,
            ..EligibilityRecord::default()
        };
        let employee = EligibilityRecord {
            stu_name: Some("Nguyen, Bao".to_string()),
            employee_ind: Indicator::Yes,
            fafsa_ind: Indicator::Yes,
            level_code: Some("CR".to_string()),
            decode_resd_code: Indicator::Yes,
            service_zip_ind: Indicator::Yes,
            ..EligibilityRecord::default()
        };
        let noncredit = EligibilityRecord {
            stu_name: Some("Okafor, Chidi".to_string()),
            address_type: Some("Permanent".to_string()),
            street1: Some("21250 Stevens Creek Blvd".to_string()),
            city: Some("Cupertino".to_string()),
            state: Some("CA".to_string()),
            zip: Some("95014".to_string()),
            fafsa_ind: Indicator::Yes,
            level_code: Some("NC".to_string()),
            decode_resd_code: Indicator::Yes,
            ..EligibilityRecord::default()
        };

        Self {
            terms: vec![
                Term {
                    code: "202530".to_string(),
                    description: "Spring 2025".to_string(),
                },
                Term {
                    code: "202520".to_string(),
                    description: "Winter 2025".to_string(),
                },
                Term {
                    code: "202450".to_string(),
                    description: "Fall 2024".to_string(),
                },
            ],
            students: vec![
                ("G00000001".to_string(), signed_in.clone()),
                ("G00000002".to_string(), employee),
                ("G00000003".to_string(), noncredit),
            ],
            signed_in,
        }
    }
}

impl SampleGateway {
    pub(crate) fn sample_gids(&self) -> impl Iterator<Item = &str> {
        self.students.iter().map(|(gid, _)| gid.as_str())
    }
}

impl BannerGateway for SampleGateway {
    async fn list_terms(&self, max: u16) -> Result<Vec<Term>, GatewayError> {
        Ok(self.terms.iter().take(usize::from(max)).cloned().collect())
    }

    async fn fetch_eligibility(
        &self,
        query: &EligibilityQuery,
    ) -> Result<EligibilityRecord, GatewayError> {
        match query {
            EligibilityQuery::SelfService { .. } => Ok(self.signed_in.clone()),
            EligibilityQuery::ByGid { gid, .. } => self
                .students
                .iter()
                .find(|(id, _)| id == gid.as_str())
                .map(|(_, record)| record.clone())
                .ok_or_else(|| GatewayError::Empty(format!("sample record {}", gid.as_str()))),
        }
    }
}

pub(crate) fn parse_term(raw: &str) -> Result<TermCode, String> {
    TermCode::parse(raw.trim()).map_err(|err| format!("failed to parse '{raw}' as a term ({err})"))
}

pub(crate) fn parse_gid(raw: &str) -> Result<StudentGid, String> {
    StudentGid::parse(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as a student id ({err})"))
}
