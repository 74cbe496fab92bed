use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::portal::gateway::{BannerGateway, EligibilityQuery, GatewayError};
use crate::portal::record::{EligibilityRecord, Indicator};
use crate::portal::term::Term;
use crate::portal::{EligibilityEvaluator, EligibilityPortal};

pub(super) fn terms() -> Vec<Term> {
    vec![
        Term {
            code: "202530".to_string(),
            description: "Spring 2025".to_string(),
        },
        Term {
            code: "202510".to_string(),
            description: "Winter 2025".to_string(),
        },
        Term {
            code: "202450".to_string(),
            description: "Fall 2024".to_string(),
        },
    ]
}

pub(super) fn qualifying_record() -> EligibilityRecord {
    EligibilityRecord {
        stu_name: Some("Rivera, Ana".to_string()),
        address_type: Some("MA".to_string()),
        street1: Some("14000 Fruitvale Ave".to_string()),
        city: Some("Saratoga".to_string()),
        state: Some("CA".to_string()),
        zip: Some("95070".to_string()),
        employee_ind: Indicator::No,
        fafsa_ind: Indicator::Yes,
        level_code: Some("CR".to_string()),
        decode_resd_code: Indicator::Yes,
        service_zip_ind: Indicator::Yes,
        exempt_lvl: None,
    }
}

pub(super) fn record_with(
    employee: bool,
    fafsa: bool,
    credit: bool,
    residency: bool,
    service_zip: bool,
    exempt_aa: bool,
) -> EligibilityRecord {
    EligibilityRecord {
        employee_ind: employee.into(),
        fafsa_ind: fafsa.into(),
        level_code: Some(if credit { "CR" } else { "NC" }.to_string()),
        decode_resd_code: residency.into(),
        service_zip_ind: service_zip.into(),
        exempt_lvl: exempt_aa.then(|| "AA".to_string()),
        ..qualifying_record()
    }
}

/// In-memory gateway recording every eligibility query it receives.
#[derive(Default)]
pub(super) struct MemoryGateway {
    pub terms: Option<Vec<Term>>,
    pub record: Option<EligibilityRecord>,
    pub queries: Mutex<Vec<EligibilityQuery>>,
    pub term_requests: AtomicUsize,
}

impl MemoryGateway {
    pub fn serving(record: EligibilityRecord) -> Self {
        Self {
            terms: Some(terms()),
            record: Some(record),
            ..Self::default()
        }
    }

    pub fn eligibility_requests(&self) -> Vec<EligibilityQuery> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

impl BannerGateway for MemoryGateway {
    async fn list_terms(&self, max: u16) -> Result<Vec<Term>, GatewayError> {
        self.term_requests.fetch_add(1, Ordering::SeqCst);
        match &self.terms {
            Some(terms) => Ok(terms.iter().take(usize::from(max)).cloned().collect()),
            None => Err(GatewayError::Unavailable("terms offline".to_string())),
        }
    }

    async fn fetch_eligibility(
        &self,
        query: &EligibilityQuery,
    ) -> Result<EligibilityRecord, GatewayError> {
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());
        self.record
            .clone()
            .ok_or_else(|| GatewayError::Empty("virtualDomains.free_tuition_gid".to_string()))
    }
}

pub(super) fn portal(
    gateway: MemoryGateway,
) -> (Arc<EligibilityPortal<MemoryGateway>>, Arc<MemoryGateway>) {
    let gateway = Arc::new(gateway);
    let portal = Arc::new(EligibilityPortal::new(
        gateway.clone(),
        EligibilityEvaluator::default(),
    ));
    (portal, gateway)
}
