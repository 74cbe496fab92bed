use std::fmt::Debug;
use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::record::EligibilityRecord;
use super::term::{StudentGid, Term, TermCode};

/// Upper bound on the number of terms requested for the dropdown.
pub const TERM_LIST_LIMIT: u16 = 300;

const TERMS_DOMAIN: &str = "virtualDomains.efg_terms";
const SELF_SERVICE_DOMAIN: &str = "virtualDomains.free_tuition_single";
const BY_GID_DOMAIN: &str = "virtualDomains.free_tuition_gid";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("banner request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("banner endpoint {endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("banner endpoint {0} returned no records")]
    Empty(String),
    #[error("banner gateway unavailable: {0}")]
    Unavailable(String),
}

/// Which eligibility virtual domain to read and with what parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityQuery {
    /// The signed-in student; Banner resolves the identity from the session.
    SelfService { term: TermCode },
    /// Staff lookup of a specific student.
    ByGid { term: TermCode, gid: StudentGid },
}

impl EligibilityQuery {
    pub fn term(&self) -> &TermCode {
        match self {
            Self::SelfService { term } | Self::ByGid { term, .. } => term,
        }
    }

    fn domain(&self) -> &'static str {
        match self {
            Self::SelfService { .. } => SELF_SERVICE_DOMAIN,
            Self::ByGid { .. } => BY_GID_DOMAIN,
        }
    }
}

/// Read-only access to the Banner extensibility virtual domains.
pub trait BannerGateway: Send + Sync + 'static {
    fn list_terms(
        &self,
        max: u16,
    ) -> impl Future<Output = Result<Vec<Term>, GatewayError>> + Send;

    fn fetch_eligibility(
        &self,
        query: &EligibilityQuery,
    ) -> impl Future<Output = Result<EligibilityRecord, GatewayError>> + Send;
}

/// HTTP client for `{base_url}/virtualDomains.*`.
#[derive(Debug, Clone)]
pub struct BannerHttpClient {
    client: Client,
    base_url: String,
}

impl BannerHttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, domain: &str) -> String {
        format!("{}/{}", self.base_url, domain)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        domain: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, GatewayError> {
        let endpoint = self.endpoint(domain);
        debug!(%endpoint, "requesting banner virtual domain");

        let response = self.client.get(&endpoint).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

impl BannerGateway for BannerHttpClient {
    async fn list_terms(&self, max: u16) -> Result<Vec<Term>, GatewayError> {
        let max = max.to_string();
        self.get_rows(TERMS_DOMAIN, &[("max", max.as_str()), ("offset", "0")])
            .await
    }

    async fn fetch_eligibility(
        &self,
        query: &EligibilityQuery,
    ) -> Result<EligibilityRecord, GatewayError> {
        let mut params = vec![("max", "1"), ("offset", "0"), ("term", query.term().as_str())];
        if let EligibilityQuery::ByGid { gid, .. } = query {
            params.push(("gid", gid.as_str()));
        }

        let rows: Vec<EligibilityRecord> = self.get_rows(query.domain(), &params).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Empty(query.domain().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct SeenRequest {
        path: String,
        query: String,
        accept: Option<String>,
    }

    type SeenLog = Arc<Mutex<Vec<SeenRequest>>>;

    async fn banner_stub(State(seen): State<SeenLog>, uri: Uri, headers: HeaderMap) -> Response {
        seen.lock().expect("seen mutex poisoned").push(SeenRequest {
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            accept: headers
                .get("accept")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        });

        if uri.path().starts_with("/down/") {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        match uri.path().rsplit('/').next().unwrap_or_default() {
            TERMS_DOMAIN => {
                Json(json!([{"EFG_TERM": "202450", "STVTERM_DESC": "Fall 2024"}])).into_response()
            }
            BY_GID_DOMAIN => Json(json!([
                {"STU_NAME": "Rivera, Ana", "FAFSA_IND": "Y", "LEVEL_CODE": "CR"}
            ]))
            .into_response(),
            _ => Json(json!([])).into_response(),
        }
    }

    async fn spawn_banner() -> (String, SeenLog) {
        let seen = SeenLog::default();
        let app = Router::new()
            .fallback(banner_stub)
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub binds");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serves");
        });
        (format!("http://{addr}"), seen)
    }

    #[tokio::test]
    async fn client_sends_virtual_domain_parameters() {
        let (base, seen) = spawn_banner().await;
        let client = BannerHttpClient::new(format!("{base}/internalPb")).expect("client builds");
        let term = TermCode::default_term();

        let terms = client.list_terms(TERM_LIST_LIMIT).await.expect("terms load");
        assert_eq!(terms[0].code, "202450");

        let record = client
            .fetch_eligibility(&EligibilityQuery::ByGid {
                term: term.clone(),
                gid: StudentGid::parse("G00123456").expect("valid gid"),
            })
            .await
            .expect("record loads");
        assert_eq!(record.stu_name.as_deref(), Some("Rivera, Ana"));
        assert!(record.fafsa_ind.is_set());

        let own = client
            .fetch_eligibility(&EligibilityQuery::SelfService { term })
            .await;
        assert!(
            matches!(own, Err(GatewayError::Empty(ref domain)) if domain == SELF_SERVICE_DOMAIN)
        );

        let seen = seen.lock().expect("seen mutex poisoned").clone();
        let requests: Vec<(&str, &str)> = seen
            .iter()
            .map(|request| (request.path.as_str(), request.query.as_str()))
            .collect();
        assert_eq!(
            requests,
            vec![
                ("/internalPb/virtualDomains.efg_terms", "max=300&offset=0"),
                (
                    "/internalPb/virtualDomains.free_tuition_gid",
                    "max=1&offset=0&term=202450&gid=G00123456"
                ),
                (
                    "/internalPb/virtualDomains.free_tuition_single",
                    "max=1&offset=0&term=202450"
                ),
            ]
        );
        assert!(seen
            .iter()
            .all(|request| request.accept.as_deref() == Some("application/json")));
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_endpoint() {
        let (base, _) = spawn_banner().await;
        let client = BannerHttpClient::new(format!("{base}/down")).expect("client builds");

        let error = client
            .list_terms(TERM_LIST_LIMIT)
            .await
            .expect_err("unavailable banner");
        assert!(matches!(
            error,
            GatewayError::Status { status: 503, ref endpoint }
                if endpoint.ends_with("/down/virtualDomains.efg_terms")
        ));
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let client = BannerHttpClient::new("http://banner.local/BannerExtensibility/internalPb/")
            .expect("client builds");
        assert_eq!(
            client.endpoint(TERMS_DOMAIN),
            "http://banner.local/BannerExtensibility/internalPb/virtualDomains.efg_terms"
        );
    }

    #[test]
    fn query_selects_domain_by_view() {
        let term = TermCode::default_term();
        let staff = EligibilityQuery::ByGid {
            term: term.clone(),
            gid: StudentGid::parse("G00123456").expect("valid gid"),
        };
        let student = EligibilityQuery::SelfService { term };

        assert_eq!(staff.domain(), BY_GID_DOMAIN);
        assert_eq!(student.domain(), SELF_SERVICE_DOMAIN);
        assert_eq!(staff.term().as_str(), "202450");
    }
}
