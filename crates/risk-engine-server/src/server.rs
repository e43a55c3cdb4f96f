use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use risk_engine_core::evaluate;
use risk_engine_storage::{
    MemoryEvaluationStore, NewEvaluation, PersistentEvaluationStore, StorageBackend, StorageError,
};
use serde_json::{json, Value};

use crate::api::{ApiError, EvaluationDetail, RiskRequest, RiskResponse};
use crate::config::{ServerConfig, StorageTarget};
use crate::http::{read_http_request, write_http_response, HttpRequest, HttpResponse};

const EVALUATIONS_PREFIX: &str = "/api/evaluations/";
const COMPANY_SEGMENT: &str = "company/";

/// How long a connection may sit idle while its request or response is in flight.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RiskServer {
    store: Arc<Mutex<Box<dyn StorageBackend>>>,
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Root,
    Docs,
    Evaluate,
    Evaluation(String),
    CompanyEvaluations(String),
    Health,
}

impl Route {
    fn resolve(path: &str) -> Option<Self> {
        match path {
            "/" => return Some(Self::Root),
            "/docs" => return Some(Self::Docs),
            "/api/evaluate" => return Some(Self::Evaluate),
            "/api/health" => return Some(Self::Health),
            _ => {}
        }
        let rest = path.strip_prefix(EVALUATIONS_PREFIX)?;
        if let Some(company) = rest.strip_prefix(COMPANY_SEGMENT) {
            if company.is_empty() || company.contains('/') {
                return None;
            }
            return Some(Self::CompanyEvaluations(company.to_string()));
        }
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(Self::Evaluation(rest.to_string()))
    }

    fn method(&self) -> &'static str {
        match self {
            Self::Evaluate => "POST",
            _ => "GET",
        }
    }
}

impl RiskServer {
    pub fn new(config: &ServerConfig) -> Result<Self, StorageError> {
        let store: Box<dyn StorageBackend> = match &config.storage {
            StorageTarget::Memory => Box::new(MemoryEvaluationStore::new()),
            StorageTarget::JsonFile(path) => Box::new(PersistentEvaluationStore::open(path)?),
        };
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: Box<dyn StorageBackend>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        tracing::info!(addr = %listener.local_addr()?, "risk engine http listening");
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    let spawned = thread::Builder::new()
                        .name("risk-engine-http".to_string())
                        .spawn(move || {
                            if let Err(err) = server.handle_http_connection(stream) {
                                tracing::warn!(error = %err, "http request error");
                            }
                        });
                    if let Err(err) = spawned {
                        tracing::error!(error = %err, "failed to spawn connection handler");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "http accept error");
                }
            }
        }
        Ok(())
    }

    fn handle_http_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(CONNECTION_TIMEOUT))?;
        stream.set_write_timeout(Some(CONNECTION_TIMEOUT))?;

        let req = match read_http_request(&stream) {
            Ok(Some(req)) => req,
            Ok(None) => return Ok(()),
            Err(err) if err.is_disconnect() => {
                tracing::debug!(error = %err, "dropping incomplete http request");
                return Ok(());
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejecting unreadable http request");
                let response = ApiError::from(err).into_response();
                return write_http_response(&mut stream, &response);
            }
        };
        let response = self.dispatch(req);
        write_http_response(&mut stream, &response)
    }

    pub fn dispatch(&self, req: HttpRequest) -> HttpResponse {
        let method = req.method.clone();
        let path = req.path.clone();
        let response = self
            .route(req)
            .unwrap_or_else(ApiError::into_response);
        tracing::debug!(%method, %path, status = response.status, "handled request");
        response
    }

    fn route(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let Some(route) = Route::resolve(&req.path) else {
            return Err(ApiError::NotFound("Not Found".to_string()));
        };
        if req.method != route.method() {
            return Err(ApiError::MethodNotAllowed);
        }

        match route {
            Route::Root => Ok(HttpResponse::redirect("/docs")),
            Route::Docs => Ok(HttpResponse::json(200, self.docs())),
            Route::Evaluate => self.evaluate(&req.body),
            Route::Evaluation(raw_id) => self.evaluation(&raw_id),
            Route::CompanyEvaluations(raw_name) => self.company_evaluations(&raw_name),
            Route::Health => Ok(HttpResponse::json(200, self.health())),
        }
    }

    fn evaluate(&self, body: &[u8]) -> Result<HttpResponse, ApiError> {
        let request = RiskRequest::from_body(body)?;
        let input = request.validate()?;
        if !request.additional_factors.is_empty() {
            tracing::debug!(
                company = %input.company_name,
                factors = ?request.additional_factors,
                "additional factors received"
            );
        }

        let result = evaluate(&input)?;

        let new_evaluation = NewEvaluation::from_result(request.user_id.as_str(), &input, &result);
        let evaluation_id = match self.store.lock().store(new_evaluation) {
            Ok(record) => Some(record.id),
            Err(err) => {
                tracing::error!(
                    company = %input.company_name,
                    error = %err,
                    "failed to persist evaluation"
                );
                None
            }
        };

        let response = RiskResponse::new(result, evaluation_id);
        let value = serde_json::to_value(&response)
            .map_err(|err| ApiError::Scoring(err.to_string()))?;
        Ok(HttpResponse::json(200, value))
    }

    fn evaluation(&self, raw_id: &str) -> Result<HttpResponse, ApiError> {
        let id = raw_id.parse::<u64>().map_err(|_| {
            ApiError::Validation(format!("evaluation id must be an integer, got {raw_id:?}"))
        })?;
        let record = self
            .store
            .lock()
            .fetch(id)
            .map_err(|_| ApiError::NotFound("Evaluation not found".to_string()))?;
        let detail = EvaluationDetail::from(record);
        let value =
            serde_json::to_value(&detail).map_err(|err| ApiError::Internal(err.to_string()))?;
        Ok(HttpResponse::json(200, value))
    }

    fn company_evaluations(&self, raw_name: &str) -> Result<HttpResponse, ApiError> {
        let name = urlencoding::decode(raw_name)
            .map_err(|err| ApiError::Validation(format!("invalid company name: {err}")))?;
        let records = self.store.lock().find_by_company(&name);
        let value =
            serde_json::to_value(&records).map_err(|err| ApiError::Internal(err.to_string()))?;
        Ok(HttpResponse::json(200, value))
    }

    fn docs(&self) -> Value {
        json!({
            "service": "risk-engine",
            "routes": [
                {"method": "POST", "path": "/api/evaluate"},
                {"method": "GET", "path": "/api/evaluations/{id}"},
                {"method": "GET", "path": "/api/evaluations/company/{company_name}"},
                {"method": "GET", "path": "/api/health"},
            ],
            "store": self.store_stats(),
        })
    }

    pub fn store_stats(&self) -> Value {
        self.store.lock().stats()
    }

    fn health(&self) -> Value {
        let connected = self.store.lock().health_check();
        if !connected {
            tracing::warn!("evaluation store health check failed");
        }
        let database = if connected { "connected" } else { "disconnected" };
        json!({"status": "healthy", "database": database})
    }
}
