#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use servizor_domain::config::AuthConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ADMIN_PASSWORD: &str = "secret";
pub const ISSUED_TOKEN: &str = "gAAAAA-fake-token";

#[derive(Debug, Clone)]
pub struct FakeService {
    pub id: String,
    pub name: String,
    pub service_type: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FakeEndpoint {
    pub id: String,
    pub service_id: String,
    pub url: String,
    pub interface: String,
    pub region: String,
}

#[derive(Default)]
struct FakeState {
    base_url: String,
    services: Vec<FakeService>,
    endpoints: Vec<FakeEndpoint>,
    requests: Vec<String>,
    auth_bodies: Vec<Value>,
    next_id: usize,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

type Shared = Arc<Mutex<FakeState>>;

/// An in-process Keystone v3 server holding its catalog in memory.
pub struct FakeKeystone {
    state: Shared,
    base_url: String,
}

impl FakeKeystone {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));

        let app = Router::new()
            .route("/v3/auth/tokens", post(issue_token))
            .route("/v3/services", get(list_services).post(create_service))
            .route("/v3/services/{id}", patch(update_service))
            .route("/v3/endpoints", get(list_endpoints).post(create_endpoint))
            .route("/v3/endpoints/{id}", patch(update_endpoint))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        state.lock().unwrap().base_url = base_url.clone();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Password credentials for the admin user.
    pub fn password_auth(&self) -> AuthConfig {
        AuthConfig {
            auth_url: Some(self.base_url.clone()),
            username: Some("admin".to_string()),
            password: Some(ADMIN_PASSWORD.to_string()),
            project_name: Some("admin".to_string()),
            ..Default::default()
        }
    }

    pub fn token_auth(&self, token: &str) -> AuthConfig {
        AuthConfig {
            auth_url: Some(format!("{}/v3/", self.base_url)),
            token: Some(token.to_string()),
            ..Default::default()
        }
    }

    pub fn seed_service(&self, service_type: &str, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("svc");
        state.services.push(FakeService {
            id: id.clone(),
            name: name.to_string(),
            service_type: service_type.to_string(),
            description: None,
        });
        id
    }

    pub fn seed_endpoint(&self, service_id: &str, url: &str, interface: &str, region: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("ep");
        state.endpoints.push(FakeEndpoint {
            id: id.clone(),
            service_id: service_id.to_string(),
            url: url.to_string(),
            interface: interface.to_string(),
            region: region.to_string(),
        });
        id
    }

    pub fn services(&self) -> Vec<FakeService> {
        self.state.lock().unwrap().services.clone()
    }

    pub fn endpoints(&self) -> Vec<FakeEndpoint> {
        self.state.lock().unwrap().endpoints.clone()
    }

    /// Method and path of every request served, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn auth_bodies(&self) -> Vec<Value> {
        self.state.lock().unwrap().auth_bodies.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

fn keystone_error(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": {
            "code": status.as_u16(),
            "message": message,
            "title": status.canonical_reason().unwrap_or_default(),
        }
    });
    (status, Json(body)).into_response()
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("X-Auth-Token").and_then(|v| v.to_str().ok()) {
        Some(ISSUED_TOKEN) => Ok(()),
        _ => Err(keystone_error(
            StatusCode::UNAUTHORIZED,
            "The request you have made requires authentication.",
        )),
    }
}

fn service_json(service: &FakeService) -> Value {
    json!({
        "id": service.id,
        "name": service.name,
        "type": service.service_type,
        "description": service.description,
        "enabled": true,
    })
}

fn endpoint_json(endpoint: &FakeEndpoint) -> Value {
    json!({
        "id": endpoint.id,
        "service_id": endpoint.service_id,
        "url": endpoint.url,
        "interface": endpoint.interface,
        "region_id": endpoint.region,
        "region": endpoint.region,
        "enabled": true,
    })
}

async fn issue_token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push("POST /v3/auth/tokens".to_string());
    state.auth_bodies.push(body.clone());

    let password = body["auth"]["identity"]["password"]["user"]["password"].as_str();
    if password != Some(ADMIN_PASSWORD) {
        return keystone_error(
            StatusCode::UNAUTHORIZED,
            "The request you have made requires authentication.",
        );
    }

    let catalog = json!({
        "token": {
            "methods": ["password"],
            "catalog": [
                {
                    "type": "identity",
                    "name": "keystone",
                    "endpoints": [
                        {"url": state.base_url, "interface": "public", "region_id": "RegionOne"},
                        {"url": "http://unreachable.invalid:35357/v3", "interface": "admin", "region_id": "RegionOne"},
                    ]
                }
            ]
        }
    });

    (
        StatusCode::CREATED,
        [("X-Subject-Token", ISSUED_TOKEN)],
        Json(catalog),
    )
        .into_response()
}

async fn list_services(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push("GET /v3/services".to_string());

    let services: Vec<Value> = state
        .services
        .iter()
        .filter(|s| query.get("type").is_none_or(|t| &s.service_type == t))
        .map(service_json)
        .collect();
    Json(json!({ "services": services })).into_response()
}

#[derive(Deserialize)]
struct ServiceBody {
    service: ServiceFields,
}

#[derive(Deserialize)]
struct ServiceFields {
    name: Option<String>,
    #[serde(rename = "type")]
    service_type: Option<String>,
    description: Option<String>,
}

async fn create_service(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ServiceBody>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push("POST /v3/services".to_string());

    let Some(service_type) = body.service.service_type else {
        return keystone_error(StatusCode::BAD_REQUEST, "'type' is a required property");
    };
    let id = state.next_id("svc");
    let service = FakeService {
        id,
        name: body.service.name.unwrap_or_default(),
        service_type,
        description: body.service.description,
    };
    let response = service_json(&service);
    state.services.push(service);
    (StatusCode::CREATED, Json(json!({ "service": response }))).into_response()
}

async fn update_service(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ServiceBody>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push(format!("PATCH /v3/services/{}", id));

    let Some(service) = state.services.iter_mut().find(|s| s.id == id) else {
        return keystone_error(
            StatusCode::NOT_FOUND,
            &format!("Could not find service: {}.", id),
        );
    };
    if let Some(name) = body.service.name {
        service.name = name;
    }
    if body.service.description.is_some() {
        service.description = body.service.description;
    }
    Json(json!({ "service": service_json(service) })).into_response()
}

async fn list_endpoints(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push("GET /v3/endpoints".to_string());

    let endpoints: Vec<Value> = state
        .endpoints
        .iter()
        .filter(|e| query.get("service_id").is_none_or(|v| &e.service_id == v))
        .filter(|e| query.get("interface").is_none_or(|v| &e.interface == v))
        .filter(|e| query.get("region_id").is_none_or(|v| &e.region == v))
        .map(endpoint_json)
        .collect();
    Json(json!({ "endpoints": endpoints })).into_response()
}

#[derive(Deserialize)]
struct EndpointBody {
    endpoint: EndpointFields,
}

#[derive(Deserialize)]
struct EndpointFields {
    service_id: Option<String>,
    url: Option<String>,
    interface: Option<String>,
    region_id: Option<String>,
}

async fn create_endpoint(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<EndpointBody>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push("POST /v3/endpoints".to_string());

    let fields = body.endpoint;
    let (Some(service_id), Some(url), Some(interface)) =
        (fields.service_id, fields.url, fields.interface)
    else {
        return keystone_error(StatusCode::BAD_REQUEST, "Invalid endpoint");
    };
    let id = state.next_id("ep");
    let endpoint = FakeEndpoint {
        id,
        service_id,
        url,
        interface,
        region: fields.region_id.unwrap_or_default(),
    };
    let response = endpoint_json(&endpoint);
    state.endpoints.push(endpoint);
    (StatusCode::CREATED, Json(json!({ "endpoint": response }))).into_response()
}

async fn update_endpoint(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<EndpointBody>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    state.requests.push(format!("PATCH /v3/endpoints/{}", id));

    let Some(endpoint) = state.endpoints.iter_mut().find(|e| e.id == id) else {
        return keystone_error(
            StatusCode::NOT_FOUND,
            &format!("Could not find endpoint: {}.", id),
        );
    };
    if let Some(url) = body.endpoint.url {
        endpoint.url = url;
    }
    Json(json!({ "endpoint": endpoint_json(endpoint) })).into_response()
}
