//! Stateless HTTP request builder and response parser for the API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse` and
//! unwraps the envelope's `data`. CRUD operations are generic over
//! [`Entity`], so students and users share one code path.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, Entity, Envelope, LoginData, User};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const ME_PATH: &str = "/api/auth/me";

/// Synchronous, stateless client for the API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list<E: Entity>(&self) -> HttpRequest {
        self.request(HttpMethod::Get, E::RESOURCE.to_string())
    }

    pub fn build_get<E: Entity>(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/{id}", E::RESOURCE))
    }

    pub fn build_create<E: Entity>(&self, input: &E::Draft) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, E::RESOURCE.to_string(), input)
    }

    pub fn build_update<E: Entity>(&self, id: u64, input: &E::Patch) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("{}/{id}", E::RESOURCE), input)
    }

    pub fn build_delete<E: Entity>(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/{id}", E::RESOURCE))
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, LOGIN_PATH.to_string(), credentials)
    }

    pub fn build_me(&self) -> HttpRequest {
        self.request(HttpMethod::Get, ME_PATH.to_string())
    }

    pub fn parse_list<E: Entity>(&self, response: HttpResponse) -> Result<Vec<E>, ApiError> {
        parse_envelope(response, 200)
    }

    pub fn parse_get<E: Entity>(&self, response: HttpResponse) -> Result<E, ApiError> {
        parse_envelope(response, 200)
    }

    pub fn parse_create<E: Entity>(&self, response: HttpResponse) -> Result<E, ApiError> {
        parse_envelope(response, 201)
    }

    pub fn parse_update<E: Entity>(&self, response: HttpResponse) -> Result<E, ApiError> {
        parse_envelope(response, 200)
    }

    /// The server answers a delete with the removed record.
    pub fn parse_delete<E: Entity>(&self, response: HttpResponse) -> Result<E, ApiError> {
        parse_envelope(response, 200)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginData, ApiError> {
        parse_envelope(response, 200)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_envelope(response, 200)
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request.headers.push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

fn parse_envelope<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    envelope
        .data
        .ok_or_else(|| ApiError::DeserializationError("envelope has no `data`".to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = envelope_message(&response.body);
    match response.status {
        404 => Err(ApiError::NotFound { message }),
        401 => Err(ApiError::Unauthorized { message }),
        status => Err(ApiError::HttpError {
            status,
            message,
            body: response.body.clone(),
        }),
    }
}

/// Pull `message`, or failing that `error`, out of an error envelope.
fn envelope_message(body: &str) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope.message.or(envelope.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewStudent, Student, StudentPatch};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list::<Student>();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/students");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_includes_id() {
        let req = client().build_get::<User>(7);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/users/7");
    }

    #[test]
    fn build_create_serializes_wire_names() {
        let input = NewStudent {
            name: "Ana".to_string(),
            age: 20,
            program: "CS".to_string(),
        };
        let req = client().build_create::<Student>(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"nombre": "Ana", "edad": 20, "carrera": "CS"}));
    }

    #[test]
    fn build_update_omits_absent_fields() {
        let patch = StudentPatch {
            program: Some("Math".to_string()),
            ..StudentPatch::default()
        };
        let req = client().build_update::<Student>(1, &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/students/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"carrera": "Math"}));
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete::<Student>(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_login_posts_credentials() {
        let creds = Credentials {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        };
        let req = client().build_login(&creds).unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/auth/login");
        assert_eq!(req.method, HttpMethod::Post);
    }

    #[test]
    fn parse_list_unwraps_envelope() {
        let resp = response(
            200,
            r#"{"success":true,"data":[{"id":2,"nombre":"Luis","edad":22,"carrera":"Math"}]}"#,
        );
        let students = client().parse_list::<Student>(resp).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Luis");
    }

    #[test]
    fn parse_get_not_found_keeps_message() {
        let resp = response(404, r#"{"success":false,"message":"Estudiante no encontrado"}"#);
        let err = client().parse_get::<Student>(resp).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.server_message(), Some("Estudiante no encontrado"));
    }

    #[test]
    fn parse_create_expects_201() {
        let resp = response(
            200,
            r#"{"success":true,"data":{"id":1,"nombre":"Ana","edad":20,"carrera":"CS"}}"#,
        );
        let err = client().parse_create::<Student>(resp).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 200, .. }));
    }

    #[test]
    fn parse_internal_error_reads_error_field() {
        let resp = response(500, r#"{"success":false,"error":"Error de prueba"}"#);
        let err = client().parse_list::<Student>(resp).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
        assert_eq!(err.server_message(), Some("Error de prueba"));
    }

    #[test]
    fn parse_unauthorized() {
        let resp = response(401, r#"{"success":false,"message":"Sesión no válida"}"#);
        let err = client().parse_me(resp).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_list::<Student>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_envelope_without_data() {
        let err = client()
            .parse_list::<Student>(response(200, r#"{"success":true}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:3000/");
        let req = client.build_list::<Student>();
        assert_eq!(req.path, "http://localhost:3000/api/students");
    }
}
