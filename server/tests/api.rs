use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use student_server::{app, app_with, Config};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn with_bearer(mut request: Request<String>, token: &str) -> Request<String> {
    request.headers_mut().insert(
        http::header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

/// Send one request through a router that keeps its state between calls.
async fn send(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

async fn login(app: &mut Router) -> String {
    let resp = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"admin","password":"admin123"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

// --- list ---

#[tokio::test]
async fn list_students_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/students"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"success": true, "data": []}));
}

// --- create ---

#[tokio::test]
async fn create_student_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Ana","edad":20,"carrera":"CS"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(resp).await,
        json!({"success": true, "data": {"id": 1, "nombre": "Ana", "edad": 20, "carrera": "CS"}})
    );
}

#[tokio::test]
async fn create_student_stores_truthy_values_as_given() {
    let bodies = [
        (r#"{"nombre":"Ana","edad":"20","carrera":"CS"}"#, json!("Ana"), json!("20")),
        (r#"{"nombre":"Ana","edad":20.5,"carrera":"CS"}"#, json!("Ana"), json!(20.5)),
        (r#"{"nombre":"Ana","edad":-3,"carrera":"CS"}"#, json!("Ana"), json!(-3)),
        (r#"{"nombre":"Ana","edad":"veinte","carrera":"CS"}"#, json!("Ana"), json!("veinte")),
        (r#"{"nombre":123,"edad":20,"carrera":"CS"}"#, json!(123), json!(20)),
    ];

    let mut app = app();
    for (body, name, age) in bodies {
        let resp = send(&mut app, json_request("POST", "/api/students", body)).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "{body}");
        let data = body_json(resp).await["data"].clone();
        assert_eq!(data["nombre"], name, "{body}");
        assert_eq!(data["edad"], age, "{body}");
    }

    let resp = send(&mut app, empty_request("GET", "/api/students")).await;
    assert_eq!(body_json(resp).await["data"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn create_student_missing_or_falsy_fields_returns_400() {
    let bodies = [
        r#"{"edad":20,"carrera":"CS"}"#,
        r#"{"nombre":"Ana","carrera":"CS"}"#,
        r#"{"nombre":"Ana","edad":20}"#,
        r#"{"nombre":"","edad":20,"carrera":"CS"}"#,
        r#"{"nombre":"Ana","edad":0,"carrera":"CS"}"#,
        r#"{"nombre":"Ana","edad":20,"carrera":""}"#,
        r#"{}"#,
    ];

    let mut app = app();
    for body in bodies {
        let resp = send(&mut app, json_request("POST", "/api/students", body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            body_json(resp).await,
            json!({"success": false, "message": "Faltan campos obligatorios"}),
            "{body}"
        );
    }

    let resp = send(&mut app, empty_request("GET", "/api/students")).await;
    assert_eq!(body_json(resp).await["data"], json!([]));
}

#[tokio::test]
async fn create_student_malformed_json_goes_through_the_error_boundary() {
    let mut app = app();
    for body in ["{not json", "[1, 2]", r#""nombre""#] {
        let resp = send(&mut app, json_request("POST", "/api/students", body)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{body}");
        let body_value = body_json(resp).await;
        assert_eq!(body_value["success"], false, "{body}");
        assert!(body_value["error"].is_string(), "{body}");
        assert!(body_value.get("message").is_none(), "{body}");
    }

    let resp = send(&mut app, empty_request("GET", "/api/students")).await;
    assert_eq!(body_json(resp).await["data"], json!([]));
}

// --- get ---

#[tokio::test]
async fn get_student_never_issued_returns_404() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/students/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({"success": false, "message": "Estudiante no encontrado"})
    );
}

#[tokio::test]
async fn get_student_non_numeric_id_returns_404() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/students/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Estudiante no encontrado");
}

// --- update ---

#[tokio::test]
async fn update_student_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/students/1",
            r#"{"nombre":"Nadie"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_falsy_values_keeps_existing_fields() {
    let mut app = app();
    send(
        &mut app,
        json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Ana","edad":20,"carrera":"CS"}"#,
        ),
    )
    .await;

    let resp = send(
        &mut app,
        json_request("PUT", "/api/students/1", r#"{"edad":0,"nombre":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["edad"], 20);
    assert_eq!(body["data"]["nombre"], "Ana");

    let resp = send(
        &mut app,
        json_request("PUT", "/api/students/1", r#"{"carrera":"Math"}"#),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({"id": 1, "nombre": "Ana", "edad": 20, "carrera": "Math"})
    );
}

// --- delete ---

#[tokio::test]
async fn delete_missing_student_keeps_store() {
    let mut app = app();
    send(
        &mut app,
        json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Ana","edad":20,"carrera":"CS"}"#,
        ),
    )
    .await;

    let resp = send(&mut app, empty_request("DELETE", "/api/students/5")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Estudiante no encontrado");

    let resp = send(&mut app, empty_request("GET", "/api/students")).await;
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);
}

// --- full scenario ---

#[tokio::test]
async fn create_delete_list_scenario() {
    let mut app = app();

    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Ana","edad":20,"carrera":"CS"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["id"], 1);

    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Luis","edad":22,"carrera":"Math"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["id"], 2);

    let resp = send(&mut app, empty_request("DELETE", "/api/students/1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["id"], 1);

    let resp = send(&mut app, empty_request("GET", "/api/students")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "success": true,
            "data": [{"id": 2, "nombre": "Luis", "edad": 22, "carrera": "Math"}]
        })
    );

    // A new student after the delete gets a fresh id.
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/students",
            r#"{"nombre":"Eva","edad":30,"carrera":"Bio"}"#,
        ),
    )
    .await;
    assert_eq!(body_json(resp).await["data"]["id"], 3);
}

// --- auxiliary endpoints ---

#[tokio::test]
async fn banner_reports_environment() {
    let config = Config {
        environment: "production".to_string(),
        hostname: Some("node-1".to_string()),
        ..Config::default()
    };
    let resp = app_with(config)
        .oneshot(empty_request("GET", "/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "¡Aplicación CI/CD en AWS funcionando correctamente!"
    );
    assert_eq!(body["data"]["environment"], "production");
    assert_eq!(body["data"]["hostname"], "node-1");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn health_reports_uptime_and_timestamp() {
    let resp = app()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn info_is_static_metadata() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/info"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["project"], "Proyecto Final CI/CD");
    assert_eq!(body["cicd"], "GitHub Actions");
}

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/nothing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({"success": false, "message": "Ruta no encontrada"})
    );
}

#[tokio::test]
async fn unsupported_method_returns_404_envelope() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/api/students"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Ruta no encontrada");
}

#[tokio::test]
async fn panicking_handler_returns_500_envelope() {
    let mut app = app();
    let resp = send(&mut app, empty_request("GET", "/error")).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({"success": false, "error": "Error de prueba"})
    );

    // The router keeps serving after the panic.
    let resp = send(&mut app, empty_request("GET", "/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/students"))
        .await
        .unwrap();

    let headers = resp.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers.contains_key("strict-transport-security"));
}

// --- auth & users ---

#[tokio::test]
async fn login_with_bad_credentials_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"admin","password":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "Credenciales inválidas");
}

#[tokio::test]
async fn login_with_missing_fields_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"admin"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let mut app = app();
    let token = login(&mut app).await;

    let resp = send(
        &mut app,
        with_bearer(empty_request("GET", "/api/auth/me"), &token),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn users_require_a_valid_token() {
    let mut app = app();

    let resp = send(&mut app, empty_request("GET", "/api/users")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({"success": false, "message": "Sesión no válida"})
    );

    let resp = send(
        &mut app,
        with_bearer(empty_request("GET", "/api/users"), "forged"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_crud_lifecycle() {
    let mut app = app();
    let token = login(&mut app).await;

    let resp = send(
        &mut app,
        with_bearer(
            json_request(
                "POST",
                "/api/users",
                r#"{"username":"luis","email":"luis@example.com","password":"pw"}"#,
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await["data"].clone();
    assert_eq!(created["id"], 2);
    assert_eq!(created["role"], "user");
    assert_eq!(created["status"], "active");

    let resp = send(
        &mut app,
        with_bearer(
            json_request("PUT", "/api/users/2", r#"{"role":"guest","email":""}"#),
            &token,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await["data"].clone();
    assert_eq!(updated["role"], "guest");
    assert_eq!(updated["email"], "luis@example.com");

    let resp = send(
        &mut app,
        with_bearer(empty_request("GET", "/api/users"), &token),
    )
    .await;
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 2);

    let resp = send(
        &mut app,
        with_bearer(empty_request("DELETE", "/api/users/2"), &token),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["username"], "luis");

    let resp = send(
        &mut app,
        with_bearer(empty_request("GET", "/api/users/2"), &token),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Usuario no encontrado");
}

#[tokio::test]
async fn create_user_requires_username_and_email() {
    let mut app = app();
    let token = login(&mut app).await;

    let resp = send(
        &mut app,
        with_bearer(
            json_request("POST", "/api/users", r#"{"username":"solo"}"#),
            &token,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Faltan campos obligatorios");
}

#[tokio::test]
async fn deleting_a_user_revokes_its_tokens() {
    let mut app = app();
    let admin = login(&mut app).await;

    send(
        &mut app,
        with_bearer(
            json_request(
                "POST",
                "/api/users",
                r#"{"username":"luis","email":"luis@example.com","password":"pw"}"#,
            ),
            &admin,
        ),
    )
    .await;
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            r#"{"username":"luis","password":"pw"}"#,
        ),
    )
    .await;
    let luis = body_json(resp).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    send(
        &mut app,
        with_bearer(empty_request("DELETE", "/api/users/2"), &admin),
    )
    .await;

    let resp = send(
        &mut app,
        with_bearer(empty_request("GET", "/api/auth/me"), &luis),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
