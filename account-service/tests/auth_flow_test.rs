//! End-to-end lifecycle tests over the HTTP surface.
//!
//! Requires a reachable PostgreSQL via DATABASE_URL; each test skips
//! itself when the variable is absent so the suite passes without
//! infrastructure. Mail runs in no-op mode, so verification codes are
//! read back from the store the way an operator would.

use actix_web::{test, web, App};
use uuid::Uuid;

use account_service::config::{
    AppConfig, Config, DatabaseConfig, EmailConfig, JwtConfig, OtpConfig,
};
use account_service::{routes, AppState};

async fn setup() -> Option<AppState> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let config = Config {
        app: AppConfig {
            env: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_ttl: 3600,
        },
        email: EmailConfig {
            smtp_host: String::new(), // no-op mail dispatcher
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "Upskill <noreply@upskill.dev>".to_string(),
            use_starttls: false,
        },
        otp: OtpConfig { ttl_minutes: 10 },
    };

    Some(
        AppState::initialize(config)
            .await
            .expect("failed to initialize app state"),
    )
}

macro_rules! init_app {
    ($state:expr) => {{
        let tokens = $state.tokens.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(move |cfg| routes::configure_routes(cfg, tokens)),
        )
        .await
    }};
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

async fn stored_otp(state: &AppState, email: &str) -> Option<String> {
    sqlx::query_scalar::<_, Option<String>>("SELECT otp FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&state.db)
        .await
        .expect("account row should exist")
}

/// A code guaranteed to differ from the stored one, same width
fn wrong_code(correct: &str) -> String {
    correct
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                char::from_digit((c.to_digit(10).unwrap() + 1) % 10, 10).unwrap()
            } else {
                c
            }
        })
        .collect()
}

#[actix_web::test]
async fn register_login_verify_flow() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    // Register -> 201
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "name": "Asha",
                "email": email,
                "password": "P@ssw0rd1"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    // Login before verification -> 403
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": email, "password": "P@ssw0rd1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    // Verify with the issued code -> 200
    let code = stored_otp(&state, &email).await.expect("code outstanding");
    assert_eq!(code.len(), 6);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Verified account carries no outstanding code
    assert!(stored_otp(&state, &email).await.is_none());

    // Login now succeeds and returns a token
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": email, "password": "P@ssw0rd1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token in response");
    assert!(!token.is_empty());

    // The token opens the profile
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let profile: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(profile["email"], serde_json::json!(email));
    assert_eq!(profile["is_verified"], serde_json::json!(true));
    // Credential and verification fields are never exposed
    assert!(profile.get("password_hash").is_none());
    assert!(profile.get("otp").is_none());
    assert!(profile.get("otp_expires").is_none());
}

#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    let payload = serde_json::json!({
        "name": "Asha",
        "email": email,
        "password": "P@ssw0rd1"
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn login_unknown_email_is_unauthorized() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({
                "email": unique_email(),
                "password": "P@ssw0rd1"
            }))
            .to_request(),
    )
    .await;
    // Indistinguishable from a wrong password
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let code = stored_otp(&state, &email).await.expect("code outstanding");
    state.lifecycle.verify_otp(&email, &code).await.expect("verify");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": email, "password": "Wr0ng!pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn verify_rejects_wrong_code_and_second_attempt() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let code = stored_otp(&state, &email).await.expect("code outstanding");

    // Wrong code -> 400
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": wrong_code(&code) }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // Correct code -> 200
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Re-verifying, even with the previously-correct code -> 400
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], serde_json::json!("ALREADY_VERIFIED"));
}

#[actix_web::test]
async fn resend_invalidates_previous_code() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let first = stored_otp(&state, &email).await.expect("code outstanding");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/resend-otp")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let second = stored_otp(&state, &email).await.expect("code outstanding");

    // The original code no longer verifies, whether or not the draw collided
    if first != second {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/verify-otp")
                .set_json(serde_json::json!({ "email": email, "otp": first }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": second }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn expired_code_recovers_via_resend() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let code = stored_otp(&state, &email).await.expect("code outstanding");

    // Age the code past its expiry
    sqlx::query("UPDATE users SET otp_expires = CURRENT_TIMESTAMP - INTERVAL '1 minute' WHERE email = $1")
        .bind(&email)
        .execute(&state.db)
        .await
        .expect("age the code");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], serde_json::json!("OTP_EXPIRED"));

    // Resend issues a usable replacement
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/resend-otp")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let fresh = stored_otp(&state, &email).await.expect("code outstanding");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": fresh }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn account_without_usable_code_recovers_via_resend() {
    // The partial-failure state: the account row exists but no code is
    // outstanding (mail delivery failed after creation). Resend is the
    // recovery path.
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");

    sqlx::query("UPDATE users SET otp = NULL, otp_expires = NULL WHERE email = $1")
        .bind(&email)
        .execute(&state.db)
        .await
        .expect("clear the code");

    // No outstanding code: any candidate is invalid
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": "123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/resend-otp")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let fresh = stored_otp(&state, &email).await.expect("code outstanding");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": fresh }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn resend_for_verified_account_rejected() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let code = stored_otp(&state, &email).await.expect("code outstanding");
    state.lifecycle.verify_otp(&email, &code).await.expect("verify");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/resend-otp")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn unknown_email_is_not_found_for_verify_and_resend() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(serde_json::json!({ "email": email, "otp": "123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/resend-otp")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn register_rejects_malformed_input() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);

    // Missing password
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({ "name": "Asha", "email": unique_email() }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // Malformed email
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "name": "Asha",
                "email": "not-an-email",
                "password": "P@ssw0rd1"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // Weak password
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "name": "Asha",
                "email": unique_email(),
                "password": "password"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn profile_update_and_skills_roundtrip() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);
    let email = unique_email();

    state
        .lifecycle
        .register("Asha", &email, "P@ssw0rd1")
        .await
        .expect("register");
    let code = stored_otp(&state, &email).await.expect("code outstanding");
    state.lifecycle.verify_otp(&email, &code).await.expect("verify");
    let outcome = state.lifecycle.login(&email, "P@ssw0rd1").await.expect("login");
    let auth = ("Authorization", format!("Bearer {}", outcome.token));

    // Fresh profile is incomplete
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let profile: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(profile["is_profile_complete"], serde_json::json!(false));

    // Filling the required fields completes it
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/users/me")
            .insert_header(auth.clone())
            .set_json(serde_json::json!({
                "engagement_status": "self-employed",
                "qualification": "12th",
                "learning_availability": { "hours_per_week": 6, "preferred_mode": "online" }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["is_profile_complete"], serde_json::json!(true));
    assert_eq!(
        body["user"]["engagement_status"],
        serde_json::json!("self-employed")
    );

    // Add a skill, reject its duplicate
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/me/skills")
            .insert_header(auth.clone())
            .set_json(serde_json::json!({ "type": "technical", "skill": "rust" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/me/skills")
            .insert_header(auth.clone())
            .set_json(serde_json::json!({ "type": "technical", "skill": "rust" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // Remove it, then removing again is a 404
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/me/skills/rust?type=technical")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/me/skills/rust?type=technical")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn profile_requires_bearer_token() {
    let Some(state) = setup().await else { return };
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/users/me").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}
