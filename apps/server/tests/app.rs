use axum::body::Body;
use axum::http::{Request, StatusCode};
use crwa::domain::Environment;
use crwa::domain::config::AppConfig;
use crwa::domain::keys::KeyBundle;
use crwa::kernel::server::{Blueprint, BlueprintError, BlueprintRegistry};
use crwa_server::{App, AppError, ConfigSource, DocsError, create_app};
use crwa_vault::VaultError;
use http_body_util::BodyExt;
use serde_json::Value;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

const PASSWORD: &str = "river-charles";

fn sample_keys() -> KeyBundle {
    let mut keys = KeyBundle::new();
    keys.insert("flask", "secret_key", "signing-value").insert("twitter", "api_key", "t-key");
    keys
}

/// A profile whose vault file does not exist.
fn without_vault(environment: Environment, dir: &TempDir) -> AppConfig {
    let mut cfg = AppConfig::for_environment(environment);
    cfg.vault.path = dir.path().join("missing.bin");
    cfg.vault.password = Some(PASSWORD.to_owned());
    cfg
}

fn with_vault(environment: Environment, dir: &TempDir, keys: &KeyBundle) -> AppConfig {
    let path = dir.path().join("vault.bin");
    crwa_vault::write_keys(&path, keys, PASSWORD).expect("vault written");

    let mut cfg = AppConfig::for_environment(environment);
    cfg.vault.path = path;
    cfg.vault.password = Some(PASSWORD.to_owned());
    cfg
}

async fn get(app: &App, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    (status, response.into_body().collect().await.expect("body").to_bytes().to_vec())
}

fn empty(name: &'static str) -> Result<Blueprint, BlueprintError> {
    Ok(Blueprint::new(name, OpenApiRouter::new()))
}

fn bp_a(_: &AppConfig) -> Result<Blueprint, BlueprintError> {
    empty("a")
}

fn bp_b(_: &AppConfig) -> Result<Blueprint, BlueprintError> {
    empty("b")
}

fn bp_private(_: &AppConfig) -> Result<Blueprint, BlueprintError> {
    empty("_private")
}

fn letters() -> BlueprintRegistry {
    BlueprintRegistry::new().register("a", bp_a).register("_private", bp_private).register("b", bp_b)
}

// --- Secrets ---

#[test]
fn secret_key_comes_from_the_vault() {
    let dir = TempDir::new().expect("tempdir");
    let app = create_app(with_vault(Environment::Development, &dir, &sample_keys())).expect("app");

    assert!(!app.is_degraded());
    assert_eq!(app.config().keys.as_ref(), Some(&sample_keys()));
    let secret = app.config().secret_key.as_ref().expect("secret key");
    assert_eq!(secret.expose(), "signing-value");
}

#[test]
fn production_with_a_vault_is_not_degraded() {
    let dir = TempDir::new().expect("tempdir");
    let app = create_app(with_vault(Environment::Production, &dir, &sample_keys())).expect("app");

    assert!(!app.is_degraded());
    assert_eq!(app.config().environment, Environment::Production);
}

#[test]
fn production_without_a_vault_fails() {
    let dir = TempDir::new().expect("tempdir");
    let err = create_app(without_vault(Environment::Production, &dir)).expect_err("must fail");

    assert!(matches!(err, AppError::VaultUnavailable { source: VaultError::Io { .. }, .. }));
    assert!(err.to_string().starts_with("Vault unavailable"));
}

#[test]
fn production_without_the_signing_secret_fails() {
    let dir = TempDir::new().expect("tempdir");
    let mut keys = KeyBundle::new();
    keys.insert("twitter", "api_key", "t-key");

    let err = create_app(with_vault(Environment::Production, &dir, &keys)).expect_err("must fail");
    assert!(matches!(err, AppError::VaultUnavailable { source: VaultError::MissingSecret { .. }, .. }));
}

#[test]
fn wrong_password_in_production_fails() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = with_vault(Environment::Production, &dir, &sample_keys());
    cfg.vault.password = Some("not-the-password".to_owned());

    let err = create_app(cfg).expect_err("must fail");
    assert!(matches!(err, AppError::VaultUnavailable { source: VaultError::Decryption { .. }, .. }));
}

#[test]
fn missing_vault_outside_production_degrades() {
    for environment in [Environment::Development, Environment::Testing] {
        let dir = TempDir::new().expect("tempdir");
        let app = create_app(without_vault(environment, &dir)).expect("app");

        assert!(app.is_degraded(), "{environment} should be degraded");
        assert!(app.config().keys.is_none());
        assert!(app.config().secret_key.is_none());
        assert_eq!(app.blueprints(), ["api", "flagging"]);
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn degraded_startup_logs_a_warning() {
    let dir = TempDir::new().expect("tempdir");
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    let app = tracing::subscriber::with_default(subscriber, || {
        create_app(without_vault(Environment::Testing, &dir))
    })
    .expect("app");

    assert!(app.is_degraded());
    let logs = String::from_utf8(captured.0.lock().expect("log buffer").clone()).expect("utf8");
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("Vault unavailable, continuing without secrets"), "{logs}");
}

#[tokio::test]
async fn health_reports_degraded_state() {
    let dir = TempDir::new().expect("tempdir");
    let app = create_app(without_vault(Environment::Testing, &dir)).expect("app");

    let (status, body) = get(&app, "/health").await;
    let body: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["environment"], "testing");
}

// --- Configuration sources ---

#[test]
fn named_profiles_select_their_environment() {
    for (name, environment) in [
        ("development", Environment::Development),
        ("testing", Environment::Testing),
        ("prod", Environment::Production),
    ] {
        let dir = TempDir::new().expect("tempdir");
        let mut cfg = ConfigSource::from(name).resolve().expect("known profile");
        cfg.vault = with_vault(environment, &dir, &sample_keys()).vault.clone();

        let app = create_app(cfg).expect("app");
        assert_eq!(app.config().environment, environment, "{name}");
        assert_eq!(app.config().debug, !environment.is_production(), "{name}");
        assert!(!app.is_degraded(), "{name}");
    }
}

#[test]
fn environment_source_uses_its_profile() {
    let app = create_app(Environment::Testing).expect("app");
    assert!(app.config().testing);
    assert!(app.config().debug);
}

#[test]
fn unknown_profile_name_is_a_config_error() {
    let err = create_app("staging").expect_err("unknown profile");
    assert!(matches!(err, AppError::Config { .. }));
    assert!(err.to_string().contains("staging"));
}

// --- Blueprints ---

#[test]
fn explicit_list_is_registered_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.blueprints = Some(vec!["flagging".to_owned(), "api".to_owned()]);

    let app = create_app(cfg).expect("app");
    assert_eq!(app.blueprints(), ["flagging", "api"]);
}

#[test]
fn explicit_list_ignores_other_registry_entries() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.blueprints = Some(vec!["b".to_owned(), "_private".to_owned()]);

    let app = App::builder().config(cfg).registry(letters()).build().expect("app");
    assert_eq!(app.blueprints(), ["b", "_private"]);
}

#[test]
fn without_a_list_every_public_blueprint_is_registered_once() {
    let dir = TempDir::new().expect("tempdir");
    let app = App::builder()
        .config(without_vault(Environment::Testing, &dir))
        .registry(letters())
        .build()
        .expect("app");

    assert_eq!(app.blueprints(), ["a", "b"]);
}

#[test]
fn unknown_blueprint_aborts_startup() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.blueprints = Some(vec!["api".to_owned(), "predictions".to_owned()]);

    let err = create_app(cfg).expect_err("unknown blueprint");
    assert!(matches!(err, AppError::Registrar { .. }));
    assert!(err.to_string().contains("'predictions'"));
}

// --- Documentation ---

#[tokio::test]
async fn docs_ui_and_spec_respond() {
    let dir = TempDir::new().expect("tempdir");
    let app = create_app(without_vault(Environment::Testing, &dir)).expect("app");

    let (status, body) = get(&app, "/api/docs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("<html"));

    let (status, body) = get(&app, "/api/reach_api.json").await;
    assert_eq!(status, StatusCode::OK);
    let spec: Value = serde_json::from_slice(&body).expect("json spec");
    assert_eq!(spec["info"]["title"], "CRWA Public Flagging API");
    assert_eq!(spec["info"]["contact"]["name"], "Charles River Watershed Association");
    assert_eq!(spec["info"]["contact"]["x-responsible-developer"], "Code for Boston");
}

#[tokio::test]
async fn spec_lists_every_registered_route() {
    let dir = TempDir::new().expect("tempdir");
    let app = create_app(without_vault(Environment::Testing, &dir)).expect("app");

    let (_, body) = get(&app, "/api/reach_api.json").await;
    let spec: Value = serde_json::from_slice(&body).expect("json spec");
    let paths = spec["paths"].as_object().expect("paths");

    for path in ["/health", "/", "/about", "/api/v1/info", "/api/v1/blueprints/{name}"] {
        assert!(paths.contains_key(path), "{path} missing from {:?}", paths.keys());
        assert!(app.openapi().paths.paths.contains_key(path));
    }

    for path in ["/health", "/", "/about", "/api/v1/info", "/api/v1/blueprints/api"] {
        assert_eq!(get(&app, path).await.0, StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn disabled_docs_mount_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.docs.enabled = false;

    let app = create_app(cfg).expect("app");
    assert_eq!(get(&app, "/api/docs").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/api/reach_api.json").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/health").await.0, StatusCode::OK);
}

#[test]
fn include_prefixes_limit_the_spec() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.docs.include_prefixes = vec!["/api/".to_owned()];

    let app = create_app(cfg).expect("app");
    let paths: Vec<&str> = app.openapi().paths.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, ["/api/v1/blueprints/{name}", "/api/v1/info"]);
}

#[test]
fn rule_filter_overrides_prefixes() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = without_vault(Environment::Testing, &dir);
    cfg.docs.include_prefixes = vec!["/api/".to_owned()];

    let app = App::builder()
        .config(cfg)
        .rule_filter(|path| path == "/health")
        .build()
        .expect("app");
    assert_eq!(app.openapi().paths.paths.keys().collect::<Vec<_>>(), ["/health"]);
}

#[test]
fn docs_defects_are_fatal() {
    let cases: [(fn(&mut AppConfig), fn(&DocsError) -> bool); 7] = [
        (|cfg| cfg.docs.title = String::new(), |e| matches!(e, DocsError::EmptyTitle { .. })),
        (|cfg| cfg.docs.ui_path = "docs".to_owned(), |e| {
            matches!(e, DocsError::InvalidMountPath { .. })
        }),
        (|cfg| cfg.docs.spec_path = "/api/docs".to_owned(), |e| {
            matches!(e, DocsError::SharedMountPath { .. })
        }),
        (|cfg| cfg.docs.ui_path = "/about".to_owned(), |e| {
            matches!(e, DocsError::RouteCollision { .. })
        }),
        (|cfg| cfg.docs.ui_path = "/api/v1/blueprints/{id}".to_owned(), |e| {
            matches!(e, DocsError::RouteCollision { .. })
        }),
        (|cfg| cfg.docs.spec_path = "/api/*spec".to_owned(), |e| {
            matches!(e, DocsError::InvalidMountPath { .. })
        }),
        (|cfg| cfg.docs.ui_path = "/api/{".to_owned(), |e| {
            matches!(e, DocsError::InvalidMountPath { .. })
        }),
    ];

    for (index, (configure, expected)) in cases.into_iter().enumerate() {
        let dir = TempDir::new().expect("tempdir");
        let mut cfg = without_vault(Environment::Testing, &dir);
        configure(&mut cfg);

        match create_app(cfg) {
            Err(AppError::Docs { source, .. }) => assert!(expected(&source), "case {index}: {source}"),
            other => panic!("case {index}: expected a docs error, got {other:?}"),
        }
    }
}

#[test]
fn vault_path_is_relative_to_the_working_directory_by_default() {
    let cfg = AppConfig::for_environment(Environment::Testing);
    assert_eq!(cfg.vault.path, Path::new("vault.bin"));
}
