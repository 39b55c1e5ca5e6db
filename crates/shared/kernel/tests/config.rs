use crwa_kernel::config::{ConfigError, ConfigSource, load_config};
use crwa_kernel::domain::Environment;
use crwa_kernel::domain::config::AppConfig;
use std::fs;
use tempfile::tempdir;

#[test]
fn every_environment_loads_its_profile() {
    for env in Environment::ALL {
        let cfg = load_config(env, None).expect("profile loads without a file");
        assert_eq!(cfg.environment, env);
        assert_eq!(cfg.testing, env == Environment::Testing);
    }
}

#[test]
fn toml_file_overrides_profile_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
            environment = "production"
            blueprints = ["flagging"]

            [server]
            port = 8080

            [docs]
            title = "Staging docs"
            include_prefixes = ["/api"]
        "#,
    )?;

    let cfg = load_config(Environment::Development, Some(path.as_path()))?;

    assert_eq!(cfg.environment, Environment::Development, "requested profile wins");
    assert!(cfg.debug, "unset keys keep the profile value");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.explicit_blueprints(), Some(["flagging".to_owned()].as_slice()));
    assert_eq!(cfg.docs.title, "Staging docs");
    assert_eq!(cfg.docs.include_prefixes, ["/api"]);
    assert_eq!(cfg.docs.ui_path, "/api/docs");
    Ok(())
}

#[test]
fn explicit_file_must_exist() {
    let dir = tempdir().expect("tempdir");
    let err = load_config(Environment::Testing, Some(dir.path().join("missing.toml").as_path()))
        .expect_err("explicit path is required");
    assert!(matches!(err, ConfigError::Config { .. }));
}

#[test]
fn malformed_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[server]\nport = \"not a number\"\n").expect("write");

    let err = load_config(Environment::Testing, Some(path.as_path())).expect_err("bad port");
    assert!(err.to_string().contains("Failed to deserialize config"));
}

#[test]
fn explicit_sources_select_profiles() {
    let named = ConfigSource::from("dev").resolve().expect("named");
    assert_eq!(named.environment, Environment::Development);

    let typed = ConfigSource::from(Environment::Testing).resolve().expect("typed");
    assert_eq!(typed.environment, Environment::Testing);

    let mut custom = AppConfig::for_environment(Environment::Production);
    custom.docs.title = "Custom".to_owned();
    let given = ConfigSource::from(Some(custom)).resolve().expect("given");
    assert_eq!(given.docs.title, "Custom");

    assert!(matches!(ConfigSource::from(None::<AppConfig>), ConfigSource::Ambient));
}

#[test]
fn unknown_profile_names_fail() {
    let err = ConfigSource::from("qa".to_owned()).resolve().expect_err("unknown");
    assert!(matches!(err, ConfigError::UnknownEnvironment { .. }));
}
