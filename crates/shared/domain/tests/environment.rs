use crwa_domain::Environment;

#[test]
fn parses_known_indicators() {
    assert_eq!(Environment::parse("development"), Some(Environment::Development));
    assert_eq!(Environment::parse("dev"), Some(Environment::Development));
    assert_eq!(Environment::parse(" Testing "), Some(Environment::Testing));
    assert_eq!(Environment::parse("test"), Some(Environment::Testing));
    assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
    assert_eq!(Environment::parse("prod"), Some(Environment::Production));
}

#[test]
fn rejects_unknown_indicators() {
    assert_eq!(Environment::parse(""), None);
    assert_eq!(Environment::parse("staging"), None);
    assert_eq!(Environment::parse("production-ish"), None);
}

#[test]
fn display_round_trips_through_parse() {
    for env in Environment::ALL {
        assert_eq!(Environment::parse(&env.to_string()), Some(env));
    }
    assert!(Environment::Production.is_production());
    assert!(!Environment::Development.is_production());
}
