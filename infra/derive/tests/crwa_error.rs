#[test]
fn crwa_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/crwa_error_pass.rs");
    t.pass("tests/ui/api_model_pass.rs");
}
