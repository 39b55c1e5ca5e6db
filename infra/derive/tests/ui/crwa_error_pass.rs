use crwa_derive::crwa_error;
use std::borrow::Cow;

#[crwa_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<Vec<u8>, DemoError> {
    std::fs::read("/definitely/not/here").context("Reading demo file")
}

fn main() {
    let err = read_missing().unwrap_err();
    assert!(err.to_string().starts_with("IO error (Reading demo file): "));

    let internal: DemoError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");

    let owned: Result<(), DemoError> = Err(DemoError::from(String::from("late")));
    let with_context = owned.context("step two").unwrap_err();
    assert_eq!(with_context.to_string(), "Internal error (step two): late");
}
