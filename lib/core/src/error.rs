//! Error handling foundation for flowcanvas.
//!
//! Each crate keeps its own error enum (`GraphError` for the model,
//! `EditorError` for the edit engine, `CliError` for the binary) and returns
//! it wrapped in a rootcause [`Report`] through this alias.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "refused")
        }
    }

    impl std::error::Error for Refused {}

    fn refuse() -> Result<u32, Refused> {
        let attempt: std::result::Result<u32, Refused> = Err(Refused);
        Ok(attempt?)
    }

    #[test]
    fn domain_error_converts_into_report() {
        let err = refuse().unwrap_err();
        assert_eq!(err.current_context().to_string(), "refused");
    }
}
