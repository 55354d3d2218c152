#[cfg(test)]
mod tests {
    use spigot_core::{Error, ErrorKind};

    #[test]
    fn kinds_are_distinguishable() {
        assert!(Error::invalid_argument("x").is_invalid_argument());
        assert!(Error::state_conflict("x").is_state_conflict());
        assert!(Error::msg("x").is_session());
        let advance = Error::advance(Error::msg("cause"));
        assert!(advance.is_advance());
        assert!(matches!(advance.kind(), ErrorKind::Advance(..)));
    }

    #[test]
    fn advance_wraps_its_cause() {
        let error = Error::advance(Error::state_conflict("cursor misuse"));
        assert!(error.to_string().contains("row advance failed"));
        assert!(error.to_string().contains("cursor misuse"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn suppressed_faults_are_ordered_and_kept() {
        let mut error = Error::msg("primary");
        error.suppress(Error::msg("first cleanup"));
        error.suppress(Error::msg("second cleanup"));
        assert_eq!(error.suppressed().len(), 2);
        let rendered = error.to_string();
        let primary = rendered.find("primary").unwrap();
        let first = rendered.find("first cleanup").unwrap();
        let second = rendered.find("second cleanup").unwrap();
        assert!(primary < first);
        assert!(first < second);
    }

    #[test]
    fn session_faults_carry_arbitrary_error_types() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let error = Error::session(io);
        assert!(error.is_session());
        assert!(error.to_string().contains("pipe"));
        let error: Error = anyhow::anyhow!("from anyhow").into();
        assert!(error.is_session());
    }
}
