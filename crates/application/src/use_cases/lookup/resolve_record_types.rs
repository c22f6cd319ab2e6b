use ferrous_q_domain::{DomainError, RecordType};

/// Queried when the user names no record type.
pub const DEFAULT_RECORD_TYPES: [RecordType; 6] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::NS,
    RecordType::MX,
    RecordType::TXT,
    RecordType::CNAME,
];

/// Turns user-supplied type tokens into record types.
pub struct RecordTypeResolver;

impl RecordTypeResolver {
    /// Resolves every token in order. Duplicates are kept, so a repeated
    /// token is queried (and printed) once per occurrence.
    pub fn resolve<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<RecordType>, DomainError> {
        let record_types = tokens
            .iter()
            .map(|token| token.as_ref().parse::<RecordType>())
            .collect::<Result<Vec<_>, _>>()?;

        if record_types.is_empty() {
            return Ok(DEFAULT_RECORD_TYPES.to_vec());
        }
        Ok(record_types)
    }

    /// True when `token` names a record type; used to pick type tokens out of positional arguments.
    pub fn is_record_type(token: &str) -> bool {
        token.parse::<RecordType>().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ignores_case() {
        for rt in RecordType::all() {
            let lower = rt.as_str().to_lowercase();
            assert_eq!(RecordTypeResolver::resolve(&[lower]).unwrap(), vec![rt]);
            assert_eq!(RecordTypeResolver::resolve(&[rt.as_str()]).unwrap(), vec![rt]);
        }
    }

    #[test]
    fn test_resolve_accepts_registry_types() {
        let resolved = RecordTypeResolver::resolve(&["loc", "SPF", "cert", "uri"]).unwrap();
        assert_eq!(
            resolved,
            vec![RecordType::LOC, RecordType::SPF, RecordType::CERT, RecordType::URI]
        );
        assert!(RecordTypeResolver::resolve(&["aname"]).is_err());
    }

    #[test]
    fn test_resolve_empty_yields_defaults_in_order() {
        let none: [&str; 0] = [];
        assert_eq!(
            RecordTypeResolver::resolve(&none).unwrap(),
            vec![
                RecordType::A,
                RecordType::AAAA,
                RecordType::NS,
                RecordType::MX,
                RecordType::TXT,
                RecordType::CNAME,
            ]
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_token() {
        let err = RecordTypeResolver::resolve(&["bogus"]).unwrap_err();
        assert_eq!(err, DomainError::InvalidRecordType("bogus".to_string()));
        assert_eq!(err.to_string(), "bogus is not a valid RR type");
    }

    #[test]
    fn test_resolve_fails_whole_plan_on_one_bad_token() {
        let result = RecordTypeResolver::resolve(&["A", "nope", "MX"]);
        assert!(matches!(result, Err(DomainError::InvalidRecordType(t)) if t == "nope"));
    }

    #[test]
    fn test_resolve_keeps_duplicates_and_order() {
        let resolved = RecordTypeResolver::resolve(&["mx", "A", "MX"]).unwrap();
        assert_eq!(resolved, vec![RecordType::MX, RecordType::A, RecordType::MX]);
    }

    #[test]
    fn test_is_record_type() {
        assert!(RecordTypeResolver::is_record_type("txt"));
        assert!(!RecordTypeResolver::is_record_type("example.com"));
        assert!(!RecordTypeResolver::is_record_type("@9.9.9.9"));
    }
}
