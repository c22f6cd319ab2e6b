use ferrous_q_domain::{fqdn, reverse_name, QueryOptions, Question, QueryClass, RecordType};
use std::net::IpAddr;

#[test]
fn test_reverse_name_is_fully_qualified() {
    let v4: IpAddr = "10.0.0.1".parse().unwrap();
    let v6: IpAddr = "::1".parse().unwrap();

    assert!(reverse_name(v4).ends_with(".in-addr.arpa."));
    assert!(reverse_name(v6).ends_with(".ip6.arpa."));
    assert_eq!(reverse_name(v6).matches('.').count(), 34);
}

#[test]
fn test_fqdn_is_idempotent() {
    let once = fqdn("example.org");
    assert_eq!(fqdn(&once), once);
}

#[test]
fn test_question_shares_plan_fields() {
    let question = Question::new("example.org.", RecordType::MX, QueryClass::Chaos, true);

    assert_eq!(&*question.name, "example.org.");
    assert_eq!(question.record_type, RecordType::MX);
    assert_eq!(question.query_class.to_u16(), 3);
    assert!(question.dnssec_ok);
}

#[test]
fn test_query_options_builder() {
    let options = QueryOptions::new("example.org", "9.9.9.9")
        .with_types(["a", "mx"])
        .with_reverse(false)
        .with_dnssec(true)
        .with_query_class(QueryClass::from_chaos_flag(true))
        .with_odoh_proxy(Some(String::new()))
        .with_insecure_tls(true)
        .with_raw_output(true);

    assert_eq!(options.type_tokens, vec!["a".to_string(), "mx".to_string()]);
    assert!(options.want_dnssec);
    assert_eq!(options.query_class, QueryClass::Chaos);
    assert_eq!(options.odoh_proxy, None, "empty proxy disables ODoH");
    assert!(options.insecure_tls);
    assert!(options.raw_output);
}
