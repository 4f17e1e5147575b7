//! Registrar API paths

use crate::model::RecordType;

const DOMAINS: &str = "/v1/domains";

fn trimmed(path: String) -> String {
    path.trim_end_matches('/').to_string()
}

/// `/v1/domains/{domain}`; the bare collection when `domain` is empty
pub fn domain(domain: &str) -> String {
    trimmed(format!("{DOMAINS}/{domain}"))
}

/// `/v1/domains`
pub fn domains() -> String {
    domain("")
}

/// `/v1/domains/purchase`
pub fn purchase() -> String {
    domain("purchase")
}

/// `/v1/domains/{domain}/records`
pub fn records(domain: &str) -> String {
    trimmed(format!("{DOMAINS}/{domain}/records"))
}

/// `/v1/domains/{domain}/records/{type}`
pub fn records_by_type(domain: &str, record_type: RecordType) -> String {
    trimmed(format!("{DOMAINS}/{domain}/records/{record_type}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(domains(), "/v1/domains");
        assert_eq!(purchase(), "/v1/domains/purchase");
        assert_eq!(domain("example.com"), "/v1/domains/example.com");
        assert_eq!(records("example.com"), "/v1/domains/example.com/records");
        assert_eq!(
            records_by_type("example.com", RecordType::Aaaa),
            "/v1/domains/example.com/records/AAAA"
        );
    }
}
