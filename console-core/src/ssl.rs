use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// SSL certificate definition — APISIX-compatible.
///
/// The private key is never shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SslCertificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// SNI hostnames this cert applies to.
    #[serde(default)]
    pub snis: Vec<String>,

    /// Status: 1 = enabled, 0 = disabled.
    #[serde(default = "default_status")]
    pub status: u8,

    /// Certificate expiry (unix seconds), filled in by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_end: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for SslCertificate {
    const KIND: ResourceKind = ResourceKind::Ssls;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        self.snis.join(",")
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}

fn default_status() -> u8 { 1 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_ssl_cert_deserializes() {
        let json = r#"{"id":"ssl1","cert":"CERT_PEM","key":"KEY_PEM","snis":["a.com","*.a.com"]}"#;
        let ssl: SslCertificate = serde_json::from_str(json).unwrap();
        assert_eq!(ssl.id.as_deref(), Some("ssl1"));
        assert_eq!(ssl.status, 1, "default status must be 1 (enabled)");
        assert_eq!(ssl.label(), "a.com,*.a.com");
        assert_eq!(ssl.extra["cert"], "CERT_PEM");
    }
}
