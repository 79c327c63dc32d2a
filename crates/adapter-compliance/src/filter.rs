//! Request validation and sensitive-data masking.
//!
//! Masking walks the JSON tree and rewrites string and numeric leaves in
//! place. Rewriting the parsed tree rather than the serialized document keeps
//! the output valid JSON even when a card number arrives as a bare number.
//! Card security codes are too short to recognize by pattern alone, so they
//! are masked by key name instead.

use crate::audit::AuditLog;
use adapter_core::ServiceRequest;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Longest timeout a request may carry.
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Card numbers, 13 to 19 digits; masked keeping the last four.
static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b\d{13,19}\b").unwrap()
});

/// Email addresses.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Eleven-digit phone numbers.
static PHONE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b\d{11}\b").unwrap()
});

/// Card security codes; applied only to values under cvv-named keys.
static CVV: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d{3,4}$").unwrap()
});

/// Validates requests and masks payloads before they are stored or logged.
#[derive(Debug, Default)]
pub struct ComplianceFilter {
    audit: AuditLog,
}

impl ComplianceFilter {
    /// Create a filter with an empty audit trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a request against the compliance rules.
    ///
    /// Returns every violation found; an empty list means the request may
    /// proceed. Validation itself never fails.
    #[must_use]
    pub fn validate_request(&self, request: &ServiceRequest) -> Vec<String> {
        let mut violations = Vec::new();

        if request.tenant_id.trim().is_empty() {
            violations.push("tenant_id is required".to_string());
        }

        if request.correlation_id.get_version_num() != 4 {
            violations.push("correlation_id must be a UUID v4".to_string());
        }

        if let Some(timeout) = request.timeout {
            if timeout.is_zero() || timeout > MAX_REQUEST_TIMEOUT {
                violations.push(format!(
                    "timeout must be between 1ms and {}s",
                    MAX_REQUEST_TIMEOUT.as_secs()
                ));
            }
        }

        if !violations.is_empty() {
            warn!(
                correlation_id = %request.correlation_id,
                violations = violations.len(),
                "request failed compliance validation"
            );
        }
        violations
    }

    /// Return a copy of `data` with sensitive leaves masked.
    #[must_use]
    pub fn mask_sensitive(&self, data: &Value) -> Value {
        let mut masked = data.clone();
        mask_value(&mut masked);
        masked
    }

    /// Mask `details` and append an entry to the audit trail.
    pub fn create_audit_entry(&self, action: impl Into<String>, details: &Value) {
        self.audit.append(action, self.mask_sensitive(details));
    }

    /// The audit trail backing this filter.
    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }
}

fn mask_string(s: &str) -> String {
    let masked = CARD_NUMBER.replace_all(s, |caps: &regex::Captures<'_>| {
        let digits = &caps[0];
        format!("****-****-****-{}", &digits[digits.len() - 4..])
    });
    let masked = EMAIL.replace_all(&masked, "***@***.***");
    PHONE.replace_all(&masked, "***-****-****").into_owned()
}

fn mask_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let masked = mask_string(s);
            if masked != *s {
                *s = masked;
            }
        }
        Value::Number(n) => {
            // A card or phone number stored as a bare number still masks;
            // the leaf becomes a string
            let rendered = n.to_string();
            if CARD_NUMBER.is_match(&rendered) || PHONE.is_match(&rendered) {
                *value = Value::String(mask_string(&rendered));
            }
        }
        Value::Array(items) => {
            for item in items {
                mask_value(item);
            }
        }
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key.to_ascii_lowercase().contains("cvv") && mask_cvv_leaf(v) {
                    continue;
                }
                mask_value(v);
            }
        }
        Value::Null | Value::Bool(_) => {}
    }
}

/// Mask a 3-4 digit leaf found under a cvv-named key. Returns `false` when
/// the value does not look like a security code, leaving it for the general
/// rules.
fn mask_cvv_leaf(value: &mut Value) -> bool {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return false,
    };
    if CVV.is_match(&rendered) {
        *value = Value::String("***".to_string());
        true
    } else {
        false
    }
}
