//! Getting the raw attendance payload from the device backend.
//!
//! Every failure here degrades to an empty payload: the report is still
//! produced, with everyone absent, and the operator sees a warning.

use attendance_payroll::RawPayload;
use reqwest::Client;
use std::time::Duration;

use crate::config::{ConfigSource, LogSource};

const TOKEN_HEADER: &str = "x-esp32-token";

/// Hex-encoded XOR of the device secret against the repeating server secret.
///
/// The XOR is taken per code point, and each result is written as at least two
/// lowercase hex digits.
///
/// Returns `None` when either secret is missing or still a placeholder.
pub fn auth_token(device_secret: &str, server_secret: &str) -> Option<String> {
    if device_secret.is_empty()
        || server_secret.is_empty()
        || device_secret.contains("YOUR_")
        || server_secret.contains("YOUR_")
    {
        return None;
    }

    let token = device_secret
        .chars()
        .zip(server_secret.chars().cycle())
        .map(|(device, server)| format!("{:02x}", u32::from(device) ^ u32::from(server)))
        .collect();
    Some(token)
}

pub async fn fetch_payload(config: &ConfigSource) -> RawPayload {
    let Some(source) = &config.source else {
        tracing::warn!("No log source configured, continuing with an empty dataset");
        return RawPayload::default();
    };

    let result = match source {
        LogSource::Url(url) => fetch_url(url, config).await,
        LogSource::File(path) => {
            tracing::info!("Reading attendance logs from {}", path.display());
            RawPayload::read_file(path)
        }
    };
    match result {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!("Error fetching attendance data: {error:#}");
            tracing::warn!("Continuing with an empty dataset");
            RawPayload::default()
        }
    }
}

async fn fetch_url(url: &str, config: &ConfigSource) -> anyhow::Result<RawPayload> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let mut request = client.get(url);
    match auth_token(&config.device_secret, &config.server_secret) {
        Some(token) => {
            tracing::info!("Authenticating request with device token");
            request = request.header(TOKEN_HEADER, token);
        }
        None => tracing::warn!("Secrets are not set, sending unauthenticated request"),
    }

    tracing::info!("Fetching attendance logs from {url}");
    let response = request.send().await?.error_for_status()?;
    let value: serde_json::Value = response.json().await?;
    Ok(RawPayload::from_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_xors_against_repeating_secret() {
        // 'a' ^ 'A' = 0x20, 'b' ^ 'B' = 0x20, 'c' ^ 'A' = 0x22
        assert_eq!(auth_token("abc", "AB").as_deref(), Some("202022"));
        assert_eq!(auth_token("\x01", "\x01").as_deref(), Some("00"));
    }

    #[test]
    fn token_xors_code_points() {
        // 'é' (0xe9) ^ 'a' (0x61) = 0x88, '€' (0x20ac) ^ 'b' (0x62) = 0x20ce
        assert_eq!(auth_token("é€", "ab").as_deref(), Some("8820ce"));
        assert_eq!(auth_token("a", "é").as_deref(), Some("88"));
    }

    #[test]
    fn token_skipped_for_missing_secrets() {
        assert_eq!(auth_token("", "server"), None);
        assert_eq!(auth_token("device", ""), None);
        assert_eq!(auth_token("YOUR_DEVICE_SECRET", "server"), None);
        assert_eq!(auth_token("device", "YOUR_SERVER_SECRET"), None);
    }

    #[tokio::test]
    async fn missing_file_degrades_to_empty() {
        let config = ConfigSource {
            source: Some(LogSource::File("/nonexistent/attendance-logs.json".into())),
            ..Default::default()
        };
        assert!(fetch_payload(&config).await.data.is_empty());
    }

    #[tokio::test]
    async fn unreachable_url_degrades_to_empty() {
        let config = ConfigSource {
            source: Some(LogSource::Url("http://127.0.0.1:9/api/attendance/logs".into())),
            timeout_secs: 1,
            ..Default::default()
        };
        assert!(fetch_payload(&config).await.data.is_empty());
    }

    #[tokio::test]
    async fn file_source_is_parsed() {
        let dir = std::env::temp_dir().join(format!("attendance-fetch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("logs.json");
        std::fs::write(
            &path,
            r#"{"success": true, "data": [{"uid": "1", "name": "One", "logs": []}]}"#,
        )
        .unwrap();

        let config = ConfigSource {
            source: Some(LogSource::File(path)),
            ..Default::default()
        };
        let payload = fetch_payload(&config).await;
        assert_eq!(payload.data.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
