//! Configuration management for the quiz web service
//!
//! Supports loading configuration from environment variables with fallback to defaults.

use std::time::Duration;

/// Runtime settings for the service and its collaborators.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Base URL of the results API, trailing slash included.
    pub results_api_base: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub twilio_api_base: String,
    pub exam_ttl: Duration,
    pub session_ttl: Duration,
    pub http_timeout: Duration,
    /// Language tag for spoken prompts and speech recognition.
    pub voice_language: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            results_api_base: "http://localhost:3000/".to_string(),
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            twilio_api_base: "https://api.twilio.com".to_string(),
            exam_ttl: Duration::from_secs(30 * 60),
            session_ttl: Duration::from_secs(5 * 60),
            http_timeout: Duration::from_secs(10),
            voice_language: "en-US".to_string(),
        }
    }
}

/// Load ServiceConfig from environment variables
///
/// Environment variables:
/// - `APP_PORT`: listen port (default: 8080)
/// - `API_ADDRESS`: results API base URL, trailing slash included
/// - `ACCOUNT_SID` / `AUTH_TOKEN` / `TWILIO_NUMBER`: telephony credentials
/// - `TWILIO_API_BASE`: telephony REST base (default: https://api.twilio.com)
/// - `EXAM_TTL_SECS`: exam expiry in seconds (default: 1800)
/// - `SESSION_TTL_SECS`: session expiry in seconds (default: 300)
/// - `HTTP_TIMEOUT_SECS`: outbound HTTP timeout in seconds (default: 10)
/// - `VOICE_LANGUAGE`: language tag for spoken prompts (default: en-US)
pub fn load_service_config() -> ServiceConfig {
    let defaults = ServiceConfig::default();
    ServiceConfig {
        port: env_parse("APP_PORT", defaults.port),
        results_api_base: env_or("API_ADDRESS", &defaults.results_api_base),
        account_sid: env_or("ACCOUNT_SID", &defaults.account_sid),
        auth_token: env_or("AUTH_TOKEN", &defaults.auth_token),
        from_number: env_or("TWILIO_NUMBER", &defaults.from_number),
        twilio_api_base: env_or("TWILIO_API_BASE", &defaults.twilio_api_base),
        exam_ttl: Duration::from_secs(env_parse("EXAM_TTL_SECS", 30 * 60)),
        session_ttl: Duration::from_secs(env_parse("SESSION_TTL_SECS", 5 * 60)),
        http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 10)),
        voice_language: env_or("VOICE_LANGUAGE", &defaults.voice_language),
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_has_sensible_defaults() {
        let config = ServiceConfig::default();
        assert!(config.port > 0);
        assert!(config.results_api_base.ends_with('/'));
        assert!(config.exam_ttl > config.session_ttl);
        assert!(config.http_timeout.as_secs() > 0);
    }
}
