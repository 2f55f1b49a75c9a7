//! Resource-version probe against the login endpoint.
//!
//! The endpoint echoes the current resource version in a response header, so
//! the request body is a minimal anonymous login probe.

use serde::Serialize;

use snapdiff_core::config::VersionConfig;

use crate::error::VersionError;

/// Placeholder resource version sent while asking for the real one. The
/// endpoint answers the current value in `x-res-version` regardless of what
/// the probe claims. Bootstrap value, tolerated by the API.
const RES_VERSION_PROBE: &str = "1.0.0";

/// Response header carrying the resource version (matched case-insensitively).
const RESPONSE_HEADER: &str = "x-res-version";

#[derive(Debug, Serialize)]
struct ProbeBody<'a> {
    device_specific_id: &'a str,
    player_id: &'a str,
    version: u32,
}

/// Ask the login endpoint for the resource version paired with
/// `client_version`. Single attempt, no retry.
pub fn fetch_resource_version(
    config: &VersionConfig,
    client_version: &str,
) -> Result<String, VersionError> {
    let user_agent = format!("app/{client_version}");
    let response = ureq::post(&config.api_url)
        .set("content-type", "application/json")
        .set("x-app-version", client_version)
        .set("user-agent", &user_agent)
        .set("x-res-version", RES_VERSION_PROBE)
        .set("x-devicetype", &config.device_type)
        .send_json(ProbeBody {
            device_specific_id: "",
            player_id: "",
            version: 1,
        })?;

    let value = response
        .header(RESPONSE_HEADER)
        .map(clean_header_value)
        .unwrap_or_default();
    if value.is_empty() {
        return Err(VersionError::Unavailable {
            reason: format!("login endpoint answered without a {RESPONSE_HEADER} header"),
        });
    }
    Ok(value)
}

/// Header values can arrive with trailing line terminators; strip them.
fn clean_header_value(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_is_trimmed_of_line_terminators() {
        assert_eq!(clean_header_value("R04_21_00\r\n"), "R04_21_00");
        assert_eq!(clean_header_value("  R04_21_00\n"), "R04_21_00");
        assert_eq!(clean_header_value("R04_21_00"), "R04_21_00");
    }

    #[test]
    fn probe_body_shape() {
        let body = ProbeBody {
            device_specific_id: "",
            player_id: "",
            version: 1,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"device_specific_id": "", "player_id": "", "version": 1})
        );
    }
}
