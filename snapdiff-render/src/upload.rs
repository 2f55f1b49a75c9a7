//! Image upload to an object-storage style HTTP endpoint.
//!
//! `PUT <base>/<prefix>/<filename>`, optionally answering an RFC 2617 digest
//! challenge. Any non-2xx outcome yields no URI and the caller falls back to
//! a local `file://` reference.

use std::path::Path;

use log::{info, warn};

use snapdiff_core::config::UploadConfig;

// ---------------------------------------------------------------------------
// Public entry
// ---------------------------------------------------------------------------

/// Exact remote location for `filename` under the configured base and prefix.
pub fn remote_uri(base: &str, prefix: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        prefix.trim_matches('/'),
        filename
    )
}

/// Upload one rendered image. Returns its retrievable URI on a 2xx response,
/// `None` otherwise — upload failure is never fatal.
pub fn put_image(config: &UploadConfig, image: &Path) -> Option<String> {
    let filename = image.file_name()?.to_string_lossy().into_owned();
    let uri = remote_uri(&config.base_url, &config.path_prefix, &filename);
    let bytes = match std::fs::read(image) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("cannot read {} for upload: {err}", image.display());
            return None;
        }
    };

    match put_with_auth(config, &uri, &bytes) {
        Ok(status) if (200..300).contains(&status) => {
            info!("uploaded {} -> {uri}", image.display());
            Some(uri)
        }
        Ok(status) => {
            warn!("upload of {} rejected with HTTP {status}", image.display());
            None
        }
        Err(err) => {
            warn!("upload of {} failed: {err}", image.display());
            None
        }
    }
}

fn put_with_auth(config: &UploadConfig, uri: &str, body: &[u8]) -> Result<u16, Box<ureq::Error>> {
    match put(uri, None, body) {
        Err(ureq::Error::Status(401, response)) => {
            let (Some(user), Some(pass)) = (config.username.as_deref(), config.password.as_deref())
            else {
                return Ok(401);
            };
            let Some(challenge) = response.header("www-authenticate") else {
                return Ok(401);
            };
            let Some(auth) = authorization(challenge, user, pass, "PUT", uri_path(uri)) else {
                return Ok(401);
            };
            match put(uri, Some(&auth), body) {
                Ok(response) => Ok(response.status()),
                Err(ureq::Error::Status(code, _)) => Ok(code),
                Err(err) => Err(Box::new(err)),
            }
        }
        Ok(response) => Ok(response.status()),
        Err(ureq::Error::Status(code, _)) => Ok(code),
        Err(err) => Err(Box::new(err)),
    }
}

fn put(uri: &str, auth: Option<&str>, body: &[u8]) -> Result<ureq::Response, ureq::Error> {
    let mut request = ureq::put(uri).set("content-type", "image/jpeg");
    if let Some(auth) = auth {
        request = request.set("authorization", auth);
    }
    request.send_bytes(body)
}

/// Path component of a URI, for the digest `uri` directive.
fn uri_path(uri: &str) -> &str {
    let after_scheme = uri.find("://").map(|i| &uri[i + 3..]).unwrap_or(uri);
    after_scheme
        .find('/')
        .map(|i| &after_scheme[i..])
        .unwrap_or("/")
}

// ---------------------------------------------------------------------------
// RFC 2617 digest
// ---------------------------------------------------------------------------

/// Build an `Authorization` header for a `Digest` challenge, or `None` when
/// the challenge is not a digest one / lacks required directives.
fn authorization(
    challenge: &str,
    user: &str,
    pass: &str,
    method: &str,
    uri: &str,
) -> Option<String> {
    let rest = challenge.trim().strip_prefix("Digest ")?;
    let params = parse_challenge(rest);
    let realm = params.iter().find(|(k, _)| k == "realm")?.1.clone();
    let nonce = params.iter().find(|(k, _)| k == "nonce")?.1.clone();
    let opaque = params.iter().find(|(k, _)| k == "opaque").map(|(_, v)| v);
    let qop = params
        .iter()
        .find(|(k, _)| k == "qop")
        .map(|(_, v)| v.as_str())
        // Servers may offer "auth,auth-int"; we only speak auth.
        .filter(|v| v.split(',').any(|q| q.trim() == "auth"))
        .map(|_| "auth");

    let nc = "00000001";
    // cnonce is client-chosen; derived from the server nonce here.
    let cnonce = md5_hex(&format!("{nonce}:{uri}"));
    let response = digest_response(user, pass, &realm, &nonce, qop, nc, &cnonce, method, uri);

    let mut header = format!(
        "Digest username=\"{user}\", realm=\"{realm}\", nonce=\"{nonce}\", \
         uri=\"{uri}\", response=\"{response}\""
    );
    if qop.is_some() {
        header.push_str(&format!(", qop=auth, nc={nc}, cnonce=\"{cnonce}\""));
    }
    if let Some(opaque) = opaque {
        header.push_str(&format!(", opaque=\"{opaque}\""));
    }
    Some(header)
}

/// `key="value"` pairs of a digest challenge; commas inside quotes are data.
fn parse_challenge(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                push_param(&mut params, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_param(&mut params, &current);
    params
}

fn push_param(params: &mut Vec<(String, String)>, raw: &str) {
    let Some((key, value)) = raw.trim().split_once('=') else {
        return;
    };
    params.push((
        key.trim().to_ascii_lowercase(),
        value.trim().trim_matches('"').to_string(),
    ));
}

#[allow(clippy::too_many_arguments)]
fn digest_response(
    user: &str,
    pass: &str,
    realm: &str,
    nonce: &str,
    qop: Option<&str>,
    nc: &str,
    cnonce: &str,
    method: &str,
    uri: &str,
) -> String {
    let ha1 = md5_hex(&format!("{user}:{realm}:{pass}"));
    let ha2 = md5_hex(&format!("{method}:{uri}"));
    match qop {
        Some(qop) => md5_hex(&format!("{ha1}:{nonce}:{nc}:{cnonce}:{qop}:{ha2}")),
        None => md5_hex(&format!("{ha1}:{nonce}:{ha2}")),
    }
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
