use crate::error::NormalizationReject;
use url::Url;

/// Resolve `raw` against `base` and canonicalize it.
///
/// The result is absolute, percent-encoded by `url`, and has its fragment
/// removed, so `/a#top` and `/a` collapse onto the same node.
pub fn normalize(base: &Url, raw: &str) -> Result<Url, NormalizationReject> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NormalizationReject::Empty);
    }
    if raw.starts_with('#') {
        return Err(NormalizationReject::FragmentOnly);
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("vbscript:") || lowered.starts_with("data:") {
        return Err(NormalizationReject::ScriptProtocol);
    }
    if lowered.starts_with("mailto:") || lowered.starts_with("tel:") {
        return Err(NormalizationReject::MailProtocol);
    }

    let mut resolved = base.join(raw).map_err(|_| NormalizationReject::Unparseable)?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(NormalizationReject::UnsupportedScheme);
    }
    resolved.set_fragment(None);

    Ok(resolved)
}

/// Parse a seed address. A missing scheme is read as `http://`.
pub fn parse_seed(seed: &str) -> Option<Url> {
    let seed = seed.trim();
    let mut parsed = Url::parse(seed)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("http://{}", seed)).ok())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.set_fragment(None);
    Some(parsed)
}

/// True when `url` is on `host` or one of its subdomains.
pub fn is_same_host(url: &Url, host: &str) -> bool {
    url.host_str()
        .map(|h| h == host || h.ends_with(&format!(".{}", host)))
        .unwrap_or(false)
}
