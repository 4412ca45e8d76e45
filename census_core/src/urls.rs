use url::Url;

use crate::CensusError;

fn strip_terminal_segment<'a>(path: &'a str, segment: &str) -> &'a str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.ends_with(segment) {
        let new_len = trimmed.len().saturating_sub(segment.len());
        return trimmed[..new_len].trim_end_matches('/');
    }
    trimmed
}

/// Build the versioned API root, e.g. `https://app.getcensus.com/api/v1`.
///
/// A base URL that already ends in the version segment is accepted as is.
pub fn versioned_api_base(base_url: &str, api_version: &str) -> Result<Url, CensusError> {
    let mut parsed = Url::parse(base_url)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CensusError::InvalidInput(format!(
                "unsupported scheme: {other}"
            )))
        }
    }
    let version = api_version.trim_matches('/');
    let path = strip_terminal_segment(parsed.path(), &format!("/{version}")).to_string();
    parsed.set_path(&format!("{}/{}", path.trim_end_matches('/'), version));
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed)
}

/// Path of a sync run, relative to the versioned API root.
pub fn sync_run_path(sync_run_id: i64) -> String {
    format!("sync_runs/{sync_run_id}")
}

/// Path that triggers a sync, relative to the versioned API root.
pub fn trigger_sync_path(sync_id: i64) -> String {
    format!("syncs/{sync_id}/trigger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_api_base_default() {
        let url = versioned_api_base("https://app.getcensus.com/api", "v1").unwrap();
        assert_eq!(url.as_str(), "https://app.getcensus.com/api/v1");
    }

    #[test]
    fn test_versioned_api_base_already_versioned() {
        let url = versioned_api_base("https://app.getcensus.com/api/v1/", "v1").unwrap();
        assert_eq!(url.as_str(), "https://app.getcensus.com/api/v1");
    }

    #[test]
    fn test_versioned_api_base_bare_host() {
        let url = versioned_api_base("http://127.0.0.1:8080", "v1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn test_versioned_api_base_rejects_scheme() {
        let err = versioned_api_base("ftp://app.getcensus.com/api", "v1").unwrap_err();
        assert!(matches!(err, CensusError::InvalidInput(_)));
    }

    #[test]
    fn test_paths() {
        assert_eq!(sync_run_path(1234567890), "sync_runs/1234567890");
        assert_eq!(trigger_sync_path(1234), "syncs/1234/trigger");
    }
}
