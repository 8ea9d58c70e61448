//! URL prettifier for log lines (spec.md §4.5.8): overlong query-bearing
//! URLs get shortened, and known redirect hosts get rewritten to a
//! canonical `host/.../filename` form extracted from the response's
//! `content-disposition` header when available.

const MAX_DISPLAY_LEN: usize = 90;

/// Known asset-redirect hosts whose URLs carry opaque signed-query blobs
/// that swamp a log line with noise.
const REDIRECT_HOSTS: &[&str] = &[
    "objects.githubusercontent.com",
    "github-releases.githubusercontent.com",
];

/// Produce a short, human-readable form of `url` for log messages.
/// `content_disposition_filename`, when the response carried one, wins
/// over guessing the filename from the URL path.
pub fn display_url(url: &str, content_disposition_filename: Option<&str>) -> String {
    let host = url
        .split("://")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("");

    let filename = content_disposition_filename
        .map(|s| s.to_string())
        .unwrap_or_else(|| guess_filename(url));

    if REDIRECT_HOSTS.contains(&host) || url.len() > MAX_DISPLAY_LEN {
        format!("{host}/.../{filename}")
    } else {
        url.to_string()
    }
}

fn guess_filename(url: &str) -> String {
    url.split('?')
        .next()
        .unwrap_or(url)
        .split('/')
        .next_back()
        .unwrap_or("download")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_url_passes_through() {
        let url = "https://example.com/file.tar.gz";
        assert_eq!(display_url(url, None), url);
    }

    #[test]
    fn redirect_host_collapsed_to_canonical_form() {
        let url = "https://objects.githubusercontent.com/gh-release/abcd?X-Amz-Signature=deadbeef";
        let pretty = display_url(url, Some("node-v20.17.0.tar.gz"));
        assert_eq!(pretty, "objects.githubusercontent.com/.../node-v20.17.0.tar.gz");
    }

    #[test]
    fn overlong_query_url_is_shortened() {
        let long_query = "a".repeat(120);
        let url = format!("https://cdn.example.com/download?token={long_query}");
        let pretty = display_url(&url, None);
        assert!(pretty.len() < url.len());
    }
}
