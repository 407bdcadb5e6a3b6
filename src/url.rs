// Request URL model.
//
// The evaluator works on loose URL components: a scheme, a host (port
// included verbatim when present), a path without its leading slash,
// and a query without its leading question mark. This is deliberately
// not a general URL parser: rewriting operates on exactly these four
// pieces and reassembles them in one canonical shape.

/// The components of a request URL under rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// Scheme as written, e.g. `http`.
    pub scheme: String,
    /// Host (and port, if any) as written.
    pub host: String,
    /// Path without the leading `/`. May be empty.
    pub path: String,
    /// Query without the leading `?`. May be empty.
    pub query: String,
}

impl RequestUrl {
    /// Split an absolute URL into components.
    ///
    /// Returns `None` when the input has no `scheme://host` shape or an
    /// empty host. Scheme acceptance is the caller's concern.
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        if scheme.is_empty() {
            return None;
        }

        let (host, path_and_query) = match rest.split_once('/') {
            Some((host, rest)) => (host, rest),
            None => {
                // No path at all; a query may still follow the host.
                let (host, query) = match rest.split_once('?') {
                    Some((host, query)) => (host, query),
                    None => (rest, ""),
                };
                if host.is_empty() {
                    return None;
                }
                return Some(Self {
                    scheme: scheme.to_string(),
                    host: host.to_string(),
                    path: String::new(),
                    query: query.to_string(),
                });
            }
        };
        if host.is_empty() {
            return None;
        }

        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path_and_query, ""),
        };

        Some(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            query: query.to_string(),
        })
    }

    /// Whether `url` starts with `http://` or `https://`, ignoring case.
    pub fn has_http_scheme(url: &str) -> bool {
        let lower_prefix: String = url.chars().take(8).collect::<String>().to_ascii_lowercase();
        lower_prefix.starts_with("http://") || lower_prefix.starts_with("https://")
    }

    /// Reassemble into `scheme://host/path[?query]`.
    ///
    /// The query is appended only when non-empty.
    pub fn assemble(&self) -> String {
        let mut url = format!("{}://{}/{}", self.scheme, self.host, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }

    /// The request URI as server variables see it: `/path[?query]`.
    pub fn request_uri(&self) -> String {
        let mut uri = format!("/{}", self.path);
        if !self.query.is_empty() {
            uri.push('?');
            uri.push_str(&self.query);
        }
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::RequestUrl;

    #[test]
    fn parses_full_urls() {
        let url = RequestUrl::parse("http://example.com/a/b?x=1&y=2").unwrap();
        assert_eq!(url.scheme, "http");
        assert_eq!(url.host, "example.com");
        assert_eq!(url.path, "a/b");
        assert_eq!(url.query, "x=1&y=2");
    }

    #[test]
    fn parses_bare_host() {
        let url = RequestUrl::parse("https://example.com").unwrap();
        assert_eq!(url.path, "");
        assert_eq!(url.query, "");
        assert_eq!(url.assemble(), "https://example.com/");
    }

    #[test]
    fn parses_host_with_query_but_no_path() {
        let url = RequestUrl::parse("http://example.com?x=1").unwrap();
        assert_eq!(url.host, "example.com");
        assert_eq!(url.path, "");
        assert_eq!(url.query, "x=1");
    }

    #[test]
    fn keeps_ports_on_the_host() {
        let url = RequestUrl::parse("http://localhost:8080/x").unwrap();
        assert_eq!(url.host, "localhost:8080");
    }

    #[test]
    fn rejects_component_free_input() {
        assert!(RequestUrl::parse("no-scheme").is_none());
        assert!(RequestUrl::parse("://host/x").is_none());
        assert!(RequestUrl::parse("http:///x").is_none());
        assert!(RequestUrl::parse("http://").is_none());
    }

    #[test]
    fn http_scheme_check_ignores_case() {
        assert!(RequestUrl::has_http_scheme("HTTP://example.com/"));
        assert!(RequestUrl::has_http_scheme("https://example.com/"));
        assert!(!RequestUrl::has_http_scheme("ftp://example.com/"));
        assert!(!RequestUrl::has_http_scheme("/relative"));
    }

    #[test]
    fn round_trips_with_canonical_slash() {
        let url = RequestUrl::parse("http://example.com/test").unwrap();
        assert_eq!(url.assemble(), "http://example.com/test");
        assert_eq!(url.request_uri(), "/test");

        let url = RequestUrl::parse("http://example.com/a?b=c").unwrap();
        assert_eq!(url.request_uri(), "/a?b=c");
    }

    #[test]
    fn empty_query_is_dropped_on_assembly() {
        let url = RequestUrl::parse("http://example.com/test?").unwrap();
        assert_eq!(url.query, "");
        assert_eq!(url.assemble(), "http://example.com/test");
    }
}
