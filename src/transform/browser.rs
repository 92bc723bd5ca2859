//! User-agent classification module
//!
//! Thin wrapper over the `woothee` parser, restricted to the runtimes and
//! browsers the transform engine accepts as targets.

use woothee::parser::Parser;

/// Runtime/browser names usable as transform targets.
const TARGETS: &[&str] = &[
    "chrome", "deno", "edge", "firefox", "hermes", "ie", "ios", "node", "opera", "rhino",
    "safari",
];

/// A recognized requesting runtime: target name plus `major.minor` version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserInfo {
    pub name: &'static str,
    pub version: String,
}

/// Classify a `User-Agent` header value.
///
/// Returns `None` for absent, unparseable, or non-allow-listed agents; the
/// caller then falls back to a conservative baseline target.
pub fn classify(user_agent: Option<&str>) -> Option<BrowserInfo> {
    let user_agent = user_agent?;

    // Deno reports a bare product token woothee does not know.
    if let Some(version) = user_agent.strip_prefix("Deno/") {
        return Some(BrowserInfo {
            name: "deno",
            version: version.to_string(),
        });
    }

    let result = Parser::new().parse(user_agent)?;
    let name = canonical_name(result.name)?;
    let version = result.version.to_string();
    if version.is_empty() || version == "UNKNOWN" {
        return None;
    }
    let version = version.split('.').take(2).collect::<Vec<_>>().join(".");
    Some(BrowserInfo { name, version })
}

fn canonical_name(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    let lowered = match lowered.as_str() {
        "internet explorer" => "ie",
        other => other,
    };
    TARGETS.iter().find(|target| **target == lowered).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";
        let info = classify(Some(ua)).unwrap();
        assert_eq!(info.name, "chrome");
        assert_eq!(info.version, "109.0");
    }

    #[test]
    fn test_firefox() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0";
        let info = classify(Some(ua)).unwrap();
        assert_eq!(info.name, "firefox");
        assert_eq!(info.version, "115.0");
    }

    #[test]
    fn test_internet_explorer_maps_to_ie() {
        let ua = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)";
        let info = classify(Some(ua)).unwrap();
        assert_eq!(info.name, "ie");
        assert_eq!(info.version, "8.0");
    }

    #[test]
    fn test_deno_product_token() {
        let info = classify(Some("Deno/1.38.0")).unwrap();
        assert_eq!(info.name, "deno");
        assert_eq!(info.version, "1.38.0");
    }

    #[test]
    fn test_unrecognized_agents() {
        assert_eq!(classify(None), None);
        assert_eq!(classify(Some("curl/8.0.1")), None);
        assert_eq!(classify(Some("")), None);
    }
}
