#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use compat_core::corrections::CorrectionTable;
use compat_core::data::{NormalizationPolicy, ReferenceData};
use compat_core::identity::ParsedUserAgent;
use compat_core::{
    BoxError, BrowserId, CompatConfig, CompatEngine, ComparisonOperator, FeatureSupportResolver, KnownVersions,
    QueryClause,
};

pub const PRIMARY_JSON: &str = r#"{
  "agents": {},
  "data": {
    "fetch": {
      "title": "Fetch",
      "stats": {
        "chrome": {"40": "n", "41": "n", "42": "y", "43": "y", "44": "y", "45": "y"},
        "firefox": {"50": "y", "51": "y", "52": "y", "53": "y", "54": "y", "55": "y"},
        "safari": {"10": "n", "10.1": "y", "11": "y", "11.1": "y", "12": "y", "TP": "y"},
        "ios_saf": {"10.0-10.2": "n", "10.3": "y", "11.0-11.2": "y", "11.3-11.4": "y", "12.0-12.1": "y"},
        "ie": {"9": "n", "10": "n", "11": "n"},
        "edge": {"12": "n", "13": "n", "14": "y", "16": "y"},
        "op_mini": {"all": "n"},
        "android": {"4.4": "n", "4.4.3-4.4.4": "n", "120": "y"},
        "and_chr": {"120": "y"}
      }
    },
    "es6-module": {
      "title": "JavaScript modules via script tag",
      "stats": {
        "chrome": {"40": "n", "41": "n", "42": "n", "43": "n", "44": "y", "45": "y"},
        "firefox": {"50": "n", "51": "n", "52": "n", "53": "n", "54": "n d #3", "55": "y"},
        "safari": {"10": "n", "10.1": "y", "11": "y", "12": "y", "TP": "y"},
        "ios_saf": {"10.0-10.2": "n", "10.3": "y", "11.0-11.2": "y", "12.0-12.1": "y"},
        "ie": {"9": "n", "10": "n", "11": "n"},
        "edge": {"12": "n", "13": "n", "14": "n"},
        "op_mini": {"all": "n"},
        "android": {"4.4": "n", "4.4.3-4.4.4": "n"}
      }
    },
    "shadowdomv1": {
      "title": "Shadow DOM (V1)",
      "stats": {
        "chrome": {"40": "n", "41": "n", "42": "a #1", "43": "a #1", "44": "y", "45": "y"},
        "firefox": {"50": "n", "51": "n", "52": "n", "53": "n d #2", "54": "a x", "55": "y"},
        "safari": {"10": "a", "10.1": "a", "11": "y", "12": "y", "TP": "y"},
        "ios_saf": {"10.0-10.2": "a", "10.3": "a", "11.0-11.2": "y", "12.0-12.1": "y"},
        "ie": {"9": "n", "10": "n", "11": "n"},
        "edge": {"12": "n", "13": "n", "14": "n"},
        "op_mini": {"all": "n"},
        "android": {"4.4": "n", "4.4.3-4.4.4": "n"}
      }
    },
    "css-has": {
      "title": ":has() CSS relational pseudo-class",
      "stats": {
        "chrome": {"40": "n", "41": "n", "42": "n", "43": "n", "44": "n", "45": "n"},
        "firefox": {"50": "n", "51": "n", "52": "n", "53": "n", "54": "n", "55": "n"},
        "safari": {"10": "n", "10.1": "n", "11": "n", "12": "n", "TP": "y"},
        "ios_saf": {"10.0-10.2": "n", "10.3": "n", "11.0-11.2": "n", "12.0-12.1": "n"},
        "ie": {"9": "n", "10": "n", "11": "n"},
        "edge": {"12": "n", "13": "n", "14": "n"},
        "op_mini": {"all": "n"},
        "android": {"4.4": "n", "4.4.3-4.4.4": "n"}
      }
    },
    "data-saver": {
      "title": "Save-Data",
      "stats": {
        "chrome": {"40": "n", "41": "n", "42": "n", "43": "n", "44": "n", "45": "n"},
        "op_mini": {"all": "y"}
      }
    }
  }
}"#;

pub const SECONDARY_JSON: &str = r#"{
  "__meta": {"version": "5.5.0"},
  "api": {
    "AbortController": {
      "__compat": {
        "description": "AbortController",
        "support": {
          "chrome": {"version_added": "43"},
          "chrome_android": {"version_added": "66"},
          "edge": {"version_added": "16"},
          "firefox": {"version_added": "48"},
          "ie": {"version_added": false},
          "safari": {"version_added": "11.1"},
          "safari_ios": {"version_added": "11.3"},
          "webview_android": {"version_added": "66"}
        }
      },
      "signal": {
        "__compat": {
          "support": {
            "chrome": {"version_added": "43"},
            "firefox": {"version_added": null}
          }
        }
      }
    }
  },
  "javascript": {
    "builtins": {
      "Array": {
        "__compat": {
          "support": {
            "chrome": {"version_added": true},
            "safari": {"version_added": true}
          }
        },
        "flat": {
          "__compat": {
            "support": {
              "chrome": [
                {"version_added": "45"},
                {"version_added": "42", "version_removed": "44"}
              ],
              "firefox": {"version_added": "preview"},
              "safari": {"version_added": "12"}
            }
          }
        }
      }
    }
  }
}"#;

pub fn fixture_data() -> ReferenceData {
    ReferenceData::from_json_strs(PRIMARY_JSON, SECONDARY_JSON).expect("fixture datasets parse")
}

pub fn bundled_config() -> CompatConfig {
    CompatConfig::bundled().expect("bundled configuration is valid")
}

pub fn fixture_known() -> KnownVersions {
    fixture_data().known_versions(&bundled_config().normalization)
}

/// A feature resolver over the fixtures with a custom correction table.
pub fn resolver_with(corrections: CorrectionTable) -> FeatureSupportResolver {
    let data = fixture_data();
    let policy: NormalizationPolicy = bundled_config().normalization;
    let known = Arc::new(data.known_versions(&policy));
    FeatureSupportResolver::new(Arc::new(data), known, policy, corrections)
}

pub fn fixture_resolver() -> FeatureSupportResolver {
    resolver_with(bundled_config().corrections)
}

pub fn fixture_engine() -> CompatEngine<fn(&str) -> ParsedUserAgent> {
    CompatEngine::with_default_bots(fixture_data(), bundled_config(), parse_fixture as fn(&str) -> ParsedUserAgent)
}

pub fn rendered(clauses: &[QueryClause]) -> Vec<String> {
    clauses.iter().map(ToString::to_string).collect()
}

pub const FIREFOX_54: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:54.0) Gecko/20100101 Firefox/54.0";
pub const CHROME_ANDROID: &str =
    "Mozilla/5.0 (Linux; Android 10; Pixel 3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.43 Mobile Safari/537.36";
pub const SAFARI_DESKTOP: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1.2 Safari/605.1.15";
pub const IOS_FACEBOOK: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_3_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 [FBAN/FBIOS;FBAV/250.0.0.30.113]";
pub const IOS_OPERA_MINI: &str =
    "Opera/9.80 (iPhone; Opera Mini/16.0.14/191.256; U; en) Presto/2.12.423 Version/12.16";
pub const BLACKBERRY: &str =
    "Mozilla/5.0 (BlackBerry; U; BlackBerry 9900; en) AppleWebKit/534.11+ (KHTML, like Gecko) Version/7.1.0.346 Mobile Safari/534.11+";
pub const PALE_MOON_28: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:68.9) Gecko/20100101 Goanna/4.6 Firefox/68.9 PaleMoon/28.9.0";
pub const PALE_MOON_26: &str = "Mozilla/5.0 (Windows NT 6.1; rv:26.5) Gecko/20100101 Goanna/2.2 PaleMoon/26.5.0";
pub const PALE_MOON_20: &str = "Mozilla/5.0 (Windows NT 6.1; rv:20.0) Gecko/20100101 PaleMoon/20.3";
pub const PALE_MOON_3: &str = "Mozilla/5.0 (Windows NT 5.1; rv:1.9.2) Gecko/20100101 PaleMoon/3.6.31";
pub const FACEBOOK_ANDROID_152: &str =
    "Mozilla/5.0 (Linux; Android 8.0.0; SM-G930F) [FB_IAB/FB4A;FBAV/152.0.0.40.116;]";
pub const FACEBOOK_ANDROID_200: &str =
    "Mozilla/5.0 (Linux; Android 9; SM-G960F) [FB_IAB/FB4A;FBAV/200.0.0.12.120;]";
pub const SAMSUNG_WEBVIEW: &str = "Mozilla/5.0 (Linux; Android 9; SM-G960F Build/PPR1; wv) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/9.2 Chrome/67.0.3396.87 Mobile Safari/537.36";
pub const ANDROID_STOCK: &str = "Mozilla/5.0 (Linux; U; Android 4.4.2; en-us; Nexus 5 Build/KOT49H) AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30";
pub const KAIOS: &str = "Mozilla/5.0 (Mobile; LYF/F300B/LYF-F300B-001-01-15-130718-i; Android; rv:48.0) Gecko/48.0 Firefox/48.0 KAIOS/2.5";
pub const VIVALDI: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Vivaldi/2.1.1337.51";
pub const GOOGLEBOT: &str = "Googlebot/2.1 (+http://www.google.com/bot.html)";
pub const GENERIC_CRAWLER: &str = "SomeCrawler/1.0 (+http://example.com/crawler)";
pub const HEADLESS_CHROME: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/79.0.3945.0 Safari/537.36";
pub const EDGE_LEGACY: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/18.17763";
pub const GARBAGE: &str = "definitely not a browser";

/// In-memory stand-in for the generic identification-string parser.
pub fn parse_fixture(raw: &str) -> ParsedUserAgent {
    let parsed = ParsedUserAgent::new(raw);
    match raw {
        FIREFOX_54 => parsed
            .with_browser("Firefox", "54.0")
            .with_engine("Gecko", "54.0")
            .with_os("Windows", "10"),
        CHROME_ANDROID => parsed
            .with_browser("Chrome", "120.0.6099.43")
            .with_engine("Blink", "120.0.6099.43")
            .with_os("Android", "10"),
        SAFARI_DESKTOP => parsed
            .with_browser("Safari", "12.1.2")
            .with_engine("WebKit", "605.1.15")
            .with_os("Mac OS", "10.14.6"),
        IOS_FACEBOOK => parsed
            .with_browser("Facebook", "250.0.0.30.113")
            .with_engine("WebKit", "605.1.15")
            .with_os("iOS", "13.3.1"),
        IOS_OPERA_MINI => parsed
            .with_browser("Opera Mini", "16.0.14")
            .with_engine("Presto", "2.12.423")
            .with_os("iOS", "12.1"),
        BLACKBERRY => parsed
            .with_browser("BlackBerry", "7.1.0.346")
            .with_engine("WebKit", "534.11")
            .with_os("BlackBerry", "7.1.0.346")
            .with_device_vendor("BlackBerry"),
        PALE_MOON_28 => parsed
            .with_browser("Pale Moon", "28.9.0")
            .with_engine("Goanna", "4.6")
            .with_os("Windows", "10"),
        PALE_MOON_26 => parsed
            .with_browser("Pale Moon", "26.5.0")
            .with_engine("Goanna", "2.2")
            .with_os("Windows", "7"),
        PALE_MOON_20 => parsed
            .with_browser("Pale Moon", "20.3")
            .with_engine("Gecko", "20.0")
            .with_os("Windows", "7"),
        PALE_MOON_3 => parsed
            .with_browser("Pale Moon", "3.6.31")
            .with_engine("Gecko", "1.9.2")
            .with_os("Windows", "XP"),
        FACEBOOK_ANDROID_152 => parsed.with_browser("Facebook", "152.0.0.40.116").with_os("Android", "8.0.0"),
        FACEBOOK_ANDROID_200 => parsed.with_browser("Facebook", "200.0.0.12.120").with_os("Android", "9"),
        SAMSUNG_WEBVIEW => parsed
            .with_browser("Chrome WebView", "67.0.3396.87")
            .with_engine("Blink", "67.0.3396.87")
            .with_os("Android", "9"),
        ANDROID_STOCK => parsed
            .with_browser("Android Browser", "4.0")
            .with_engine("WebKit", "534.30")
            .with_os("Android", "4.4.2"),
        KAIOS => parsed
            .with_browser("Firefox", "48.0")
            .with_engine("Gecko", "48.0")
            .with_os("KaiOS", "2.5"),
        VIVALDI => parsed
            .with_browser("Vivaldi", "2.1.1337.51")
            .with_engine("Blink", "70.0.3538.102")
            .with_os("Linux", "x86_64"),
        HEADLESS_CHROME => parsed
            .with_browser("Chrome Headless", "79.0.3945.0")
            .with_engine("Blink", "79.0.3945.0")
            .with_os("Linux", "x86_64"),
        EDGE_LEGACY => parsed
            .with_browser("Edge", "18.17763")
            .with_engine("EdgeHTML", "18.17763")
            .with_os("Windows", "10"),
        _ => parsed,
    }
}

/// Expands clauses over the known version lists, the way the external
/// query resolver does: positive clauses add, negated clauses remove.
/// Unreleased versions are never part of the known lists.
pub struct ExpandingResolver {
    pub known: KnownVersions,
}

impl ExpandingResolver {
    pub fn new(known: KnownVersions) -> Self {
        Self { known }
    }

    pub fn expand(&self, clause: &QueryClause) -> BTreeSet<String> {
        match clause {
            QueryClause::Range {
                browser,
                operator,
                version,
            } => self
                .known
                .versions(*browser)
                .iter()
                .filter(|v| {
                    let ord = self.known.compare(*browser, v, version);
                    match operator {
                        ComparisonOperator::Less => ord == Ordering::Less,
                        ComparisonOperator::LessOrEqual => ord != Ordering::Greater,
                        ComparisonOperator::Greater => ord == Ordering::Greater,
                        ComparisonOperator::GreaterOrEqual => ord != Ordering::Less,
                    }
                })
                .map(|v| format!("{browser} {v}"))
                .collect(),
            QueryClause::Exact { browser, version } => [format!("{browser} {version}")].into_iter().collect(),
            QueryClause::Unreleased { .. } => BTreeSet::new(),
            QueryClause::Not(inner) => self.expand(inner),
        }
    }

    pub fn expand_all(&self, clauses: &[QueryClause]) -> BTreeSet<String> {
        let mut selected = BTreeSet::new();
        for clause in clauses {
            let versions = self.expand(clause);
            if clause.is_negated() {
                selected.retain(|v| !versions.contains(v));
            } else {
                selected.extend(versions);
            }
        }
        selected
    }

    /// Every known `"<browser> <version>"` of the given browsers.
    pub fn universe(&self, browsers: impl IntoIterator<Item = BrowserId>) -> BTreeSet<String> {
        browsers
            .into_iter()
            .flat_map(|b| self.known.versions(b).iter().map(move |v| format!("{b} {v}")))
            .collect()
    }
}

impl compat_core::QueryResolver for ExpandingResolver {
    fn resolve(&self, clauses: &[String]) -> Result<BTreeSet<String>, BoxError> {
        let mut parsed = Vec::with_capacity(clauses.len());
        for clause in clauses {
            parsed.push(clause.parse::<QueryClause>()?);
        }
        Ok(self.expand_all(&parsed))
    }
}
