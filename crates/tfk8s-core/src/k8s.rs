//! Kubernetes naming and value rules
//!
//! Each check returns the list of violated rules as human-readable messages.
//! An empty list means the value is valid. Messages match the wording used
//! by the Kubernetes API server so users see the same text either way.

use once_cell::sync::Lazy;
use regex::Regex;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";
const DNS1123_LABEL_ERR_MSG: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";
/// Maximum length of a DNS-1123 label
pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

const DNS1123_SUBDOMAIN_ERR_MSG: &str = "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character";
/// Maximum length of a DNS-1123 subdomain
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

const QUALIFIED_NAME_CHAR_FMT: &str = "[A-Za-z0-9]";
const QUALIFIED_NAME_EXT_CHAR_FMT: &str = "[-A-Za-z0-9_.]";
const QUALIFIED_NAME_ERR_MSG: &str = "must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character";
const QUALIFIED_NAME_MAX_LENGTH: usize = 63;

const LABEL_VALUE_ERR_MSG: &str = "a valid label must be an empty string or consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character";
/// Maximum length of a label value
pub const LABEL_VALUE_MAX_LENGTH: usize = 63;

fn dns1123_subdomain_fmt() -> String {
    format!("{0}(\\.{0})*", DNS1123_LABEL_FMT)
}

fn qualified_name_fmt() -> String {
    format!(
        "({0}{1}*)?{0}",
        QUALIFIED_NAME_CHAR_FMT, QUALIFIED_NAME_EXT_CHAR_FMT
    )
}

fn label_value_fmt() -> String {
    format!("({})?", qualified_name_fmt())
}

fn anchored(fmt: &str) -> Regex {
    Regex::new(&format!("^{}$", fmt)).expect("static Kubernetes validation regex")
}

static DNS1123_LABEL_RE: Lazy<Regex> = Lazy::new(|| anchored(DNS1123_LABEL_FMT));
static DNS1123_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| anchored(&dns1123_subdomain_fmt()));
static QUALIFIED_NAME_RE: Lazy<Regex> = Lazy::new(|| anchored(&qualified_name_fmt()));
static LABEL_VALUE_RE: Lazy<Regex> = Lazy::new(|| anchored(&label_value_fmt()));

/// Check a DNS-1123 label (e.g. a namespace-less object name segment)
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errs.push(max_len_error(DNS1123_LABEL_MAX_LENGTH));
    }
    if !DNS1123_LABEL_RE.is_match(value) {
        errs.push(regex_error(
            DNS1123_LABEL_ERR_MSG,
            DNS1123_LABEL_FMT,
            &["my-name", "123-abc"],
        ));
    }
    errs
}

/// Check a DNS-1123 subdomain, the rule for most object names
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errs.push(max_len_error(DNS1123_SUBDOMAIN_MAX_LENGTH));
    }
    if !DNS1123_SUBDOMAIN_RE.is_match(value) {
        errs.push(regex_error(
            DNS1123_SUBDOMAIN_ERR_MSG,
            &dns1123_subdomain_fmt(),
            &["example.com"],
        ));
    }
    errs
}

/// Check a qualified name: an optional DNS subdomain prefix and `/`,
/// followed by a name segment of at most 63 characters
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    let parts: Vec<&str> = value.split('/').collect();

    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                errs.push(format!("prefix part {}", empty_error()));
            } else {
                errs.extend(
                    is_dns1123_subdomain(prefix)
                        .into_iter()
                        .map(|msg| format!("prefix part {}", msg)),
                );
            }
            *name
        }
        _ => {
            errs.push(format!(
                "a qualified name {} with an optional DNS subdomain prefix and '/' (e.g. 'example.com/MyName')",
                regex_error(
                    QUALIFIED_NAME_ERR_MSG,
                    &qualified_name_fmt(),
                    &["MyName", "my.name", "123-abc"],
                )
            ));
            return errs;
        }
    };

    if name.is_empty() {
        errs.push(format!("name part {}", empty_error()));
    } else if name.len() > QUALIFIED_NAME_MAX_LENGTH {
        errs.push(format!("name part {}", max_len_error(QUALIFIED_NAME_MAX_LENGTH)));
    }
    if !QUALIFIED_NAME_RE.is_match(name) {
        errs.push(format!(
            "name part {}",
            regex_error(
                QUALIFIED_NAME_ERR_MSG,
                &qualified_name_fmt(),
                &["MyName", "my.name", "123-abc"],
            )
        ));
    }
    errs
}

/// Check a label value
pub fn is_valid_label_value(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errs.push(max_len_error(LABEL_VALUE_MAX_LENGTH));
    }
    if !LABEL_VALUE_RE.is_match(value) {
        errs.push(regex_error(
            LABEL_VALUE_ERR_MSG,
            &label_value_fmt(),
            &["MyValue", "my_value", "12345"],
        ));
    }
    errs
}

/// Check a TCP/UDP port number
pub fn is_valid_port_num(port: i64) -> Vec<String> {
    if (1..=65535).contains(&port) {
        return Vec::new();
    }
    vec![inclusive_range_error(1, 65535)]
}

/// "must be no more than N characters"
pub fn max_len_error(length: usize) -> String {
    format!("must be no more than {} characters", length)
}

/// "must be non-empty"
pub fn empty_error() -> String {
    "must be non-empty".to_string()
}

/// "must be between LO and HI, inclusive"
pub fn inclusive_range_error(lo: i64, hi: i64) -> String {
    format!("must be between {} and {}, inclusive", lo, hi)
}

/// Describe a regex rule, with optional examples of valid values
pub fn regex_error(msg: &str, fmt: &str, examples: &[&str]) -> String {
    if examples.is_empty() {
        return format!("{} (regex used for validation is '{}')", msg, fmt);
    }

    let mut out = format!("{} (e.g. ", msg);
    for (i, example) in examples.iter().enumerate() {
        if i > 0 {
            out.push_str(" or ");
        }
        out.push_str(&format!("'{}', ", example));
    }
    out.push_str(&format!("regex used for validation is '{}')", fmt));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns1123_subdomain() {
        assert!(is_dns1123_subdomain("ok").is_empty());
        assert!(is_dns1123_subdomain("my-app.example.com").is_empty());
        assert!(is_dns1123_subdomain("a").is_empty());

        assert_eq!(is_dns1123_subdomain("ok/or/not").len(), 1);
        assert!(!is_dns1123_subdomain("Upper").is_empty());
        assert!(!is_dns1123_subdomain("-leading").is_empty());
        assert!(!is_dns1123_subdomain("trailing.").is_empty());
        assert!(!is_dns1123_subdomain("").is_empty());
    }

    #[test]
    fn test_dns1123_subdomain_too_long() {
        let long = "a".repeat(254);
        let errs = is_dns1123_subdomain(&long);
        assert_eq!(errs, vec!["must be no more than 253 characters".to_string()]);
    }

    #[test]
    fn test_dns1123_label() {
        assert!(is_dns1123_label("kube-system").is_empty());
        assert!(!is_dns1123_label("kube.system").is_empty());
        assert_eq!(is_dns1123_label(&"a".repeat(64)).len(), 1);
    }

    #[test]
    fn test_qualified_name() {
        assert!(is_qualified_name("app").is_empty());
        assert!(is_qualified_name("app.kubernetes.io/name").is_empty());
        assert!(is_qualified_name("MyName").is_empty());
        assert!(is_qualified_name("my_name.x-y").is_empty());

        let errs = is_qualified_name("/some/value");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].starts_with("a qualified name must consist of"));

        let errs = is_qualified_name("/name");
        assert_eq!(errs, vec!["prefix part must be non-empty".to_string()]);

        let errs = is_qualified_name("example.com/");
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0], "name part must be non-empty");

        let errs = is_qualified_name("Example.com/name");
        assert!(errs[0].starts_with("prefix part a lowercase RFC 1123 subdomain"));
    }

    #[test]
    fn test_label_value() {
        assert!(is_valid_label_value("").is_empty());
        assert!(is_valid_label_value("mysql").is_empty());
        assert!(is_valid_label_value("v1.2_3-rc").is_empty());
        assert_eq!(is_valid_label_value("/").len(), 1);
        assert_eq!(is_valid_label_value(&"a".repeat(64)).len(), 1);
        assert_eq!(is_valid_label_value(&"-".repeat(64)).len(), 2);
    }

    #[test]
    fn test_port_num() {
        assert!(is_valid_port_num(1).is_empty());
        assert!(is_valid_port_num(12345).is_empty());
        assert!(is_valid_port_num(65535).is_empty());
        assert_eq!(
            is_valid_port_num(0),
            vec!["must be between 1 and 65535, inclusive".to_string()]
        );
        assert!(!is_valid_port_num(65536).is_empty());
        assert!(!is_valid_port_num(-12345).is_empty());
    }

    #[test]
    fn test_regex_error_format() {
        assert_eq!(
            regex_error("bad", "x+", &["a", "b"]),
            "bad (e.g. 'a',  or 'b', regex used for validation is 'x+')"
        );
        assert_eq!(regex_error("bad", "x+", &[]), "bad (regex used for validation is 'x+')");
    }
}
