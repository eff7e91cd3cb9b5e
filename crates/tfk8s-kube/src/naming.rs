//! Type and attribute naming

/// Suffix of the manifest data source type name
pub const MANIFEST_SUFFIX: &str = "_manifest";

/// Type name of a CRD version: `k8s_<group>_<kind>_<version>`
///
/// Lowercased, with `.` and `-` replaced by `_`.
pub fn type_name(group: &str, kind: &str, version: &str) -> String {
    let raw = format!("k8s_{}_{}_{}", group, kind, version);
    raw.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Type name of the manifest data source for a CRD version
pub fn manifest_type_name(group: &str, kind: &str, version: &str) -> String {
    format!("{}{}", type_name(group, kind, version), MANIFEST_SUFFIX)
}

/// Convert a Kubernetes field name to a snake_case attribute name
///
/// `secretName` -> `secret_name`, `tlsCACert` -> `tls_ca_cert`,
/// `x-forwarded-for` -> `x_forwarded_for`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '.' || c == '$' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
