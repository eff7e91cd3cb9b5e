//! Multi-document YAML splitting

/// Split a multi-document YAML stream into its documents
///
/// A separator is a line starting with `---`, optionally followed by
/// whitespace and a comment. Documents that are empty or contain only
/// comments are dropped. Indented `---` (block scalars) and `---` followed by
/// other content on the same line are not separators.
pub fn split_documents(text: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if is_separator(line) {
            push_document(&mut documents, &current);
            current.clear();
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    push_document(&mut documents, &current);

    documents
}

fn is_separator(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("---") else {
        return false;
    };
    let rest = rest.trim();
    rest.is_empty() || rest.starts_with('#')
}

fn push_document(documents: &mut Vec<String>, document: &str) {
    let has_content = document.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if has_content {
        documents.push(document.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let docs = split_documents("a: 1\n---\nb: 2\n--- # second\nc: 3\n");
        assert_eq!(docs, vec!["a: 1\n", "b: 2\n", "c: 3\n"]);
    }

    #[test]
    fn test_drops_empty_and_comment_only() {
        let docs = split_documents("---\n# Source: crds.yaml\n\n---\n---\nkind: X\n---\n");
        assert_eq!(docs, vec!["kind: X\n"]);
    }

    #[test]
    fn test_block_scalar_is_not_separator() {
        let text = "description: |\n  first\n  ---\n  second\nvalue: \"---\"\n";
        assert_eq!(split_documents(text), vec![text.to_string()]);
    }

    #[test]
    fn test_separator_with_content_is_not_split() {
        let text = "a: 1\n---- not a separator\n";
        assert_eq!(split_documents(text).len(), 1);
    }

    #[test]
    fn test_crlf_lines() {
        let docs = split_documents("a: 1\r\n---\r\nb: 2\r\n");
        assert_eq!(docs.len(), 2);
    }
}
