//! Attribute paths used to locate diagnostics

use std::fmt;

/// One step in an attribute path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Named attribute of an object
    Attribute(String),
    /// Key of a map
    Key(String),
    /// Index into a list
    Index(usize),
}

/// Location of a value inside a configuration tree
///
/// Displayed in Terraform style: `metadata.labels["app"]`, `spec.ports[0].port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    /// The empty (root) path
    pub fn root() -> Self {
        Self::default()
    }

    /// Path consisting of a single attribute
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::root().with_attribute(name)
    }

    /// Extend with a named attribute
    #[must_use]
    pub fn with_attribute(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::Attribute(name.into()))
    }

    /// Extend with a map key
    #[must_use]
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::Key(key.into()))
    }

    /// Extend with a list index
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "(root)");
        }

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Key(key) => write!(f, "[{:?}]", key)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = AttributePath::attribute("metadata")
            .with_attribute("labels")
            .with_key("app");
        assert_eq!(path.to_string(), r#"metadata.labels["app"]"#);

        let path = AttributePath::attribute("spec")
            .with_attribute("ports")
            .with_index(0)
            .with_attribute("port");
        assert_eq!(path.to_string(), "spec.ports[0].port");

        assert_eq!(AttributePath::root().to_string(), "(root)");
    }
}
