use serde::{Deserialize, Serialize};

/// A business entity in the ledger. The `code` is the primary key and never
/// changes once the row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl Company {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a company. Fields left as `None` retain their prior
/// values; `code` is immutable and has no place here.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_builder() {
        let company = Company::new("apple", "Apple Computer").with_description("Maker of OSX");
        assert_eq!(company.code, "apple");
        assert_eq!(company.name, "Apple Computer");
        assert_eq!(company.description.as_deref(), Some("Maker of OSX"));
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(CompanyPatch::default().is_empty());
        let patch = CompanyPatch {
            name: Some("Apple Inc".into()),
            description: None,
        };
        assert!(!patch.is_empty());
    }
}
