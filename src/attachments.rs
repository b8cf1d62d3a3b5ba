//! Attachment path handling: boundary validation, the merge rule used at
//! finalization, and outward URL resolution.

use crate::errors::AppError;

pub const MAX_ATTACHMENTS: usize = 10;
pub const MAX_PATH_LEN: usize = 500;

/// Boundary validation for client-supplied attachment paths.
pub fn validate_paths(paths: &[String]) -> Result<(), AppError> {
    if paths.len() > MAX_ATTACHMENTS {
        return Err(AppError::Validation(format!(
            "at most {MAX_ATTACHMENTS} attachments are allowed"
        )));
    }
    for path in paths {
        if path.trim().is_empty() {
            return Err(AppError::Validation(
                "attachment path cannot be empty".to_string(),
            ));
        }
        if path.chars().count() > MAX_PATH_LEN {
            return Err(AppError::Validation(format!(
                "attachment path exceeds {MAX_PATH_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Appends incoming paths to the existing list. Order is preserved and
/// duplicates keep their first occurrence; nothing is ever dropped from the
/// existing list.
pub fn merge(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for path in incoming {
        if !merged.iter().any(|p| p == path) {
            merged.push(path.clone());
        }
    }
    merged
}

/// Maps stored attachment paths to client-facing URLs. Without a configured
/// base URL the stored paths pass through untouched.
#[derive(Debug, Clone)]
pub enum AttachmentResolver {
    Unconfigured,
    BaseUrl(String),
}

impl AttachmentResolver {
    pub fn from_config(base: Option<&str>) -> Self {
        match base {
            Some(b) if !b.trim().is_empty() => {
                AttachmentResolver::BaseUrl(b.trim().trim_end_matches('/').to_string())
            }
            _ => AttachmentResolver::Unconfigured,
        }
    }

    pub fn resolve(&self, path: &str) -> String {
        match self {
            AttachmentResolver::Unconfigured => path.to_string(),
            AttachmentResolver::BaseUrl(base) => {
                format!("{}/{}", base, path.trim_start_matches('/'))
            }
        }
    }

    pub fn resolve_all(&self, paths: &[String]) -> Vec<String> {
        paths.iter().map(|p| self.resolve(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_appends_new_and_skips_duplicates() {
        let merged = merge(&paths(&["a.pdf", "b.pdf"]), &paths(&["b.pdf", "c.pdf"]));
        assert_eq!(merged, paths(&["a.pdf", "b.pdf", "c.pdf"]));
    }

    #[test]
    fn merge_with_empty_incoming_keeps_existing() {
        let merged = merge(&paths(&["a.pdf"]), &[]);
        assert_eq!(merged, paths(&["a.pdf"]));
    }

    #[test]
    fn validate_rejects_blank_path() {
        assert!(validate_paths(&paths(&["ok.pdf", "  "])).is_err());
    }

    #[test]
    fn validate_rejects_too_many() {
        let many: Vec<String> = (0..=MAX_ATTACHMENTS).map(|i| format!("f{i}.pdf")).collect();
        assert!(validate_paths(&many).is_err());
    }

    #[test]
    fn resolver_prefixes_base_url() {
        let resolver = AttachmentResolver::from_config(Some("https://files.example.com/"));
        assert_eq!(resolver.resolve("/docs/a.pdf"), "https://files.example.com/docs/a.pdf");
    }

    #[test]
    fn unconfigured_resolver_passes_through() {
        let resolver = AttachmentResolver::from_config(None);
        assert_eq!(resolver.resolve("docs/a.pdf"), "docs/a.pdf");
    }
}
