//! Placeholder sanitizers.
//!
//! Python distinguishes between a distribution name (dashes allowed)
//! and an importable package name (underscores only). The same
//! `PROJECT_NAME` answer feeds both, so templates attach one of these
//! to normalize per use site. Sanitizers receive the placeholder name
//! and only touch the project name, every other value passes through.

/// Importable package form: dashes become underscores.
pub fn package(key: &str, value: &str) -> String {
    if key == "PROJECT_NAME" || key == "NAME" {
        value.replace('-', "_")
    } else {
        value.to_owned()
    }
}

/// Distribution name form: underscores become dashes.
pub fn project(key: &str, value: &str) -> String {
    if key == "PROJECT_NAME" || key == "NAME" {
        value.replace('_', "-")
    } else {
        value.to_owned()
    }
}

/// Versions pass through untouched.
pub fn version(_key: &str, value: &str) -> String {
    value.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_form_uses_underscores() {
        assert_eq!(package("PROJECT_NAME", "my-tool"), "my_tool");
        assert_eq!(package("SUMMARY_DESCRIPTION", "a-b"), "a-b");
    }

    #[test]
    fn project_form_uses_dashes() {
        assert_eq!(project("PROJECT_NAME", "my_tool"), "my-tool");
    }

    #[test]
    fn version_is_identity() {
        assert_eq!(version("PACKAGE_VERSION", "1.0.0-rc1"), "1.0.0-rc1");
    }
}
