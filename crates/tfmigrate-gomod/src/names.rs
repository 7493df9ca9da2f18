//! Names derived from the module path.

const PROVIDER_PREFIX: &str = "terraform-provider-";

/// Last element of a module path, skipping a `/vN` major-version suffix.
pub fn module_base(module_path: &str) -> &str {
    let mut parts = module_path.trim_end_matches('/').rsplit('/');
    let last = parts.next().unwrap_or("");
    if is_major_suffix(last) {
        parts.next().unwrap_or(last)
    } else {
        last
    }
}

fn is_major_suffix(part: &str) -> bool {
    part.len() > 1 && part.starts_with('v') && part[1..].chars().all(|c| c.is_ascii_digit())
}

/// `github.com/acme/terraform-provider-acme` -> `acme`.
pub fn derive_provider_name(module_path: &str) -> Option<String> {
    let base = module_base(module_path);
    let name = base.strip_prefix(PROVIDER_PREFIX).unwrap_or(base);
    (!name.is_empty()).then(|| name.to_string())
}

/// `github.com/<org>/<repo>[/...]` -> `registry.terraform.io/<org>/<name>`.
///
/// Only GitHub-hosted modules have a conventional registry address.
pub fn derive_registry_address(module_path: &str) -> Option<String> {
    let parts: Vec<&str> = module_path.split('/').collect();
    if parts.len() < 3 || parts[0] != "github.com" || parts[1].is_empty() {
        return None;
    }
    let name = derive_provider_name(module_path)?;
    Some(format!("registry.terraform.io/{}/{name}", parts[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_base() {
        assert_eq!(
            module_base("github.com/acme/terraform-provider-acme"),
            "terraform-provider-acme"
        );
        assert_eq!(
            module_base("github.com/acme/terraform-provider-acme/v3"),
            "terraform-provider-acme"
        );
        assert_eq!(module_base("example.com/v"), "v");
        assert_eq!(module_base("single"), "single");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(
            derive_provider_name("github.com/acme/terraform-provider-acme/v2").as_deref(),
            Some("acme")
        );
        assert_eq!(derive_provider_name("example.com/tools/widget").as_deref(), Some("widget"));
        assert_eq!(derive_provider_name(""), None);
    }

    #[test]
    fn test_registry_address() {
        assert_eq!(
            derive_registry_address("github.com/acme/terraform-provider-acme").as_deref(),
            Some("registry.terraform.io/acme/acme")
        );
        assert_eq!(
            derive_registry_address("github.com/acme/terraform-provider-acme/v2").as_deref(),
            Some("registry.terraform.io/acme/acme")
        );
        assert_eq!(derive_registry_address("gitlab.com/acme/terraform-provider-acme"), None);
        assert_eq!(derive_registry_address("github.com/acme"), None);
    }
}
