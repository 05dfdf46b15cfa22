// ABOUTME: Loader for the builtin site profile catalog from embedded JSON data.
// ABOUTME: Provides load_builtin_registry() to initialize the default ProfileRegistry.

use crate::profiles::{ProfileRegistry, SiteProfile};

/// Embedded JSON containing the builtin site profile catalog.
const BUILTIN_PROFILES_JSON: &str = include_str!("../../data/site_profiles.json");

/// Loads the builtin profile registry from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn load_builtin_registry() -> ProfileRegistry {
    let profiles: Vec<SiteProfile> =
        serde_json::from_str(BUILTIN_PROFILES_JSON).expect("failed to parse builtin site profiles");

    let mut registry = ProfileRegistry::new();
    for profile in profiles {
        registry.register(profile);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_builtin_registry_succeeds() {
        let registry = load_builtin_registry();
        assert!(!registry.is_empty());
    }

    #[test]
    fn builtin_registry_contains_townwork() {
        let registry = load_builtin_registry();
        let profile = registry.resolve("townwork.net");
        assert!(profile.is_some(), "townwork.net profile not found");
        let profile = profile.unwrap();
        assert_eq!(profile.source, "タウンワーク");
        assert!(profile.company.is_some());
        assert!(profile.title.is_some());
        assert!(!profile.brand_overrides.is_empty());
    }

    #[test]
    fn builtin_registry_contains_indeed() {
        let registry = load_builtin_registry();
        let profile = registry.resolve("jp.indeed.com");
        assert!(profile.is_some(), "indeed.com profile not found");
        let profile = profile.unwrap();
        assert_eq!(profile.source, "Indeed");
        assert!(profile.title.is_some());
        assert!(profile.description.is_some());
    }

    #[test]
    fn builtin_specs_are_never_empty() {
        let registry = load_builtin_registry();
        for host in ["townwork.net", "indeed.com"] {
            let profile = registry.resolve(host).unwrap();
            for (field, spec) in profile.field_specs() {
                assert!(
                    !spec.strategies.is_empty(),
                    "{} has an empty chain for {:?}",
                    host,
                    field
                );
            }
        }
    }
}
