//! Host plugin entry points — §6
//!
//! `plugin_version`, `plugin_init`, and `factory` are the three calls a host
//! makes before it ever touches a codec instance. They're free functions
//! rather than methods because the host calls them before any codec object
//! exists.

use crate::facade::PluginCodec;
use crate::profile::Profile;
use crate::sizeceph::SizeCephCodec;
use crate::xor::XorCodec;
use parking_lot::Mutex;
use sizeceph_common::{Error, Result};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// The version string this plugin reports to the host.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `plugin_version() → string`.
#[must_use]
pub fn plugin_version() -> &'static str {
    PLUGIN_VERSION
}

static REGISTRY: OnceLock<Mutex<BTreeSet<String>>> = OnceLock::new();

fn registry() -> &'static Mutex<BTreeSet<String>> {
    REGISTRY.get_or_init(|| Mutex::new(BTreeSet::new()))
}

/// `plugin_init(name, directory) → status`.
///
/// Registers a factory under `name` with the host's plugin registry.
/// `directory` is accepted for interface compatibility (it would tell a
/// real loader where to search for native libraries) but is unused: binding
/// discovery goes through [`crate::binding::LIBRARY_PATH_ENV`] instead.
///
/// # Errors
/// Returns [`Error::Invalid`] if `name` is already registered.
pub fn plugin_init(name: &str, _directory: &str) -> Result<()> {
    let mut names = registry().lock();
    if !names.insert(name.to_string()) {
        return Err(Error::invalid(format!("plugin `{name}` already registered")));
    }
    tracing::debug!(name, "registered plugin factory");
    Ok(())
}

/// `factory(directory, profile, out_codec, err) → status`.
///
/// Instantiates the codec named by `profile["technique"]` (defaulting to
/// `sizeceph`), calling the equivalent of `init(profile, err)` during
/// construction; on failure no instance is returned.
///
/// # Errors
/// Returns [`Error::Invalid`] if `profile` names an unknown `technique` or
/// fails that codec's own profile validation.
pub fn factory(_directory: &str, profile: &Profile) -> Result<PluginCodec> {
    match profile.get("technique").map(String::as_str) {
        Some("simple_xor") => XorCodec::new(profile).map(PluginCodec::Xor),
        Some("sizeceph") | None => SizeCephCodec::new(profile).map(PluginCodec::SizeCeph),
        Some(other) => Err(Error::invalid(format!("unknown technique: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::ErasureCodeInterface;

    #[test]
    fn plugin_init_rejects_duplicate_names() {
        let name = "sizeceph_factory_test_unique_name";
        assert!(plugin_init(name, "/unused").is_ok());
        assert!(plugin_init(name, "/unused").is_err());
    }

    #[test]
    fn factory_defaults_to_sizeceph() {
        let codec = factory("/unused", &Profile::new()).unwrap();
        assert_eq!(codec.name(), "sizeceph");
        assert_eq!(codec.get_chunk_count(), 9);
    }

    #[test]
    fn factory_honors_explicit_technique() {
        let mut profile = Profile::new();
        profile.insert("technique".to_string(), "simple_xor".to_string());
        let codec = factory("/unused", &profile).unwrap();
        assert_eq!(codec.name(), "simple_xor");
        assert_eq!(codec.get_chunk_count(), 3);
    }

    #[test]
    fn factory_rejects_unknown_technique() {
        let mut profile = Profile::new();
        profile.insert("technique".to_string(), "reed_solomon".to_string());
        assert!(factory("/unused", &profile).is_err());
    }
}
