//! Profile parsing
//!
//! The host hands the codec a flat string-to-string profile at construction
//! time. Only four keys are meaningful here: `k`, `m`, `technique`, and
//! (SizeCeph only) `force_all_chunks`. Every other key is the host's
//! business and is ignored.

use sizeceph_common::{Error, Result};
use std::collections::BTreeMap;

/// A construction-time profile: a flat string-to-string map.
pub type Profile = BTreeMap<String, String>;

fn parse_u8(profile: &Profile, key: &str) -> Result<Option<u8>> {
    match profile.get(key) {
        None => Ok(None),
        Some(v) => v
            .parse::<u8>()
            .map(Some)
            .map_err(|_| Error::invalid(format!("profile key `{key}` is not a valid integer: {v}"))),
    }
}

fn is_true(profile: &Profile, key: &str) -> bool {
    profile.get(key).is_some_and(|v| v == "true")
}

/// Validated SizeCeph construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeCephProfile {
    /// Whether `force_all_chunks=true` was requested (legacy `k=9,m=0` shape
    /// is accepted in addition to the standard `k=4,m=5` shape). Runtime
    /// behavior is identical either way: all shards are always required.
    pub force_all_chunks: bool,
}

/// Validate a profile for the SizeCeph (k=4, m=5) technique.
///
/// # Errors
/// Returns [`Error::Invalid`] if `k`/`m`/`technique` are present but do not
/// match one of the two accepted shapes.
pub fn validate_sizeceph_profile(
    profile: &Profile,
    k: u8,
    m: u8,
    legacy_k: u8,
    legacy_m: u8,
) -> Result<SizeCephProfile> {
    if let Some(technique) = profile.get("technique") {
        if technique != "sizeceph" {
            return Err(Error::invalid(format!(
                "technique `{technique}` does not match sizeceph"
            )));
        }
    }

    let force_all_chunks = is_true(profile, "force_all_chunks");
    let profile_k = parse_u8(profile, "k")?;
    let profile_m = parse_u8(profile, "m")?;

    let (expected_k, expected_m) = if force_all_chunks {
        (legacy_k, legacy_m)
    } else {
        (k, m)
    };

    if let Some(profile_k) = profile_k {
        if profile_k != expected_k {
            return Err(Error::invalid(format!(
                "k={profile_k} does not match required k={expected_k}"
            )));
        }
    }
    if let Some(profile_m) = profile_m {
        if profile_m != expected_m {
            return Err(Error::invalid(format!(
                "m={profile_m} does not match required m={expected_m}"
            )));
        }
    }

    Ok(SizeCephProfile { force_all_chunks })
}

/// Validate a profile for the simple-XOR (k=2, m=1) technique.
///
/// # Errors
/// Returns [`Error::Invalid`] if `k`/`m`/`technique` are present but do not
/// equal `2`/`1`/`"simple_xor"` respectively.
pub fn validate_xor_profile(profile: &Profile, k: u8, m: u8) -> Result<()> {
    if let Some(technique) = profile.get("technique") {
        if technique != "simple_xor" {
            return Err(Error::invalid(format!(
                "technique `{technique}` does not match simple_xor"
            )));
        }
    }
    if let Some(profile_k) = parse_u8(profile, "k")? {
        if profile_k != k {
            return Err(Error::invalid(format!("k={profile_k} must equal {k}")));
        }
    }
    if let Some(profile_m) = parse_u8(profile, "m")? {
        if profile_m != m {
            return Err(Error::invalid(format!("m={profile_m} must equal {m}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(pairs: &[(&str, &str)]) -> Profile {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn sizeceph_default_profile_is_accepted() {
        let p = profile(&[]);
        let parsed = validate_sizeceph_profile(&p, 4, 5, 9, 0).unwrap();
        assert!(!parsed.force_all_chunks);
    }

    #[test]
    fn sizeceph_standard_shape_is_accepted() {
        let p = profile(&[("k", "4"), ("m", "5")]);
        let parsed = validate_sizeceph_profile(&p, 4, 5, 9, 0).unwrap();
        assert!(!parsed.force_all_chunks);
    }

    #[test]
    fn sizeceph_legacy_shape_requires_force_all_chunks() {
        let p = profile(&[("k", "9"), ("m", "0")]);
        assert!(validate_sizeceph_profile(&p, 4, 5, 9, 0).is_err());

        let p = profile(&[("k", "9"), ("m", "0"), ("force_all_chunks", "true")]);
        let parsed = validate_sizeceph_profile(&p, 4, 5, 9, 0).unwrap();
        assert!(parsed.force_all_chunks);
    }

    #[test]
    fn sizeceph_rejects_wrong_k() {
        let p = profile(&[("k", "6")]);
        assert!(validate_sizeceph_profile(&p, 4, 5, 9, 0).is_err());
    }

    #[test]
    fn xor_accepts_default_and_explicit_shapes() {
        assert!(validate_xor_profile(&profile(&[]), 2, 1).is_ok());
        assert!(validate_xor_profile(&profile(&[("k", "2"), ("m", "1")]), 2, 1).is_ok());
        assert!(validate_xor_profile(&profile(&[("k", "3")]), 2, 1).is_err());
    }
}
