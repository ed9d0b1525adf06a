// src/environment.rs

//! Immutable environment handed to every spawned command.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// Mapping of environment variable name to value.
///
/// Names and values are kept as [`OsString`] so variables that are not
/// valid Unicode still reach child processes untouched.
///
/// Captured once per run; recipe-level exports produce a new mapping via
/// [`Environment::with_overrides`] and never mutate the shared one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Value of `name`, if set and valid Unicode.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_os(name).and_then(OsStr::to_str)
    }

    pub fn get_os(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(name)).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// New environment with `overrides` applied on top of `self`.
    pub fn with_overrides<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut vars = self.vars.clone();
        for (k, v) in overrides {
            vars.insert(k.into(), v.into());
        }
        Self { vars }
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_produce_a_new_mapping() {
        let base: Environment = [("PATH", "/bin"), ("MODE", "dev")].into_iter().collect();
        let derived = base.with_overrides([("MODE", "release"), ("EXTRA", "1")]);

        assert_eq!(base.get("MODE"), Some("dev"));
        assert_eq!(base.get("EXTRA"), None);
        assert_eq!(derived.get("MODE"), Some("release"));
        assert_eq!(derived.get("PATH"), Some("/bin"));
        assert_eq!(derived.len(), 3);
    }

    #[test]
    fn process_snapshot_is_not_empty() {
        assert!(!Environment::from_process().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_values_are_kept() {
        use std::os::unix::ffi::OsStringExt;

        let latin1 = OsString::from_vec(b"caf\xe9".to_vec());
        let base: Environment = [(OsString::from("CITY"), latin1.clone())].into_iter().collect();
        let derived = base.with_overrides([("MODE", "dev")]);

        assert_eq!(derived.get_os("CITY"), Some(latin1.as_os_str()));
        assert_eq!(derived.get("CITY"), None);
        assert!(derived.iter().any(|(k, v)| k == "CITY" && v == latin1.as_os_str()));
    }
}
