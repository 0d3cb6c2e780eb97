//! Environment housekeeping around the installed Office suite.
//!
//! Before a family's loop starts, the run looks up the highest installed
//! Office version and clears that family's "Resiliency" denylist, so files
//! Office previously refused to reopen get retried instead of silently
//! skipped. All of it is best-effort; a missing key is never an error.

use crate::model::Family;

/// Known version identifiers, newest first; first match wins.
/// No 17.0 exists yet, it's there for future-proofing.
pub const KNOWN_OFFICE_VERSIONS: [&str; 5] = ["17.0", "16.0", "15.0", "14.0", "12.0"];

pub trait OfficeEnvironment {
    /// Highest installed Office version, or None when no known version
    /// key is present.
    fn detect_installed_version(&self) -> Option<String>;

    /// Best-effort clear of the family's recently-failed-to-open denylist
    /// for the given version. Failures are silently ignored.
    fn clear_failure_list(&self, family: Family, version: &str);
}

/// Environment for platforms (and tests) without an Office registry.
pub struct NoopEnvironment;

impl OfficeEnvironment for NoopEnvironment {
    fn detect_installed_version(&self) -> Option<String> {
        None
    }

    fn clear_failure_list(&self, _family: Family, _version: &str) {}
}

#[cfg(windows)]
pub mod registry {
    use super::{OfficeEnvironment, KNOWN_OFFICE_VERSIONS};
    use crate::model::Family;
    use std::ffi::OsStr;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::shared::winerror::ERROR_SUCCESS;
    use winapi::um::winnt::{KEY_ALL_ACCESS, KEY_READ};
    use winapi::um::winreg::{
        RegCloseKey, RegDeleteTreeW, RegOpenKeyExW, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
    };

    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(once(0)).collect()
    }

    fn hklm_subkey_exists(subkey: &str) -> bool {
        let wide = to_wide(subkey);
        let mut hkey = ptr::null_mut();
        unsafe {
            if RegOpenKeyExW(HKEY_LOCAL_MACHINE, wide.as_ptr(), 0, KEY_READ, &mut hkey)
                == ERROR_SUCCESS as i32
            {
                RegCloseKey(hkey);
                true
            } else {
                false
            }
        }
    }

    pub struct RegistryEnvironment;

    impl OfficeEnvironment for RegistryEnvironment {
        fn detect_installed_version(&self) -> Option<String> {
            KNOWN_OFFICE_VERSIONS
                .iter()
                .find(|ver| hklm_subkey_exists(&format!("SOFTWARE\\Microsoft\\Office\\{}", ver)))
                .map(|ver| ver.to_string())
        }

        fn clear_failure_list(&self, family: Family, version: &str) {
            let subkey = format!(
                "Software\\Microsoft\\Office\\{}\\{}\\Resiliency",
                version,
                family.app_name()
            );
            let wide = to_wide(&subkey);
            let mut hkey = ptr::null_mut();
            unsafe {
                if RegOpenKeyExW(HKEY_CURRENT_USER, wide.as_ptr(), 0, KEY_ALL_ACCESS, &mut hkey)
                    == ERROR_SUCCESS as i32
                {
                    let disabled = to_wide("DisabledItems");
                    // Missing subkey, access denied, whatever: ignored.
                    let _ = RegDeleteTreeW(hkey, disabled.as_ptr());
                    RegCloseKey(hkey);
                }
            }
        }
    }
}

#[cfg(windows)]
pub fn default_environment() -> Box<dyn OfficeEnvironment> {
    Box::new(registry::RegistryEnvironment)
}

#[cfg(not(windows))]
pub fn default_environment() -> Box<dyn OfficeEnvironment> {
    Box::new(NoopEnvironment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_list_is_newest_first() {
        let mut sorted = KNOWN_OFFICE_VERSIONS.to_vec();
        sorted.sort_by(|a, b| {
            b.parse::<f64>()
                .unwrap()
                .partial_cmp(&a.parse::<f64>().unwrap())
                .unwrap()
        });
        assert_eq!(sorted, KNOWN_OFFICE_VERSIONS.to_vec());
    }
}
