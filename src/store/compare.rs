//! Field-by-field comparison of dotted version strings

use serde::Serialize;

/// Which side is newer, and at which field the versions first differ.
///
/// Any difference past the third field is reported as a patch difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionDifference {
    MajorHigherInStore,
    MinorHigherInStore,
    PatchHigherInStore,
    MajorHigherInCurrent,
    MinorHigherInCurrent,
    PatchHigherInCurrent,
    Equal,
}

impl VersionDifference {
    /// True when the store carries a newer version than the running one
    pub const fn is_store_newer(self) -> bool {
        matches!(
            self,
            Self::MajorHigherInStore | Self::MinorHigherInStore | Self::PatchHigherInStore
        )
    }

    pub const fn is_current_newer(self) -> bool {
        matches!(
            self,
            Self::MajorHigherInCurrent | Self::MinorHigherInCurrent | Self::PatchHigherInCurrent
        )
    }
}

/// Compares `store` against `current` one numeric field at a time.
///
/// Components that are not non-negative integers are dropped before comparing, and
/// the shorter sequence is padded with zeros. For example `"1.20"` is newer than
/// `"1.3"` because 20 > 3 in the minor field.
pub fn compare_versions(store: &str, current: &str) -> VersionDifference {
    let store = numeric_components(store);
    let current = numeric_components(current);
    let len = store.len().max(current.len());

    for index in 0..len {
        let store_value = store.get(index).copied().unwrap_or(0);
        let current_value = current.get(index).copied().unwrap_or(0);

        if store_value > current_value {
            return match index {
                0 => VersionDifference::MajorHigherInStore,
                1 => VersionDifference::MinorHigherInStore,
                _ => VersionDifference::PatchHigherInStore,
            };
        }
        if store_value < current_value {
            return match index {
                0 => VersionDifference::MajorHigherInCurrent,
                1 => VersionDifference::MinorHigherInCurrent,
                _ => VersionDifference::PatchHigherInCurrent,
            };
        }
    }

    VersionDifference::Equal
}

fn numeric_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .filter_map(|part| part.parse::<u64>().ok())
        .collect()
}
