use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

pub const USER_SUB_ID_FILE: &str = "/etc/subuid";
pub const GROUP_SUB_ID_FILE: &str = "/etc/subgid";

/// Which kind of subordinate id a map delegates.
#[must_use]
#[derive(
    Debug,
    Eq,
    PartialEq,
    Hash,
    Copy,
    Clone,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    #[strum(to_string = "user", serialize = "uid")]
    User,
    #[strum(to_string = "group", serialize = "gid")]
    Group,
}

/// Locations of the subordinate id files. Missing fields fall back to the
/// system defaults.
#[must_use]
#[derive(Debug, Eq, PartialEq, Hash, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdMapConfig {
    pub user_file: PathBuf,
    pub group_file: PathBuf,
}

impl Default for IdMapConfig {
    fn default() -> Self {
        Self { user_file: USER_SUB_ID_FILE.into(), group_file: GROUP_SUB_ID_FILE.into() }
    }
}

impl IdMapConfig {
    #[must_use]
    pub fn path(&self, kind: IdKind) -> &Path {
        match kind {
            IdKind::User => &self.user_file,
            IdKind::Group => &self.group_file,
        }
    }
}
