use std::fmt;
use std::ops::BitOr;

/// Bitmask of capabilities granted to a role
///
/// Each named flag is a distinct power of two. The zero value is
/// `NO_PERMISSIONS`; `ADMIN` occupies bit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(u64);

impl PermissionSet {
    pub const NO_PERMISSIONS: PermissionSet = PermissionSet(0);
    pub const ADMIN: PermissionSet = PermissionSet(1 << 1);
    pub const USER_READ: PermissionSet = PermissionSet(1 << 2);
    pub const USER_WRITE: PermissionSet = PermissionSet(1 << 3);
    pub const ADD_POINTS_READ: PermissionSet = PermissionSet(1 << 4);
    pub const ADD_POINTS_WRITE: PermissionSet = PermissionSet(1 << 5);
    pub const SPENT_POINTS_READ: PermissionSet = PermissionSet(1 << 6);
    pub const SPENT_POINTS_WRITE: PermissionSet = PermissionSet(1 << 7);
    pub const PARTICIPANT_READ: PermissionSet = PermissionSet(1 << 8);
    pub const PARTICIPANT_WRITE: PermissionSet = PermissionSet(1 << 9);
    pub const CATEGORY_READ: PermissionSet = PermissionSet(1 << 10);
    pub const CATEGORY_WRITE: PermissionSet = PermissionSet(1 << 11);
    pub const EVENT_READ: PermissionSet = PermissionSet(1 << 12);
    pub const EVENT_WRITE: PermissionSet = PermissionSet(1 << 13);

    /// Every named flag, in bit order
    pub const FLAGS: [(&'static str, PermissionSet); 13] = [
        ("ADMIN", Self::ADMIN),
        ("USER_READ", Self::USER_READ),
        ("USER_WRITE", Self::USER_WRITE),
        ("ADD_POINTS_READ", Self::ADD_POINTS_READ),
        ("ADD_POINTS_WRITE", Self::ADD_POINTS_WRITE),
        ("SPENT_POINTS_READ", Self::SPENT_POINTS_READ),
        ("SPENT_POINTS_WRITE", Self::SPENT_POINTS_WRITE),
        ("PARTICIPANT_READ", Self::PARTICIPANT_READ),
        ("PARTICIPANT_WRITE", Self::PARTICIPANT_WRITE),
        ("CATEGORY_READ", Self::CATEGORY_READ),
        ("CATEGORY_WRITE", Self::CATEGORY_WRITE),
        ("EVENT_READ", Self::EVENT_READ),
        ("EVENT_WRITE", Self::EVENT_WRITE),
    ];

    pub const fn from_bits(bits: u64) -> Self {
        PermissionSet(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// `value | flag`
    pub const fn set(value: PermissionSet, flag: PermissionSet) -> PermissionSet {
        PermissionSet(value.0 | flag.0)
    }

    /// `value & !flag`
    pub const fn unset(value: PermissionSet, flag: PermissionSet) -> PermissionSet {
        PermissionSet(value.0 & !flag.0)
    }

    /// Bit test. The delete guards compare whole values instead; see `Role::is_protected`.
    pub const fn contains(self, flag: PermissionSet) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Look up a flag by its exact name, `NO_PERMISSIONS` included
    pub fn from_name(name: &str) -> Option<PermissionSet> {
        if name == "NO_PERMISSIONS" {
            return Some(Self::NO_PERMISSIONS);
        }
        Self::FLAGS
            .iter()
            .find(|(flag_name, _)| *flag_name == name)
            .map(|(_, flag)| *flag)
    }

    /// Names of the flags present, in bit order
    pub fn names(self) -> Vec<&'static str> {
        Self::FLAGS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for PermissionSet {
    type Output = PermissionSet;

    fn bitor(self, rhs: PermissionSet) -> PermissionSet {
        PermissionSet::set(self, rhs)
    }
}

impl From<i64> for PermissionSet {
    fn from(value: i64) -> Self {
        PermissionSet(value as u64)
    }
}

impl From<PermissionSet> for i64 {
    fn from(value: PermissionSet) -> Self {
        value.0 as i64
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            return f.write_str("NO_PERMISSIONS");
        }
        f.write_str(&names.join("|"))
    }
}
