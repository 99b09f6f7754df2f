use std::ops::{BitOr, BitOrAssign};

/// Replication flags of a `NetObject`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NetFlags(u8);

impl NetFlags {
    pub const NONE: NetFlags = NetFlags(0);
    /// May be replicated to connections
    pub const GHOSTABLE: NetFlags = NetFlags(1 << 0);
    /// In scope on every connection once added
    pub const SCOPE_ALWAYS: NetFlags = NetFlags(1 << 1);
    /// Client-side proxy of a server object
    pub const IS_GHOST: NetFlags = NetFlags(1 << 2);

    pub const fn contains(self, other: NetFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: NetFlags) -> NetFlags {
        NetFlags(self.0 | other.0)
    }

    pub const fn difference(self, other: NetFlags) -> NetFlags {
        NetFlags(self.0 & !other.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for NetFlags {
    type Output = NetFlags;

    fn bitor(self, rhs: NetFlags) -> NetFlags {
        self.union(rhs)
    }
}

impl BitOrAssign for NetFlags {
    fn bitor_assign(&mut self, rhs: NetFlags) {
        *self = self.union(rhs);
    }
}
