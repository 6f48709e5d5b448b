//! Arena slot identifiers.
//!
//! Maps and agents live in `Vec<Option<_>>` arenas inside the world; an id is
//! the slot number and is never reused after removal, so a stale id simply
//! finds an empty slot.  Receiver ids number the subscriptions of one signal.
//!
//! Ids print as `<tag>#<n>`, e.g. `agent#3`, which is what the engine's log
//! lines and error messages show.

use std::fmt;

macro_rules! arena_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Never handed out; `Default` returns it.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as $inner)
            }

            /// Arena slot.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($tag, "#{}"), self.0)
                } else {
                    f.write_str(concat!($tag, "#-"))
                }
            }
        }
    };
}

arena_id! {
    /// Agent slot.  Assigned in creation order, which is also the per-tick
    /// update order.
    pub struct AgentId(u32) => "agent";
}

arena_id! {
    pub struct MapId(u32) => "map";
}

arena_id! {
    /// One subscription on a [`Signal`](crate::Signal).
    pub struct ReceiverId(u64) => "rx";
}
