//! Constructor- and method-resolution policies.
//!
//! Registrations record the [`Visibility`] of the member they wrap; lookups
//! narrow what they may see with a [`MethodFilter`]. Construction paths use
//! the fixed [`CTOR_ACCESS`] policy instead of a caller-supplied filter.

/// Visibility of a constructor or method, recorded at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Part of the declaring type's public surface.
    Public,
    /// Private or otherwise non-public.
    NonPublic,
}

/// Visibility axis of a lookup filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Public members only.
    Public,
    /// Non-public members only.
    NonPublic,
    /// Either.
    Any,
}

impl Access {
    /// Whether a member with the given visibility passes this filter.
    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            Access::Public => visibility == Visibility::Public,
            Access::NonPublic => visibility == Visibility::NonPublic,
            Access::Any => true,
        }
    }
}

/// Receiver axis of a lookup filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Instance methods only.
    Instance,
    /// Static methods only.
    Static,
    /// Either.
    Any,
}

impl Receiver {
    /// Whether a method with the given receiver kind passes this filter.
    pub fn admits(self, is_static: bool) -> bool {
        match self {
            Receiver::Instance => !is_static,
            Receiver::Static => is_static,
            Receiver::Any => true,
        }
    }
}

/// Method-lookup filter: which declared methods a lookup may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodFilter {
    /// Visibility axis.
    pub access: Access,
    /// Receiver axis.
    pub receiver: Receiver,
}

impl MethodFilter {
    /// Public instance methods only.
    pub const PUBLIC_INSTANCE: Self = Self {
        access: Access::Public,
        receiver: Receiver::Instance,
    };

    /// Public static methods only.
    pub const PUBLIC_STATIC: Self = Self {
        access: Access::Public,
        receiver: Receiver::Static,
    };

    /// Non-public methods of either receiver kind.
    pub const NON_PUBLIC: Self = Self {
        access: Access::NonPublic,
        receiver: Receiver::Any,
    };

    /// Every declared method.
    pub const ANY: Self = Self {
        access: Access::Any,
        receiver: Receiver::Any,
    };

    /// Whether a method with the given modifiers passes the filter.
    pub fn matches(self, visibility: Visibility, is_static: bool) -> bool {
        self.access.admits(visibility) && self.receiver.admits(is_static)
    }
}

/// Constructor-resolution policy applied by enumeration and generic
/// construction: public and non-public instance constructors alike.
pub const CTOR_ACCESS: Access = Access::Any;
