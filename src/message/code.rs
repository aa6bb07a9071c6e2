//! Request methods and response codes.

use std::fmt;

/// Request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Retrieve a representation.
    Get,
    /// Process the enclosed representation.
    Post,
    /// Create or replace the target with the enclosed representation.
    Put,
    /// Delete the target.
    Delete,
}

impl Method {
    /// Report whether requests with this method carry a body.
    #[must_use]
    pub const fn allows_payload(self) -> bool { matches!(self, Self::Post | Self::Put) }

    /// Return the method code as `class.detail`.
    #[must_use]
    pub const fn code(self) -> (u8, u8) {
        match self {
            Self::Get => (0, 1),
            Self::Post => (0, 2),
            Self::Put => (0, 3),
            Self::Delete => (0, 4),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// 2.01
    Created,
    /// 2.02
    Deleted,
    /// 2.03
    Valid,
    /// 2.04
    Changed,
    /// 2.05
    Content,
    /// 2.31
    Continue,
    /// 4.00
    BadRequest,
    /// 4.04
    NotFound,
    /// 4.08
    RequestEntityIncomplete,
    /// 4.13
    RequestEntityTooLarge,
    /// 5.00
    InternalServerError,
}

impl ResponseCode {
    /// Return the code as `(class, detail)`.
    #[must_use]
    pub const fn code(self) -> (u8, u8) {
        match self {
            Self::Created => (2, 1),
            Self::Deleted => (2, 2),
            Self::Valid => (2, 3),
            Self::Changed => (2, 4),
            Self::Content => (2, 5),
            Self::Continue => (2, 31),
            Self::BadRequest => (4, 0),
            Self::NotFound => (4, 4),
            Self::RequestEntityIncomplete => (4, 8),
            Self::RequestEntityTooLarge => (4, 13),
            Self::InternalServerError => (5, 0),
        }
    }

    /// Report whether the code belongs to the success class.
    #[must_use]
    pub const fn is_success(self) -> bool { self.code().0 == 2 }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (class, detail) = self.code();
        write!(f, "{class}.{detail:02}")
    }
}
