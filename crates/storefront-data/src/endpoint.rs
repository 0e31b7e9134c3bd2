//! Endpoint tagging for the storefront backend.

/// The backend resource families the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointTag {
    /// Shopper cart (authenticated).
    Cart,
    /// Product list and detail.
    Catalog,
    /// User registration.
    Users,
}

/// Prefix of the public storefront API.
pub const PUBLIC_API_PREFIX: &str = "/api/public/v1";

/// Prefix of the account API.
pub const ACCOUNT_API_PREFIX: &str = "/api/v1";

impl EndpointTag {
    /// Path of the resource root, relative to the base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Cart => format!("{}/cart", PUBLIC_API_PREFIX),
            Self::Catalog => format!("{}/products", PUBLIC_API_PREFIX),
            Self::Users => format!("{}/users", ACCOUNT_API_PREFIX),
        }
    }

    /// Get the name of this endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Catalog => "catalog",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for EndpointTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(EndpointTag::Cart.path(), "/api/public/v1/cart");
        assert_eq!(EndpointTag::Catalog.path(), "/api/public/v1/products");
        assert_eq!(EndpointTag::Users.path(), "/api/v1/users");
        assert_eq!(EndpointTag::Users.to_string(), "users");
    }
}
