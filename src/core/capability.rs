//! Capability token passed explicitly into every guarded operation.
//!
//! Each flag unlocks one narrowly scoped path through the guards. The default
//! token grants nothing, which is what ordinary callers should pass.

/// Scoped permissions and overrides consulted by the entry and line guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// May set `asset_id` on lines of non-sale entries.
    pub allow_asset: bool,
    /// May clear `asset_id` on asset-linked lines (and nothing else in the same change).
    pub allow_asset_removal: bool,
    /// May delete entries that depreciation lines still point at.
    pub unlink_from_asset: bool,
    /// Company assigned to assets created while posting.
    pub company_override: Option<i64>,
}

impl Capabilities {
    /// Token without any capability.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            allow_asset: false,
            allow_asset_removal: false,
            unlink_from_asset: false,
            company_override: None,
        }
    }

    /// Grants [`Self::allow_asset`].
    #[must_use]
    pub const fn with_allow_asset(mut self) -> Self {
        self.allow_asset = true;
        self
    }

    /// Grants [`Self::allow_asset_removal`].
    #[must_use]
    pub const fn with_asset_removal(mut self) -> Self {
        self.allow_asset_removal = true;
        self
    }

    /// Grants [`Self::unlink_from_asset`].
    #[must_use]
    pub const fn with_unlink_from_asset(mut self) -> Self {
        self.unlink_from_asset = true;
        self
    }

    /// Sets the company for assets created while posting.
    #[must_use]
    pub const fn with_company(mut self, company_id: i64) -> Self {
        self.company_override = Some(company_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grants_nothing() {
        assert_eq!(Capabilities::default(), Capabilities::none());
    }

    #[test]
    fn test_builders_are_independent() {
        let caps = Capabilities::none().with_asset_removal().with_company(3);
        assert!(caps.allow_asset_removal);
        assert!(!caps.allow_asset);
        assert!(!caps.unlink_from_asset);
        assert_eq!(caps.company_override, Some(3));
    }
}
