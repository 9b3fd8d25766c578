/// Category phase definitions for tracking collection progress
///
/// This module defines the states a category moves through while its
/// products are being collected.
use std::fmt;

/// Represents the current state of one category in the collection loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryPhase {
    // ===== Active States =====
    /// Category selected but not yet started
    Pending,

    /// Category detail document is being fetched
    ResolvingMetadata,

    /// Catalog page with this 1-based number is being fetched
    FetchingPage(u32),

    // ===== Terminal Success States =====
    /// The catalog ran out of entries (normal end of results)
    Exhausted,

    /// A page or product cap stopped the category
    LimitReached,

    // ===== Terminal Error States =====
    /// A catalog page fetch failed
    Failed,

    /// The internal URL was unusable; no request was made
    Skipped,
}

impl CategoryPhase {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if the category may still issue requests
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::ResolvingMetadata | Self::FetchingPage(_)
        )
    }

    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::ResolvingMetadata | Self::Skipped) => true,
            (Self::ResolvingMetadata, Self::FetchingPage(1) | Self::LimitReached) => true,
            (Self::FetchingPage(current), Self::FetchingPage(following)) => {
                *following == current + 1
            }
            (
                Self::FetchingPage(_),
                Self::Exhausted | Self::LimitReached | Self::Failed,
            ) => true,
            _ => false,
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ResolvingMetadata => "resolving_metadata",
            Self::FetchingPage(_) => "fetching_page",
            Self::Exhausted => "exhausted",
            Self::LimitReached => "limit_reached",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CategoryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingPage(page) => write!(f, "{}({})", self.label(), page),
            _ => write!(f, "{}", self.label()),
        }
    }
}
