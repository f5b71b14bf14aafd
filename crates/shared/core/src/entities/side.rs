use serde::{Deserialize, Serialize};

/// One side of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BookSide {
    Bid,
    Ask,
}

/// Which side(s) of the book an adjustment applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideSelector {
    Bid,
    Ask,
    Both,
    #[default]
    None,
}

impl SideSelector {
    /// Whether the given side is selected
    pub fn includes(&self, side: BookSide) -> bool {
        match self {
            SideSelector::Both => true,
            SideSelector::None => false,
            SideSelector::Bid => side == BookSide::Bid,
            SideSelector::Ask => side == BookSide::Ask,
        }
    }

    /// Selected sides in bid-then-ask order
    pub fn sides(&self) -> impl Iterator<Item = BookSide> + '_ {
        [BookSide::Bid, BookSide::Ask]
            .into_iter()
            .filter(move |side| self.includes(*side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_includes() {
        assert!(SideSelector::Both.includes(BookSide::Bid));
        assert!(SideSelector::Both.includes(BookSide::Ask));
        assert!(SideSelector::Bid.includes(BookSide::Bid));
        assert!(!SideSelector::Bid.includes(BookSide::Ask));
        assert!(!SideSelector::None.includes(BookSide::Bid));
    }

    #[test]
    fn test_selector_sides_order() {
        let sides: Vec<_> = SideSelector::Both.sides().collect();
        assert_eq!(sides, vec![BookSide::Bid, BookSide::Ask]);
        assert_eq!(SideSelector::None.sides().count(), 0);
    }
}
