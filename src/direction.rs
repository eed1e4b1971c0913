//! The four relations a node can have with its neighbours.

use std::fmt;

use serde::Serialize;

/// A navigable relation between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Parent,
    FirstChild,
    NextSibling,
    PreviousSibling,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Parent,
        Direction::FirstChild,
        Direction::NextSibling,
        Direction::PreviousSibling,
    ];

    /// The relation seen from the other end of a link.
    ///
    /// | Direction       | reverse         |
    /// |-----------------|-----------------|
    /// | FirstChild      | Parent          |
    /// | Parent          | FirstChild      |
    /// | NextSibling     | PreviousSibling |
    /// | PreviousSibling | NextSibling     |
    pub fn reverse(self) -> Direction {
        match self {
            Direction::FirstChild => Direction::Parent,
            Direction::Parent => Direction::FirstChild,
            Direction::NextSibling => Direction::PreviousSibling,
            Direction::PreviousSibling => Direction::NextSibling,
        }
    }

    /// The instruction keyword naming this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Parent => "parent",
            Direction::FirstChild => "first_child",
            Direction::NextSibling => "next_sibling",
            Direction::PreviousSibling => "previous_sibling",
        }
    }

    /// Position of this direction's slot in a node's link table.
    pub(crate) fn slot(self) -> usize {
        match self {
            Direction::Parent => 0,
            Direction::FirstChild => 1,
            Direction::NextSibling => 2,
            Direction::PreviousSibling => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.reverse(), direction);
            assert_eq!(direction.reverse().reverse(), direction);
        }
    }

    #[test]
    fn reverse_pairs() {
        assert_eq!(Direction::FirstChild.reverse(), Direction::Parent);
        assert_eq!(Direction::NextSibling.reverse(), Direction::PreviousSibling);
    }

    #[test]
    fn slots_are_distinct() {
        let mut slots: Vec<usize> = Direction::ALL.iter().map(|d| d.slot()).collect();
        slots.sort();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn display_uses_keyword() {
        assert_eq!(Direction::PreviousSibling.to_string(), "previous_sibling");
        assert_eq!(
            serde_json::to_string(&Direction::FirstChild).unwrap(),
            "\"first_child\""
        );
    }
}
