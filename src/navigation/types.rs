//! # Navigation Types
//!
//! Field geometry primitives: headings, node kinds, directed edges with derived
//! intersection metadata, and off-graph locations described as millimetre offsets.

use crate::error::NavigationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinal heading on the field, measured counter-clockwise from east
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::East, Self::North, Self::West, Self::South];

    /// Heading in degrees: 0, 90, 180 or 270
    pub fn degrees(self) -> u16 {
        match self {
            Self::East => 0,
            Self::North => 90,
            Self::West => 180,
            Self::South => 270,
        }
    }

    /// The heading rotated by 180 degrees
    pub fn reverse(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
        }
    }

    pub fn orientation(self) -> EdgeOrientation {
        match self {
            Self::East | Self::West => EdgeOrientation::Horizontal,
            Self::North | Self::South => EdgeOrientation::Vertical,
        }
    }

    pub fn from_degrees(degrees: u16) -> Result<Self, NavigationError> {
        match degrees {
            0 => Ok(Self::East),
            90 => Ok(Self::North),
            180 => Ok(Self::West),
            270 => Ok(Self::South),
            _ => Err(NavigationError::InvalidDirection { degrees }),
        }
    }
}

impl TryFrom<u16> for Direction {
    type Error = NavigationError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::East => write!(f, "east"),
            Self::North => write!(f, "north"),
            Self::West => write!(f, "west"),
            Self::South => write!(f, "south"),
        }
    }
}

/// Axis alignment of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrientation {
    Horizontal,
    Vertical,
}

/// Whether a node is a full intersection or a dead-end terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Intersection, any number of edges
    Primary,
    /// Terminal, at most one edge
    Secondary,
}

/// Directed edge in the navigation graph.
///
/// The intersection flags describe which turns are available on arrival at `to`.
/// They are derived by the graph as connections are added and cannot be set by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: String,
    pub weight: f32,
    pub direction: Direction,
    intersection_east: bool,
    intersection_north: bool,
    intersection_west: bool,
    intersection_south: bool,
}

impl Edge {
    pub(crate) fn new(to: impl Into<String>, weight: f32, direction: Direction) -> Self {
        Self {
            to: to.into(),
            weight,
            direction,
            intersection_east: false,
            intersection_north: false,
            intersection_west: false,
            intersection_south: false,
        }
    }

    pub fn orientation(&self) -> EdgeOrientation {
        self.direction.orientation()
    }

    pub fn intersection_east(&self) -> bool {
        self.intersection_east
    }

    pub fn intersection_north(&self) -> bool {
        self.intersection_north
    }

    pub fn intersection_west(&self) -> bool {
        self.intersection_west
    }

    pub fn intersection_south(&self) -> bool {
        self.intersection_south
    }

    /// Whether a turn towards `direction` is available at the far end
    pub fn has_intersection(&self, direction: Direction) -> bool {
        match direction {
            Direction::East => self.intersection_east,
            Direction::North => self.intersection_north,
            Direction::West => self.intersection_west,
            Direction::South => self.intersection_south,
        }
    }

    /// Turns available at the far end, in east/north/west/south order
    pub fn available_turns(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.has_intersection(*direction))
            .collect()
    }

    /// Record that the far end now also leads towards `direction`.
    ///
    /// Horizontal edges only track north/south turns and vertical edges only east/west.
    pub(crate) fn record_turn(&mut self, direction: Direction) {
        match (self.orientation(), direction) {
            (EdgeOrientation::Horizontal, Direction::North) => self.intersection_north = true,
            (EdgeOrientation::Horizontal, Direction::South) => self.intersection_south = true,
            (EdgeOrientation::Vertical, Direction::East) => self.intersection_east = true,
            (EdgeOrientation::Vertical, Direction::West) => self.intersection_west = true,
            _ => {}
        }
    }
}

/// Planar displacement in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Offset {
    pub fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }

    /// Straight-line length of the displacement
    pub fn length_mm(&self) -> f32 {
        self.x_mm.hypot(self.y_mm)
    }
}

/// Named target off the intersection grid: an origin node plus offsets driven in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub node: String,
    #[serde(default)]
    pub offsets: Vec<Offset>,
}

impl Location {
    pub fn new(node: impl Into<String>, offsets: Vec<Offset>) -> Self {
        Self {
            node: node.into(),
            offsets,
        }
    }

    /// Sum of the offsets: where the robot ends up relative to the origin node
    pub fn displacement(&self) -> Offset {
        self.offsets.iter().fold(Offset::default(), |acc, offset| {
            Offset::new(acc.x_mm + offset.x_mm, acc.y_mm + offset.y_mm)
        })
    }

    /// Distance driven along the offsets after reaching the origin node
    pub fn travel_mm(&self) -> f32 {
        self.offsets.iter().map(Offset::length_mm).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_rotates_by_half_turn() {
        for direction in Direction::ALL {
            let reversed = direction.reverse();
            assert_eq!((direction.degrees() + 180) % 360, reversed.degrees());
            assert_eq!(reversed.reverse(), direction);
            assert_eq!(direction.orientation(), reversed.orientation());
        }
    }

    #[test]
    fn test_invalid_degrees_rejected() {
        assert_eq!(Direction::try_from(90), Ok(Direction::North));
        assert_eq!(
            Direction::try_from(45),
            Err(NavigationError::InvalidDirection { degrees: 45 })
        );
    }

    #[test]
    fn test_record_turn_respects_orientation() {
        let mut horizontal = Edge::new("B", 1.0, Direction::East);
        horizontal.record_turn(Direction::North);
        horizontal.record_turn(Direction::East);
        assert_eq!(horizontal.available_turns(), vec![Direction::North]);

        let mut vertical = Edge::new("C", 1.0, Direction::South);
        vertical.record_turn(Direction::West);
        vertical.record_turn(Direction::South);
        assert_eq!(vertical.available_turns(), vec![Direction::West]);
    }

    #[test]
    fn test_location_displacement() {
        let location = Location::new(
            "A",
            vec![Offset::new(300.0, 0.0), Offset::new(0.0, 400.0)],
        );
        assert_eq!(location.displacement(), Offset::new(300.0, 400.0));
        assert!((location.travel_mm() - 700.0).abs() < f32::EPSILON);
        assert!((location.displacement().length_mm() - 500.0).abs() < 1e-3);
    }
}
