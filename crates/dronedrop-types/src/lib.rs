//! `dronedrop-types` – shared vocabulary of the delivery fleet.
//!
//! Every other crate in the workspace speaks in terms of these types:
//!
//! - [`Heading`] – the four compass directions and their rotation algebra.
//! - [`Pose`] – an immutable `(x, y, heading)` triple on the delivery grid.
//! - [`Command`] / [`Commands`] – the `A` / `D` / `I` flight vocabulary.
//! - [`Delivery`] – a package together with the grid point it must reach.
//! - [`DroneError`] – the contract violations raised while parsing commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Heading
// ────────────────────────────────────────────────────────────────────────────

/// Facing direction of a drone on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in clockwise order starting at North.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// The heading reached after one 90° clockwise turn.
    pub fn rotate_right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// The heading reached after one 90° counter-clockwise turn.
    pub fn rotate_left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// The heading pointing the other way.
    pub fn opposite(self) -> Self {
        self.rotate_right().rotate_right()
    }

    /// Unit grid displacement `(dx, dy)` of one advance along this heading.
    pub fn step(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// Full English name, as printed in delivery reports.
    pub fn name(self) -> &'static str {
        match self {
            Heading::North => "North",
            Heading::East => "East",
            Heading::South => "South",
            Heading::West => "West",
        }
    }

    /// Signed number of turns the legacy route tool emits to go from `self`
    /// to `target`: positive means that many right turns, negative means
    /// `|n|` left turns.
    ///
    /// The value is the difference of the legacy ordinals
    /// (East = 1, North = 2, West = 3, South = 4).  It always lands on
    /// `target`, but it is not minimal: South → East yields `3` (three right
    /// turns) where a single left turn would do, and West → East / North →
    /// South come out as `±2`.
    pub fn legacy_turn_delta(self, target: Heading) -> i32 {
        self.legacy_ordinal() - target.legacy_ordinal()
    }

    fn legacy_ordinal(self) -> i32 {
        match self {
            Heading::East => 1,
            Heading::North => 2,
            Heading::West => 3,
            Heading::South => 4,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pose
// ────────────────────────────────────────────────────────────────────────────

/// Position and facing direction of a drone on the delivery grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
}

impl Pose {
    /// The distribution centre every drone takes off from: `(0, 0, North)`.
    pub const ORIGIN: Pose = Pose {
        x: 0,
        y: 0,
        heading: Heading::North,
    };

    pub fn new(x: i32, y: i32, heading: Heading) -> Self {
        Self { x, y, heading }
    }

    /// Same position, different heading.
    pub fn facing(self, heading: Heading) -> Self {
        Self { heading, ..self }
    }

    /// `true` when both poses occupy the same grid cell, regardless of heading.
    pub fn same_position(&self, other: &Pose) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Report line for this pose, e.g. `"(-2, 4) North orientation"`.
    pub fn description(&self) -> String {
        format!("({}, {}) {} orientation", self.x, self.y, self.heading)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.heading)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

/// A single flight instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `A` – move one cell along the current heading.
    Advance,
    /// `D` – rotate 90° clockwise in place.
    TurnRight,
    /// `I` – rotate 90° counter-clockwise in place.
    TurnLeft,
}

impl Command {
    /// The character used for this command in input and output files.
    pub fn symbol(self) -> char {
        match self {
            Command::Advance => 'A',
            Command::TurnRight => 'D',
            Command::TurnLeft => 'I',
        }
    }

    /// Parse a single symbol.  Returns `None` for anything outside `A`/`D`/`I`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'A' => Some(Command::Advance),
            'D' => Some(Command::TurnRight),
            'I' => Some(Command::TurnLeft),
            _ => None,
        }
    }
}

/// An ordered sequence of [`Command`]s.
///
/// Parses from and renders back to the compact symbol string used on disk:
///
/// ```
/// use dronedrop_types::{Command, Commands};
///
/// let commands: Commands = "AAD".parse().unwrap();
/// assert_eq!(commands.as_slice(), &[Command::Advance, Command::Advance, Command::TurnRight]);
/// assert_eq!(commands.to_string(), "AAD");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commands(Vec<Command>);

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.0.push(command);
    }

    /// Append `command` `count` times.
    pub fn push_repeated(&mut self, command: Command, count: usize) {
        self.0.extend(std::iter::repeat_n(command, count));
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of [`Command::Advance`] steps, i.e. the grid distance flown.
    pub fn distance(&self) -> usize {
        self.0.iter().filter(|c| **c == Command::Advance).count()
    }
}

impl FromStr for Commands {
    type Err = DroneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, symbol)| {
                Command::from_symbol(symbol).ok_or(DroneError::InvalidCommand { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Commands)
    }
}

impl TryFrom<String> for Commands {
    type Error = DroneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Commands> for String {
    fn from(commands: Commands) -> Self {
        commands.to_string()
    }
}

impl fmt::Display for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        self.0.iter().try_for_each(|c| f.write_char(c.symbol()))
    }
}

impl From<Vec<Command>> for Commands {
    fn from(commands: Vec<Command>) -> Self {
        Self(commands)
    }
}

impl FromIterator<Command> for Commands {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Commands {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Delivery
// ────────────────────────────────────────────────────────────────────────────

/// A package to deliver.
///
/// `commands` is the route exactly as read from the input file, flown from
/// [`Pose::ORIGIN`]; `target` is where that route ends.  The target is fixed
/// at creation: whatever path a drone actually flies, this is where the
/// package has to land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    commands: Commands,
    target: Pose,
}

impl Delivery {
    /// Pair an origin route with its precomputed end pose.
    ///
    /// Callers normally go through `dronedrop_nav::plot_delivery`, which
    /// computes `target` from `commands`.
    pub fn new(commands: Commands, target: Pose) -> Self {
        Self { commands, target }
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    pub fn target(&self) -> Pose {
        self.target
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Contract violations in the flight vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneError {
    #[error("Invalid command symbol {symbol:?} at position {position} (expected one of A, D, I)")]
    InvalidCommand { symbol: char, position: usize },
}
