//! Route synthesis between two poses.
//!
//! [`synthesize_route`] flies the x-axis leg first, then turns once and flies
//! the y-axis leg.  It is deterministic rather than shortest: the turn count
//! for the first leg follows [`Heading::legacy_turn_delta`], so some starts
//! spin three times where one turn would do.  Only the arrival *cell* is
//! guaranteed; the arrival heading is whatever the second leg leaves.
//!
//! ```
//! use dronedrop_nav::{navigate, synthesize_route};
//! use dronedrop_types::{Heading, Pose};
//!
//! let start = Pose::new(-2, 4, Heading::West);
//! let target = Pose::new(-1, -1, Heading::North);
//! let route = synthesize_route(start, target);
//! assert_eq!(route.to_string(), "DDADAAAAA");
//! assert!(navigate(&route, start).same_position(&target));
//! ```

use dronedrop_types::{Command, Commands, Heading, Pose};
use tracing::trace;

/// Build the commands that take a drone at `start` to the grid cell of
/// `target`.  The heading of `target` is ignored.
pub fn synthesize_route(start: Pose, target: Pose) -> Commands {
    let dx = start.x - target.x;
    let dy = start.y - target.y;
    let mut heading = start.heading;
    let mut route = Commands::new();

    // First leg: line up with the x-axis direction of travel.
    let turns = if dx != 0 {
        let wanted = if dx > 0 { Heading::West } else { Heading::East };
        let delta = heading.legacy_turn_delta(wanted);
        heading = wanted;
        delta
    } else if (dy < 0 && heading == Heading::South) || (dy > 0 && heading == Heading::North) {
        heading = heading.opposite();
        2
    } else {
        0
    };
    let turn = if turns > 0 {
        Command::TurnRight
    } else {
        Command::TurnLeft
    };
    route.push_repeated(turn, turns.unsigned_abs() as usize);
    route.push_repeated(Command::Advance, dx.unsigned_abs() as usize);

    // Second leg: face north/south if still pointing along the x-axis.
    let correction = match (heading, dy.signum()) {
        (Heading::West, 1) | (Heading::East, -1) => Some(Command::TurnLeft),
        (Heading::West, -1) | (Heading::East, 1) => Some(Command::TurnRight),
        _ => None,
    };
    if let Some(command) = correction {
        route.push(command);
    }
    route.push_repeated(Command::Advance, dy.unsigned_abs() as usize);

    trace!(%start, %target, route = %route, "synthesized route");
    route
}
