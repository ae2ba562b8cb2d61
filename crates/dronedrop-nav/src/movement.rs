//! Command interpreter.
//!
//! ```
//! use dronedrop_nav::movement::navigate_str;
//! use dronedrop_types::{Heading, Pose};
//!
//! let end = navigate_str("AAADAA", Pose::ORIGIN).unwrap();
//! assert_eq!(end, Pose::new(2, 3, Heading::East));
//! ```

use dronedrop_types::{Command, Commands, Delivery, DroneError, Pose};

/// Apply a single command to `pose`.
pub fn step(pose: Pose, command: Command) -> Pose {
    match command {
        Command::Advance => {
            let (dx, dy) = pose.heading.step();
            Pose::new(pose.x + dx, pose.y + dy, pose.heading)
        }
        Command::TurnRight => pose.facing(pose.heading.rotate_right()),
        Command::TurnLeft => pose.facing(pose.heading.rotate_left()),
    }
}

/// Replay `commands` in order starting from `start` and return the final pose.
///
/// An empty sequence returns `start` unchanged.
pub fn navigate<'a, I>(commands: I, start: Pose) -> Pose
where
    I: IntoIterator<Item = &'a Command>,
{
    commands.into_iter().fold(start, |pose, command| step(pose, *command))
}

/// Parse `commands` and replay them from `start`.
///
/// # Errors
///
/// Returns [`DroneError::InvalidCommand`] for the first symbol outside
/// `A` / `D` / `I`; no partial movement is applied.
pub fn navigate_str(commands: &str, start: Pose) -> Result<Pose, DroneError> {
    let commands: Commands = commands.parse()?;
    Ok(navigate(&commands, start))
}

/// Build a [`Delivery`] whose target is where `commands` lead from
/// [`Pose::ORIGIN`].
pub fn plot_delivery(commands: Commands) -> Delivery {
    let target = navigate(&commands, Pose::ORIGIN);
    Delivery::new(commands, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronedrop_types::Heading;
    use proptest::prelude::*;

    fn arb_heading() -> impl Strategy<Value = Heading> {
        prop::sample::select(Heading::ALL.to_vec())
    }

    fn arb_pose() -> impl Strategy<Value = Pose> {
        (-50i32..50, -50i32..50, arb_heading()).prop_map(|(x, y, h)| Pose::new(x, y, h))
    }

    fn arb_commands() -> impl Strategy<Value = Commands> {
        prop::collection::vec(
            prop::sample::select(vec![Command::Advance, Command::TurnRight, Command::TurnLeft]),
            0..40,
        )
        .prop_map(Commands::from)
    }

    #[test]
    fn reference_route_from_origin() {
        let end = navigate_str("AAADAA", Pose::ORIGIN).unwrap();
        assert_eq!(end, Pose::new(2, 3, Heading::East));
    }

    #[test]
    fn advance_moves_along_each_heading() {
        let cases = [
            (Heading::North, (0, 1)),
            (Heading::East, (1, 0)),
            (Heading::South, (0, -1)),
            (Heading::West, (-1, 0)),
        ];
        for (heading, (x, y)) in cases {
            let end = step(Pose::new(0, 0, heading), Command::Advance);
            assert_eq!(end, Pose::new(x, y, heading));
        }
    }

    #[test]
    fn turns_do_not_move() {
        let start = Pose::new(3, -7, Heading::West);
        assert_eq!(step(start, Command::TurnRight), Pose::new(3, -7, Heading::North));
        assert_eq!(step(start, Command::TurnLeft), Pose::new(3, -7, Heading::South));
    }

    #[test]
    fn invalid_symbol_fails_loudly() {
        let err = navigate_str("AAB", Pose::ORIGIN).unwrap_err();
        assert_eq!(
            err,
            DroneError::InvalidCommand {
                symbol: 'B',
                position: 2
            }
        );
    }

    #[test]
    fn plot_delivery_pins_target() {
        let delivery = plot_delivery("AAAAIAA".parse().unwrap());
        assert_eq!(delivery.target(), Pose::new(-2, 4, Heading::West));
        assert_eq!(delivery.commands().to_string(), "AAAAIAA");
    }

    proptest! {
        #[test]
        fn empty_sequence_is_identity(pose in arb_pose()) {
            prop_assert_eq!(navigate(&Commands::new(), pose), pose);
        }

        #[test]
        fn navigation_is_deterministic(pose in arb_pose(), commands in arb_commands()) {
            prop_assert_eq!(navigate(&commands, pose), navigate(&commands, pose));
        }

        #[test]
        fn navigation_composes(pose in arb_pose(), a in arb_commands(), b in arb_commands()) {
            let joined: Commands = a.iter().chain(b.iter()).copied().collect();
            prop_assert_eq!(navigate(&joined, pose), navigate(&b, navigate(&a, pose)));
        }

        #[test]
        fn distance_bounds_displacement(pose in arb_pose(), commands in arb_commands()) {
            let end = navigate(&commands, pose);
            let moved = (end.x - pose.x).unsigned_abs() + (end.y - pose.y).unsigned_abs();
            prop_assert!(moved as usize <= commands.distance());
        }
    }
}
