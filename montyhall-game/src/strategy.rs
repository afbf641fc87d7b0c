//! Contestant strategies and the four stateless round steps.
//!
//! Each step is a free function over plain values. Randomness is always
//! supplied by the caller so a seeded source reproduces a round exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arrangement::Arrangement;
use crate::door::{DOOR_COUNT, DoorContent, DoorIndex};
use crate::error::ContractViolation;

/// How the contestant settles on a final door after the host's reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep the initially picked door.
    Stay,
    /// Move to the one door that is neither picked nor opened.
    Switch,
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::Stay, Self::Switch];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Strategy::Stay => "STAY",
            Strategy::Switch => "SWITCH",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Stay => write!(f, "stay"),
            Strategy::Switch => write!(f, "switch"),
        }
    }
}

/// Result of a single strategy branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub const ALL: [Self; 2] = [Self::Win, Self::Lose];

    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Lose => "LOSE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Lose => write!(f, "lose"),
        }
    }
}

/// The contestant's blind first choice, uniform over all doors.
pub fn select_initial_door<R: Rng + ?Sized>(rng: &mut R) -> DoorIndex {
    DoorIndex::from_slot(rng.gen_range(0..DOOR_COUNT))
}

/// The host opens a goat door the contestant did not pick.
///
/// When the contestant picked the car both other doors hide goats and the host
/// chooses between them with a fair coin. Otherwise exactly one unpicked goat
/// door exists and it is returned without consuming randomness.
pub fn open_goat_door<R: Rng + ?Sized>(
    arrangement: Arrangement,
    initial_pick: DoorIndex,
    rng: &mut R,
) -> DoorIndex {
    let [first, second] = initial_pick.others();
    match (arrangement.content(first), arrangement.content(second)) {
        (DoorContent::Goat, DoorContent::Goat) => {
            if rng.gen_bool(0.5) {
                first
            } else {
                second
            }
        }
        (DoorContent::Goat, DoorContent::Car) => first,
        (DoorContent::Car, _) => second,
    }
}

/// Apply `strategy` to the picked and opened doors.
///
/// # Errors
///
/// Returns [`ContractViolation::OpenedPickedDoor`] when `opened_door` equals
/// `initial_pick`; the host never opens the contestant's door.
pub fn resolve_pick(
    strategy: Strategy,
    initial_pick: DoorIndex,
    opened_door: DoorIndex,
) -> Result<DoorIndex, ContractViolation> {
    let switch_target = DoorIndex::remaining(initial_pick, opened_door)
        .ok_or(ContractViolation::OpenedPickedDoor { door: initial_pick })?;
    Ok(match strategy {
        Strategy::Stay => initial_pick,
        Strategy::Switch => switch_target,
    })
}

/// Win exactly when the final door hides the car.
#[must_use]
pub fn determine_outcome(arrangement: Arrangement, final_pick: DoorIndex) -> Outcome {
    match arrangement.content(final_pick) {
        DoorContent::Car => Outcome::Win,
        DoorContent::Goat => Outcome::Lose,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DoorContent::{Car, Goat};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    #[test]
    fn host_never_opens_pick_or_car() {
        let mut rng = SmallRng::seed_from_u64(7);
        for car in DoorIndex::ALL {
            let arrangement = Arrangement::with_car_at(car);
            for pick in DoorIndex::ALL {
                for _ in 0..50 {
                    let opened = open_goat_door(arrangement, pick, &mut rng);
                    assert_ne!(opened, pick, "host opened the picked door");
                    assert_eq!(arrangement.content(opened), Goat, "host revealed the car");
                }
            }
        }
    }

    #[test]
    fn host_reveal_is_forced_when_pick_is_a_goat() {
        let arrangement = Arrangement::from_contents([Goat, Goat, Car]).unwrap();
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(
                open_goat_door(arrangement, DoorIndex::ONE, &mut rng),
                DoorIndex::TWO
            );
            assert_eq!(
                open_goat_door(arrangement, DoorIndex::TWO, &mut rng),
                DoorIndex::ONE
            );
        }
    }

    #[test]
    fn host_chooses_between_both_goats_when_pick_is_the_car() {
        let arrangement = Arrangement::from_contents([Car, Goat, Goat]).unwrap();
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut seen = HashSet::new();
        let mut opened_two = 0u32;
        for _ in 0..2_000 {
            let opened = open_goat_door(arrangement, DoorIndex::ONE, &mut rng);
            seen.insert(opened);
            if opened == DoorIndex::TWO {
                opened_two += 1;
            }
        }
        assert_eq!(seen, HashSet::from([DoorIndex::TWO, DoorIndex::THREE]));
        assert!(
            (850..=1_150).contains(&opened_two),
            "host tie-break is biased: {opened_two} of 2000"
        );
    }

    #[test]
    fn stay_keeps_pick_and_switch_takes_the_last_door() {
        for pick in DoorIndex::ALL {
            for opened in pick.others() {
                assert_eq!(resolve_pick(Strategy::Stay, pick, opened), Ok(pick));
                let switched = resolve_pick(Strategy::Switch, pick, opened).unwrap();
                assert_ne!(switched, pick);
                assert_ne!(switched, opened);
            }
        }
    }

    #[test]
    fn resolve_pick_rejects_opened_pick() {
        for strategy in Strategy::ALL {
            assert_eq!(
                resolve_pick(strategy, DoorIndex::TWO, DoorIndex::TWO),
                Err(ContractViolation::OpenedPickedDoor {
                    door: DoorIndex::TWO
                })
            );
        }
    }

    #[test]
    fn outcome_follows_the_car() {
        let arrangement = Arrangement::with_car_at(DoorIndex::THREE);
        assert_eq!(determine_outcome(arrangement, DoorIndex::THREE), Outcome::Win);
        assert_eq!(determine_outcome(arrangement, DoorIndex::ONE), Outcome::Lose);
        assert_eq!(determine_outcome(arrangement, DoorIndex::TWO), Outcome::Lose);
    }

    #[test]
    fn initial_pick_covers_every_door() {
        let mut rng = SmallRng::seed_from_u64(1);
        let picks: HashSet<DoorIndex> = (0..200).map(|_| select_initial_door(&mut rng)).collect();
        assert_eq!(picks.len(), DOOR_COUNT);
    }

    #[test]
    fn labels_and_display() {
        assert_eq!(Strategy::Switch.label(), "SWITCH");
        assert_eq!(Strategy::Stay.to_string(), "stay");
        assert_eq!(Outcome::Lose.label(), "LOSE");
        assert_eq!(Outcome::Win.to_string(), "win");
        assert!(Outcome::Win.is_win());
    }
}
