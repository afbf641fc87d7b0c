//! Door arrangements and the generator that deals them.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::door::{DOOR_COUNT, DoorContent, DoorIndex};
use crate::error::ContractViolation;

/// Placement of one car and two goats behind the three doors.
///
/// Only the car door is stored, so an arrangement with any other car count
/// cannot be constructed. Serialized as the three door contents in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[DoorContent; 3]", into = "[DoorContent; 3]")]
pub struct Arrangement {
    car: DoorIndex,
}

impl Arrangement {
    /// Arrangement with the car behind `car` and goats everywhere else.
    #[must_use]
    pub const fn with_car_at(car: DoorIndex) -> Self {
        Self { car }
    }

    /// Validate an explicit three-door layout.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::CarCount`] unless exactly one door holds the car.
    pub fn from_contents(contents: [DoorContent; DOOR_COUNT]) -> Result<Self, ContractViolation> {
        let cars = contents
            .iter()
            .filter(|content| **content == DoorContent::Car)
            .count();
        if cars != 1 {
            return Err(ContractViolation::CarCount { cars });
        }
        let slot = contents
            .iter()
            .position(|content| *content == DoorContent::Car)
            .ok_or(ContractViolation::CarCount { cars })?;
        Ok(Self::with_car_at(DoorIndex::from_slot(slot)))
    }

    #[must_use]
    pub const fn car_door(self) -> DoorIndex {
        self.car
    }

    /// The two goat doors, in stage order.
    #[must_use]
    pub const fn goat_doors(self) -> [DoorIndex; 2] {
        self.car.others()
    }

    #[must_use]
    pub fn content(self, door: DoorIndex) -> DoorContent {
        if door == self.car {
            DoorContent::Car
        } else {
            DoorContent::Goat
        }
    }

    #[must_use]
    pub fn contents(self) -> [DoorContent; DOOR_COUNT] {
        DoorIndex::ALL.map(|door| self.content(door))
    }
}

impl TryFrom<[DoorContent; DOOR_COUNT]> for Arrangement {
    type Error = ContractViolation;

    fn try_from(contents: [DoorContent; DOOR_COUNT]) -> Result<Self, Self::Error> {
        Self::from_contents(contents)
    }
}

impl From<Arrangement> for [DoorContent; DOOR_COUNT] {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.contents()
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.contents();
        write!(f, "[{a}, {b}, {c}]")
    }
}

/// Deal a fresh arrangement with the car placed uniformly at random.
///
/// Consumes a single draw from `rng`.
pub fn new_arrangement<R: Rng + ?Sized>(rng: &mut R) -> Arrangement {
    Arrangement::with_car_at(DoorIndex::from_slot(rng.gen_range(0..DOOR_COUNT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use DoorContent::{Car, Goat};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn from_contents_locates_car() {
        let arrangement = Arrangement::from_contents([Goat, Goat, Car]).unwrap();
        assert_eq!(arrangement.car_door(), DoorIndex::THREE);
        assert_eq!(arrangement.contents(), [Goat, Goat, Car]);
        assert_eq!(arrangement.goat_doors(), [DoorIndex::ONE, DoorIndex::TWO]);
    }

    #[test]
    fn from_contents_rejects_wrong_car_counts() {
        assert_eq!(
            Arrangement::from_contents([Goat, Goat, Goat]),
            Err(ContractViolation::CarCount { cars: 0 })
        );
        assert_eq!(
            Arrangement::from_contents([Car, Goat, Car]),
            Err(ContractViolation::CarCount { cars: 2 })
        );
    }

    #[test]
    fn deserialization_enforces_single_car() {
        let parsed: Arrangement = serde_json::from_str(r#"["car","goat","goat"]"#).unwrap();
        assert_eq!(parsed.car_door(), DoorIndex::ONE);
        assert!(serde_json::from_str::<Arrangement>(r#"["car","car","goat"]"#).is_err());
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"["car","goat","goat"]"#
        );
    }

    #[test]
    fn display_lists_doors_in_order() {
        let arrangement = Arrangement::with_car_at(DoorIndex::TWO);
        assert_eq!(arrangement.to_string(), "[goat, car, goat]");
    }

    #[test]
    fn generated_arrangements_always_hold_one_car() {
        let mut rng = ChaCha20Rng::seed_from_u64(0x5EED);
        for _ in 0..10_000 {
            let contents = new_arrangement(&mut rng).contents();
            let cars = contents.iter().filter(|c| **c == Car).count();
            let goats = contents.iter().filter(|c| **c == Goat).count();
            assert_eq!((cars, goats), (1, 2));
        }
    }

    #[test]
    fn car_position_is_roughly_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut hits = [0u32; DOOR_COUNT];
        for _ in 0..30_000 {
            hits[new_arrangement(&mut rng).car_door().slot()] += 1;
        }
        for count in hits {
            assert!(
                (9_400..=10_600).contains(&count),
                "car placement skewed: {hits:?}"
            );
        }
    }
}
