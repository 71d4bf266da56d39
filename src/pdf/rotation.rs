use crate::error::{Error, Result};

/// A clockwise quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Right, // 90° clockwise
    Down,  // 180°
    Left,  // 270° clockwise, i.e. 90° counter-clockwise
}

impl Rotation {
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees {
            90 => Ok(Rotation::Right),
            180 => Ok(Rotation::Down),
            270 => Ok(Rotation::Left),
            _ => Err(Error::validation("rotation must be 90, 180 or 270 degrees")),
        }
    }

    pub fn degrees(self) -> i64 {
        match self {
            Rotation::Right => 90,
            Rotation::Down => 180,
            Rotation::Left => 270,
        }
    }

    /// Apply this rotation on top of an existing `/Rotate` value.
    ///
    /// `current` comes straight from the file and may be any integer.
    pub fn apply_to(self, current: i64) -> i64 {
        (current.rem_euclid(360) + self.degrees()).rem_euclid(360)
    }
}
