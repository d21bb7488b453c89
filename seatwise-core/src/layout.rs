use serde::{Deserialize, Serialize};

/// Seats per row on each side of the aisle, e.g. 2+3
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct SeatLayout {
    left: usize,
    right: usize,
}

impl SeatLayout {
    pub fn new(left: usize, right: usize) -> Result<Self, LayoutError> {
        match left.checked_add(right) {
            Some(0) => Err(LayoutError::EmptyRow),
            Some(_) => Ok(Self { left, right }),
            None => Err(LayoutError::Malformed),
        }
    }

    /// Parse a `[left, right]` pair as sent by the availability provider.
    /// Anything else (wrong length, negative, non-integer, zero width) is malformed.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, LayoutError> {
        let pair = value.as_array().ok_or(LayoutError::Malformed)?;
        if pair.len() != 2 {
            return Err(LayoutError::Malformed);
        }

        let side = |v: &serde_json::Value| {
            v.as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(LayoutError::Malformed)
        };

        Self::new(side(&pair[0])?, side(&pair[1])?)
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    /// Non-zero; `new` rejects widths that overflow
    pub fn row_width(&self) -> usize {
        self.left.saturating_add(self.right)
    }
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self { left: 2, right: 2 }
    }
}

impl TryFrom<[usize; 2]> for SeatLayout {
    type Error = LayoutError;

    fn try_from(pair: [usize; 2]) -> Result<Self, Self::Error> {
        Self::new(pair[0], pair[1])
    }
}

impl From<SeatLayout> for [usize; 2] {
    fn from(layout: SeatLayout) -> Self {
        [layout.left, layout.right]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatRow<T> {
    pub left: Vec<T>,
    pub right: Vec<T>,
}

/// Partition a flat, ordered seat sequence into rows.
/// The trailing row is short when the seat count is not a multiple of the row width.
pub fn organize_into_rows<T: Clone>(seats: &[T], layout: SeatLayout) -> Vec<SeatRow<T>> {
    seats
        .chunks(layout.row_width())
        .map(|row| {
            let split = layout.left.min(row.len());
            SeatRow {
                left: row[..split].to_vec(),
                right: row[split..].to_vec(),
            }
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Seat layout must have at least one seat per row")]
    EmptyRow,

    #[error("Seat layout must be a pair of non-negative integers with a representable sum")]
    Malformed,
}
