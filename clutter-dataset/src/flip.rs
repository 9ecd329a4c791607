//! The four-way axis flip augmentation.

use crate::common::*;

/// Axis flip applied uniformly to an image and its mask stack.
///
/// The numeric code of each variant is the flip code stored in
/// image records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Flip {
    /// Leave the array untouched.
    Identity,
    /// Reverse the row order.
    Vertical,
    /// Reverse the column order.
    Horizontal,
    /// Reverse both rows and columns.
    Both,
}

impl Flip {
    pub const ALL: [Flip; 4] = [Flip::Identity, Flip::Vertical, Flip::Horizontal, Flip::Both];

    pub fn code(&self) -> u8 {
        match self {
            Flip::Identity => 0,
            Flip::Vertical => 1,
            Flip::Horizontal => 2,
            Flip::Both => 3,
        }
    }

    /// Apply the flip on a height × width × channel array.
    pub fn apply<A>(&self, array: ArrayView3<'_, A>) -> Array3<A>
    where
        A: Clone,
    {
        let flipped = match self {
            Flip::Identity => array,
            Flip::Vertical => array.slice_move(s![..;-1, .., ..]),
            Flip::Horizontal => array.slice_move(s![.., ..;-1, ..]),
            Flip::Both => array.slice_move(s![..;-1, ..;-1, ..]),
        };
        flipped.to_owned()
    }
}

impl Default for Flip {
    fn default() -> Self {
        Flip::Identity
    }
}

impl TryFrom<u8> for Flip {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        let flip = match code {
            0 => Flip::Identity,
            1 => Flip::Vertical,
            2 => Flip::Horizontal,
            3 => Flip::Both,
            _ => bail!("invalid flip code {}, expect 0, 1, 2 or 3", code),
        };
        Ok(flip)
    }
}

impl From<Flip> for u8 {
    fn from(flip: Flip) -> Self {
        flip.code()
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Flip a height × width × channel array by the given flip code.
pub fn flip<A>(array: ArrayView3<'_, A>, code: u8) -> Result<Array3<A>>
where
    A: Clone,
{
    Ok(Flip::try_from(code)?.apply(array))
}
