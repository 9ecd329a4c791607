use crate::{common::*, flip::Flip, mask::MaskStack};

/// The registered image without pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    /// The numeric identifier of the image on disk.
    pub id: usize,
    pub source: String,
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub flip: Flip,
}

/// The registered class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassInfo {
    pub source: String,
    pub id: usize,
    pub name: String,
}

/// The record with image pixels and instance masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// Height × width × 3 image.
    pub image: Array3<u8>,
    pub masks: MaskStack,
}

/// The image channel type selecting the image directory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Modality {
    Depth,
    Gray,
}

impl Default for Modality {
    fn default() -> Self {
        Modality::Depth
    }
}

/// The dataset split.
///
/// Names other than `train` and `test` are kept as [Split::Other] and
/// registered without augmentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Split {
    Train,
    Test,
    Other(String),
}

impl Split {
    /// The flips registered per image.
    ///
    /// Training images are augmented with all four flips.
    pub fn flips(&self) -> &'static [Flip] {
        match self {
            Split::Train => &Flip::ALL,
            Split::Test | Split::Other(_) => &[Flip::Identity],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::Other(name) => name.as_str(),
        }
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ensure!(
            !name.is_empty() && !name.contains(std::path::is_separator),
            "invalid split name '{}'",
            name
        );
        let split = match name {
            "train" => Split::Train,
            "test" => Split::Test,
            _ => Split::Other(name.to_string()),
        };
        Ok(split)
    }
}

impl TryFrom<String> for Split {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Split> for String {
    fn from(split: Split) -> Self {
        split.name().to_string()
    }
}

impl AsRef<str> for Split {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
