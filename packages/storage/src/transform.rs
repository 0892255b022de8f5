use std::fmt;

/// How the image is cut down to the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    /// Scale to cover the box, then crop the overflow.
    Fill,
    /// Scale to fit inside the box without cropping.
    Fit,
}

impl Crop {
    fn code(self) -> &'static str {
        match self {
            Crop::Fill => "fill",
            Crop::Fit => "fit",
        }
    }
}

/// Which region of the image is kept when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    Center,
    Face,
}

impl Gravity {
    fn code(self) -> &'static str {
        match self {
            Gravity::Center => "center",
            Gravity::Face => "face",
        }
    }
}

/// Image transformation applied by the store at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformation {
    pub width: u32,
    pub height: u32,
    pub crop: Crop,
    pub gravity: Gravity,
}

impl Transformation {
    /// The fixed profile-photo transformation: 500x500, fill, face-centred.
    pub const fn profile_photo() -> Self {
        Self {
            width: 500,
            height: 500,
            crop: Crop::Fill,
            gravity: Gravity::Face,
        }
    }
}

/// Renders the transformation in Cloudinary's URL/parameter syntax,
/// components sorted alphabetically (`c_fill,g_face,h_500,w_500`).
impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c_{},g_{},h_{},w_{}",
            self.crop.code(),
            self.gravity.code(),
            self.height,
            self.width
        )
    }
}
