use mime_guess::mime;

/// Why an uploaded photo's client-supplied name was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum PhotoNameError {
    Missing,
    /// A `/` or `\` anywhere in the name.
    HasDirectory,
    /// Leading dot, which also covers `.` and `..`.
    DotFile,
    /// NUL, CR, LF or any other ASCII control character.
    ControlCharacter,
    /// The extension does not map to an `image/*` type.
    NotAnImage,
}

impl PhotoNameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing => "Photo upload needs a file name",
            Self::HasDirectory => "Photo file name must not contain a directory",
            Self::DotFile => "Photo file name must not start with '.'",
            Self::ControlCharacter => "Photo file name contains control characters",
            Self::NotAnImage => "Only image files can be uploaded",
        }
    }
}

/// Check the name a client gave its photo and return it trimmed.
///
/// The name is only forwarded to the photo store as a hint, but it must be
/// a bare file name with an image extension.
pub fn validate_photo_filename(filename: &str) -> Result<&str, PhotoNameError> {
    let name = filename.trim();

    if name.is_empty() {
        return Err(PhotoNameError::Missing);
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(PhotoNameError::ControlCharacter);
    }
    if name.contains(['/', '\\']) {
        return Err(PhotoNameError::HasDirectory);
    }
    if name.starts_with('.') {
        return Err(PhotoNameError::DotFile);
    }

    let is_image = mime_guess::from_path(name)
        .iter()
        .any(|m| m.type_() == mime::IMAGE);
    if !is_image {
        return Err(PhotoNameError::NotAnImage);
    }

    Ok(name)
}
