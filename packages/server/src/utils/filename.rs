/// Result of validating an uploaded filename.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains null bytes.
    NullByte,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename is longer than 255 characters.
    TooLong,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::TooLong => "Invalid filename: at most 255 characters are allowed",
        }
    }
}

/// Reduce a client-supplied upload name to its final path component.
///
/// Some browsers send full client paths (`C:\Users\ann\proposal.pdf`).
pub fn clean_upload_name(filename: &str) -> Result<String, FilenameError> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(FilenameError::Empty);
    }
    if base.contains('\0') {
        return Err(FilenameError::NullByte);
    }
    if base.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }
    if base.chars().count() > 255 {
        return Err(FilenameError::TooLong);
    }
    Ok(base.to_string())
}

/// Filename for a downloadable report, safe inside a quoted `Content-Disposition`.
pub fn report_filename(hackathon_name: &str) -> String {
    let name: String = hackathon_name
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    let name = name.trim();
    if name.is_empty() {
        "Hackathon_Report.pdf".to_string()
    } else {
        format!("Hackathon_Report_{name}.pdf")
    }
}
