//! Output path conventions.

use std::path::{Path, PathBuf};

/// File name of the mapping audit file when none is given.
pub const DEFAULT_MAPPING_FILE: &str = "id_mapping.json";

/// Generate the converted-output path for an input file.
///
/// # Example
///
/// ```
/// use idmint::corpus::converted_path;
///
/// let path = converted_path("data/dump.json");
/// assert_eq!(path.to_string_lossy(), "data/dump.converted.json");
/// ```
pub fn converted_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(converted_file_name(input))
}

/// Generate the converted-output path for an input file inside `dir`.
pub fn converted_path_in(input: impl AsRef<Path>, dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(converted_file_name(input.as_ref()))
}

/// Default audit file location: next to the first input.
pub fn default_mapping_path(first_input: impl AsRef<Path>) -> PathBuf {
    let parent = first_input.as_ref().parent().unwrap_or(Path::new("."));
    parent.join(DEFAULT_MAPPING_FILE)
}

fn converted_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match input.extension() {
        Some(ext) => format!("{}.converted.{}", stem, ext.to_string_lossy()),
        None => format!("{}.converted", stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_path() {
        assert_eq!(
            converted_path("data/dump.json").to_string_lossy(),
            "data/dump.converted.json"
        );
        assert_eq!(
            converted_path("records.ndjson").to_string_lossy(),
            "records.converted.ndjson"
        );
        assert_eq!(converted_path("data/dump").to_string_lossy(), "data/dump.converted");
    }

    #[test]
    fn test_converted_path_in() {
        assert_eq!(
            converted_path_in("data/dump.json", "out").to_string_lossy(),
            "out/dump.converted.json"
        );
    }

    #[test]
    fn test_default_mapping_path() {
        assert_eq!(
            default_mapping_path("data/dump.json").to_string_lossy(),
            "data/id_mapping.json"
        );
    }
}
