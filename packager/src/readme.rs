//! Reading documents, optionally through a format converter.
//!
//! A conversion that fails is retried exactly once after asking the
//! converter to make itself available, which may install it.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use log::{debug, warn};
use std::fmt;
use std::fs;

/// Output formats the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// reStructuredText.
    Rst,
    /// Markdown.
    Markdown,
    /// HTML.
    Html,
    /// Plain text.
    Plain,
}

impl DocumentFormat {
    /// The converter's name for this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rst => "rst",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts documents between markup formats.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentConverter {
    /// Makes the converter usable, installing it if necessary.
    ///
    /// Calling this when the converter is already available does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::DependencyInstall`] if installation fails.
    fn ensure_available(&self) -> Result<()>;

    /// Converts the document at `path` to `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the converter is missing or rejects the input.
    fn convert(&self, path: &Utf8Path, format: DocumentFormat) -> Result<String>;
}

/// Reads `path` verbatim, or converted to `format` when one is given.
///
/// The first failed conversion triggers
/// [`DocumentConverter::ensure_available`] and a single retry.
///
/// # Errors
///
/// Returns [`PackagerError::Io`] for an unreadable file,
/// [`PackagerError::DependencyInstall`] when the converter cannot be
/// installed, or [`PackagerError::ConversionFailed`] when the retry fails too.
pub fn read_text_or_convert(
    converter: &dyn DocumentConverter,
    path: &Utf8Path,
    format: Option<DocumentFormat>,
) -> Result<String> {
    let Some(format) = format else {
        debug!("reading {path} verbatim");
        return Ok(fs::read_to_string(path)?);
    };

    match converter.convert(path, format) {
        Ok(text) => Ok(text),
        Err(first) => {
            warn!("converting {path} to {format} failed ({first}); installing converter and retrying");
            converter.ensure_available()?;
            converter
                .convert(path, format)
                .map_err(|retry| PackagerError::ConversionFailed {
                    path: path.to_owned(),
                    reason: retry.to_string(),
                })
        }
    }
}

/// Builds the package long description from `README.md`.
///
/// The README is converted to reStructuredText, trimmed, and normalised to
/// `\n` line endings.
///
/// # Errors
///
/// Propagates the errors of [`read_text_or_convert`].
pub fn long_description(converter: &dyn DocumentConverter, readme: &Utf8Path) -> Result<String> {
    let text = read_text_or_convert(converter, readme, Some(DocumentFormat::Rst))?;
    Ok(normalise_description(&text))
}

fn normalise_description(text: &str) -> String {
    text.trim().replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use rstest::rstest;

    fn conversion_error() -> PackagerError {
        PackagerError::Io(std::io::Error::from(std::io::ErrorKind::NotFound))
    }

    #[test]
    fn reads_verbatim_without_a_format() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("CMakeLists.txt");
        fs::write(&path, "project(Open3D)\r\n").expect("write file");
        let path = Utf8Path::from_path(&path).expect("utf8 path");

        let mut converter = MockDocumentConverter::new();
        converter.expect_convert().never();
        converter.expect_ensure_available().never();

        let text = read_text_or_convert(&converter, path, None).expect("read");
        assert_eq!(text, "project(Open3D)\r\n");
    }

    #[test]
    fn successful_conversion_skips_installation() {
        let mut converter = MockDocumentConverter::new();
        converter
            .expect_convert()
            .withf(|path, format| path.as_str() == "README.md" && *format == DocumentFormat::Rst)
            .times(1)
            .returning(|_, _| Ok("Open3D\n======".to_owned()));
        converter.expect_ensure_available().never();

        let text = read_text_or_convert(
            &converter,
            Utf8Path::new("README.md"),
            Some(DocumentFormat::Rst),
        )
        .expect("convert");
        assert_eq!(text, "Open3D\n======");
    }

    #[test]
    fn failed_conversion_installs_then_retries_once() {
        let mut seq = Sequence::new();
        let mut converter = MockDocumentConverter::new();
        converter
            .expect_convert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(conversion_error()));
        converter
            .expect_ensure_available()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        converter
            .expect_convert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("converted".to_owned()));

        let text = read_text_or_convert(
            &converter,
            Utf8Path::new("README.md"),
            Some(DocumentFormat::Rst),
        )
        .expect("retry succeeds");
        assert_eq!(text, "converted");
    }

    #[test]
    fn second_failure_is_a_conversion_failure() {
        let mut converter = MockDocumentConverter::new();
        converter
            .expect_convert()
            .times(2)
            .returning(|_, _| Err(conversion_error()));
        converter
            .expect_ensure_available()
            .times(1)
            .returning(|| Ok(()));

        let err = read_text_or_convert(
            &converter,
            Utf8Path::new("README.md"),
            Some(DocumentFormat::Rst),
        )
        .expect_err("retry fails");

        assert!(matches!(
            err,
            PackagerError::ConversionFailed { ref path, .. } if path.as_str() == "README.md"
        ));
    }

    #[test]
    fn installation_failure_stops_before_retry() {
        let mut converter = MockDocumentConverter::new();
        converter
            .expect_convert()
            .times(1)
            .returning(|_, _| Err(conversion_error()));
        converter.expect_ensure_available().times(1).returning(|| {
            Err(PackagerError::DependencyInstall {
                tool: "pandoc",
                message: "offline".to_owned(),
            })
        });

        let err = read_text_or_convert(
            &converter,
            Utf8Path::new("README.md"),
            Some(DocumentFormat::Rst),
        )
        .expect_err("install fails");
        assert!(matches!(err, PackagerError::DependencyInstall { .. }));
    }

    #[rstest]
    #[case::trims("\n  Open3D\n\n", "Open3D")]
    #[case::crlf("Open3D\r\n======\r\n", "Open3D\n======")]
    #[case::keeps_inner_blank_lines("a\n\nb", "a\n\nb")]
    fn long_description_is_normalised(#[case] raw: &'static str, #[case] expected: &str) {
        let mut converter = MockDocumentConverter::new();
        converter
            .expect_convert()
            .returning(move |_, _| Ok(raw.to_owned()));

        let text = long_description(&converter, Utf8Path::new("README.md")).expect("describe");
        assert_eq!(text, expected);
    }

    #[rstest]
    #[case(DocumentFormat::Rst, "rst")]
    #[case(DocumentFormat::Markdown, "markdown")]
    #[case(DocumentFormat::Html, "html")]
    #[case(DocumentFormat::Plain, "plain")]
    fn formats_use_converter_names(#[case] format: DocumentFormat, #[case] name: &str) {
        assert_eq!(format.to_string(), name);
    }
}
