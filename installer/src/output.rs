//! Progress and summary output for the installer CLI.

use crate::package_spec::PackageSpec;
use std::fmt::Display;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress; ignore write failures.
    }
}

/// Progress reporter that tags every line with the package being installed.
///
/// # Examples
///
/// ```
/// use ghr_installer::output::Progress;
/// use ghr_installer::package_spec::PackageSpec;
///
/// let spec = PackageSpec::parse("acme/tool@1.0.0").expect("valid spec");
/// let mut buffer = Vec::new();
/// Progress::new(&mut buffer, &spec, false).line("installing");
/// assert_eq!(String::from_utf8(buffer).expect("utf-8"), "[acme/tool@1.0.0] installing\n");
/// ```
pub struct Progress<'w> {
    out: &'w mut dyn Write,
    prefix: String,
    quiet: bool,
}

impl<'w> Progress<'w> {
    /// Create a reporter for `spec`; a quiet reporter writes nothing.
    #[must_use]
    pub fn new(out: &'w mut dyn Write, spec: &PackageSpec, quiet: bool) -> Self {
        Self {
            out,
            prefix: format!("[{spec}]"),
            quiet,
        }
    }

    /// Emit one progress line.
    pub fn line(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(self.out, format!("{} {message}", self.prefix));
        }
    }
}

/// The summary word printed after an install.
#[must_use]
pub const fn summary_word(changed: bool) -> &'static str {
    if changed { "changed" } else { "unchanged" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn spec() -> PackageSpec {
        PackageSpec::parse("owner/project@2.0.0").expect("valid spec")
    }

    #[rstest]
    fn lines_are_prefixed_with_spec(spec: PackageSpec) {
        let mut buffer = Vec::new();
        let mut progress = Progress::new(&mut buffer, &spec, false);
        progress.line("downloading package (https://example.test/a.tar.gz)");
        progress.line("installing");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(
            text,
            "[owner/project@2.0.0] downloading package (https://example.test/a.tar.gz)\n\
             [owner/project@2.0.0] installing\n"
        );
    }

    #[rstest]
    fn quiet_reporter_writes_nothing(spec: PackageSpec) {
        let mut buffer = Vec::new();
        Progress::new(&mut buffer, &spec, true).line("installing");
        assert!(buffer.is_empty());
    }

    #[rstest]
    #[case::changed(true, "changed")]
    #[case::unchanged(false, "unchanged")]
    fn summary_word_reflects_change(#[case] changed: bool, #[case] expected: &str) {
        assert_eq!(summary_word(changed), expected);
    }

    #[test]
    fn write_failures_are_ignored() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        write_stderr_line(&mut Broken, "ignored");
    }
}
