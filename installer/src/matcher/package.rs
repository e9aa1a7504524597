//! Package archive naming grammar.
//!
//! An asset is the package for this host when its name reads, in order:
//! project, delimiter, version (optionally `v`-prefixed), delimiter, OS,
//! delimiter, architecture (or an alias), `.`, and an allow-listed archive
//! extension with nothing after it.

use super::MatchRules;
use super::cursor::Cursor;
use crate::package_spec::PackageSpec;
use crate::platform::HostPlatform;

/// Match `name` against the package grammar and return its base name.
///
/// The base name is the matched text before the archive extension, for
/// example `tool_1.0.0_linux_amd64` for `tool_1.0.0_linux_amd64.tar.gz`.
#[must_use]
pub fn match_package_name<'n>(
    spec: &PackageSpec,
    platform: &HostPlatform,
    rules: &MatchRules,
    name: &'n str,
) -> Option<&'n str> {
    let version = spec.version().to_string();
    let version_tokens = [version.clone(), format!("v{version}")];
    let os_tokens = [platform.os()];
    let arch_tokens = platform.arch_identifiers();

    let cursor = Cursor::new(name)
        .expect(spec.project())?
        .expect_any(rules.delimiters)?
        .expect_any(version_tokens.as_slice())?
        .expect_any(rules.delimiters)?
        .expect_any(os_tokens.as_slice())?
        .expect_any(rules.delimiters)?
        .expect_any(arch_tokens.as_slice())?
        .expect(".")?;

    let extension = cursor.remaining();
    let allowed = rules
        .archive_extensions
        .iter()
        .any(|allowed| allowed.strip_prefix('.') == Some(extension));
    if !allowed {
        return None;
    }

    cursor.matched().strip_suffix('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn spec() -> PackageSpec {
        PackageSpec::parse("acme/myproj@2.0.1").expect("valid spec")
    }

    fn linux_amd64() -> HostPlatform {
        HostPlatform::new("linux", "amd64")
    }

    fn matches(spec: &PackageSpec, platform: &HostPlatform, name: &str) -> Option<String> {
        match_package_name(spec, platform, &MatchRules::default(), name).map(str::to_owned)
    }

    #[rstest]
    #[case::underscores("myproj_2.0.1_linux_amd64.tar.gz", "myproj_2.0.1_linux_amd64")]
    #[case::dashes("myproj-2.0.1-linux-amd64.tar.xz", "myproj-2.0.1-linux-amd64")]
    #[case::dots("myproj.2.0.1.linux.amd64.zip", "myproj.2.0.1.linux.amd64")]
    #[case::mixed("myproj-v2.0.1_linux-amd64.tar.bz2", "myproj-v2.0.1_linux-amd64")]
    #[case::v_prefix("myproj_v2.0.1_linux_amd64.tar", "myproj_v2.0.1_linux_amd64")]
    #[case::x86_64_alias("myproj_2.0.1_linux_x86_64.7z", "myproj_2.0.1_linux_x86_64")]
    #[case::x64_alias("myproj_2.0.1_linux_x64.rar", "myproj_2.0.1_linux_x64")]
    #[case::bit_alias("myproj_2.0.1_linux_64bit.tar.zst", "myproj_2.0.1_linux_64bit")]
    #[case::tgz("myproj_2.0.1_linux_amd64.tgz", "myproj_2.0.1_linux_amd64")]
    fn accepts_grammar_conforming_names(
        spec: PackageSpec,
        #[case] name: &str,
        #[case] base_name: &str,
    ) {
        assert_eq!(matches(&spec, &linux_amd64(), name).as_deref(), Some(base_name));
    }

    #[rstest]
    #[case::wrong_project("other_2.0.1_linux_amd64.tar.gz")]
    #[case::wrong_delimiter("myproj+2.0.1_linux_amd64.tar.gz")]
    #[case::wrong_version("myproj_2.0.2_linux_amd64.tar.gz")]
    #[case::wrong_os("myproj_2.0.1_darwin_amd64.tar.gz")]
    #[case::wrong_arch("myproj_2.0.1_linux_arm64.tar.gz")]
    #[case::unlisted_extension("myproj_2.0.1_linux_amd64.deb")]
    #[case::trailing_text("myproj_2.0.1_linux_amd64.tar.gz.sig")]
    #[case::checksum_sidecar("myproj_2.0.1_linux_amd64.tar.gz.sha256")]
    #[case::missing_extension("myproj_2.0.1_linux_amd64")]
    #[case::capitalised_os("myproj_2.0.1_Linux_amd64.tar.gz")]
    fn rejects_single_deviations(spec: PackageSpec, #[case] name: &str) {
        assert_eq!(matches(&spec, &linux_amd64(), name), None, "{name}");
    }

    #[rstest]
    fn aliases_only_apply_to_amd64(spec: PackageSpec) {
        let arm = HostPlatform::new("linux", "arm64");
        assert_eq!(matches(&spec, &arm, "myproj_2.0.1_linux_x86_64.tar.gz"), None);
        assert_eq!(
            matches(&spec, &arm, "myproj_2.0.1_linux_arm64.tar.gz").as_deref(),
            Some("myproj_2.0.1_linux_arm64")
        );
    }

    #[rstest]
    fn amd64_variant_suffix_is_rejected(spec: PackageSpec) {
        // "amd64" is consumed first, so the following "_v3" breaks the "." expectation.
        assert_eq!(
            matches(&spec, &linux_amd64(), "myproj_2.0.1_linux_amd64_v3.tar.gz"),
            None
        );
    }

    #[rstest]
    fn prerelease_versions_match_literally() {
        let spec = PackageSpec::parse("acme/myproj@1.0.0-rc.1").expect("valid spec");
        assert_eq!(
            matches(&spec, &linux_amd64(), "myproj_1.0.0-rc.1_linux_amd64.zip").as_deref(),
            Some("myproj_1.0.0-rc.1_linux_amd64")
        );
    }
}
