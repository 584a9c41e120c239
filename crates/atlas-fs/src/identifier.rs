//! Base-relative path identifiers
//!
//! A cataloged repository is named by its path relative to the workspace base,
//! prefixed with a scheme token. Because the base never appears in the
//! identifier, a catalog stays valid after the workspace directory moves.
//!
//! Two schemes exist. [`IdentifierScheme::Path`] (`path:`) is written by all
//! new records; [`IdentifierScheme::LegacyUrn`] (`urn:relpath:`) appears in
//! older catalogs and is only ever decoded. Decoding tries the schemes in
//! [`IdentifierScheme::DECODE_ORDER`]. The prefixes cannot both match the same
//! string, so an identifier whose remainder starts with another scheme prefix
//! is rejected as ambiguous instead of being stripped twice.

use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Identifier scheme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierScheme {
    /// `path:<relative>`
    Path,
    /// `urn:relpath:<relative>`
    LegacyUrn,
}

impl IdentifierScheme {
    /// Order in which [`decode`] tries the schemes.
    pub const DECODE_ORDER: [IdentifierScheme; 2] =
        [IdentifierScheme::Path, IdentifierScheme::LegacyUrn];

    /// The scheme used for newly written identifiers.
    pub const CURRENT: IdentifierScheme = IdentifierScheme::Path;

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Path => "path:",
            Self::LegacyUrn => "urn:relpath:",
        }
    }

    /// Strip this scheme's prefix, if present.
    pub fn strip<'a>(&self, identifier: &'a str) -> Option<&'a str> {
        identifier.strip_prefix(self.prefix())
    }

    /// Build an identifier from an already relative path.
    pub fn identify(&self, relative: &NormalizedPath) -> String {
        format!("{}{}", self.prefix(), relative.as_str())
    }
}

impl std::fmt::Display for IdentifierScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Encode `repo_path` relative to `base` with the current scheme.
pub fn encode(base: impl AsRef<Path>, repo_path: impl AsRef<Path>) -> Result<String> {
    encode_with(IdentifierScheme::CURRENT, base, repo_path)
}

/// Encode `repo_path` relative to `base` with an explicit scheme.
pub fn encode_with(
    scheme: IdentifierScheme,
    base: impl AsRef<Path>,
    repo_path: impl AsRef<Path>,
) -> Result<String> {
    let relative = relative_path(base, repo_path)?;
    Ok(scheme.identify(&relative))
}

/// Compute the path of `repo_path` relative to `base`.
///
/// `repo_path` must lie strictly below `base`. The comparison is lexical
/// first; when that fails, existing paths are canonicalized and compared
/// again so that symlinked directories (e.g. a temp dir behind `/private`)
/// still match.
///
/// The result always decodes back to itself; a directory name that would
/// not (such as `c:x`) is an [`Error::InvalidIdentifier`].
pub fn relative_path(
    base: impl AsRef<Path>,
    repo_path: impl AsRef<Path>,
) -> Result<NormalizedPath> {
    let base = base.as_ref();
    let repo_path = repo_path.as_ref();

    let relative = match strict_relative(&NormalizedPath::new(base), &NormalizedPath::new(repo_path)) {
        Some(relative) => relative,
        None => {
            let canonical_base = canonical_or_given(base);
            let canonical_repo = canonical_or_given(repo_path);
            strict_relative(&canonical_base, &canonical_repo).ok_or_else(|| Error::InvalidPath {
                path: repo_path.to_path_buf(),
                base: base.to_path_buf(),
            })?
        }
    };
    decode_str(&IdentifierScheme::CURRENT.identify(&relative))?;
    Ok(relative)
}

fn strict_relative(base: &NormalizedPath, path: &NormalizedPath) -> Option<NormalizedPath> {
    path.relative_to(base).filter(|rel| rel.as_str() != ".")
}

fn canonical_or_given(path: &Path) -> NormalizedPath {
    match dunce::canonicalize(path) {
        Ok(canonical) => NormalizedPath::new(canonical),
        Err(_) => NormalizedPath::new(path),
    }
}

/// Determine which scheme produced `identifier`.
pub fn scheme_of(identifier: &str) -> Option<IdentifierScheme> {
    IdentifierScheme::DECODE_ORDER
        .into_iter()
        .find(|scheme| scheme.strip(identifier).is_some())
}

/// Strip the scheme prefix and return the raw remainder.
///
/// The remainder must be a canonical relative path as [`encode`] writes it:
/// not rooted, `/`-separated, without empty, `.` or `..` segments. Anything
/// else could resolve outside the base or alias another record.
pub fn decode_str(identifier: &str) -> Result<&str> {
    let scheme = scheme_of(identifier)
        .ok_or_else(|| Error::invalid_identifier(identifier, "no known scheme prefix"))?;
    let rest = scheme
        .strip(identifier)
        .ok_or_else(|| Error::invalid_identifier(identifier, "no known scheme prefix"))?;

    if rest.is_empty() {
        return Err(Error::invalid_identifier(identifier, "empty relative path"));
    }
    if scheme_of(rest).is_some() {
        return Err(Error::invalid_identifier(
            identifier,
            "remainder carries a second scheme prefix",
        ));
    }
    if NormalizedPath::new(rest).is_absolute() {
        return Err(Error::invalid_identifier(identifier, "remainder is an absolute path"));
    }
    if rest.contains('\\') {
        return Err(Error::invalid_identifier(identifier, "remainder uses '\\' separators"));
    }
    for segment in rest.split('/') {
        match segment {
            ".." => {
                return Err(Error::invalid_identifier(identifier, "remainder leaves the base"));
            }
            "" | "." => {
                return Err(Error::invalid_identifier(identifier, "remainder is not canonical"));
            }
            _ => {}
        }
    }
    Ok(rest)
}

/// Decode an identifier of either scheme into its relative path.
pub fn decode(identifier: &str) -> Result<NormalizedPath> {
    decode_str(identifier).map(NormalizedPath::new)
}
