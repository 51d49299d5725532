//! AndroidManifest.xml editing.
//!
//! Only the root element's `android:versionCode` and `android:versionName`
//! attributes are ever changed. An update splices the newly escaped value
//! into the original text, so every other byte of the file (BOM, layout of
//! the root tag, quoting of sibling attributes) is kept as it was.

use camino::{Utf8Path, Utf8PathBuf};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::borrow::Cow;
use std::fs;
use std::ops::Range;
use thiserror::Error;

/// Namespace URI of the `android:` attributes
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

pub const VERSION_CODE_ATTR: &str = "versionCode";
pub const VERSION_NAME_ATTR: &str = "versionName";

/// Errors from loading or updating a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to parse manifest {path}: {reason}")]
    Parse { path: Utf8PathBuf, reason: String },

    #[error("Manifest {path} has no android:{attribute} attribute on its root element")]
    MissingAttribute { path: Utf8PathBuf, attribute: String },

    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An opened AndroidManifest.xml.
///
/// Every setter writes the whole document back to [`path`](Self::path)
/// immediately.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: Utf8PathBuf,
    source: String,
}

/// A root attribute located in the document text
struct RootAttribute {
    /// Unescaped value
    value: String,

    /// Byte range of the raw (still escaped) value inside the quotes
    span: Range<usize>,
}

impl ManifestDocument {
    /// Read and check the manifest at `path`.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path).map_err(|e| ManifestError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        find_root_attribute(&path, &source, VERSION_CODE_ATTR)?;
        tracing::debug!("Opened manifest {}", path);

        Ok(Self { path, source })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Current document text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Current `android:versionCode`, if present
    pub fn version_code(&self) -> Result<Option<String>, ManifestError> {
        Ok(find_root_attribute(&self.path, &self.source, VERSION_CODE_ATTR)?.map(|a| a.value))
    }

    /// Current `android:versionName`, if present
    pub fn version_name(&self) -> Result<Option<String>, ManifestError> {
        Ok(find_root_attribute(&self.path, &self.source, VERSION_NAME_ATTR)?.map(|a| a.value))
    }

    pub fn set_version_number(&mut self, version_number: u64) -> Result<(), ManifestError> {
        self.set_android_attribute(VERSION_CODE_ATTR, &version_number.to_string())
    }

    pub fn set_version_name(&mut self, version_name: &str) -> Result<(), ManifestError> {
        self.set_android_attribute(VERSION_NAME_ATTR, version_name)
    }

    /// Replace an existing `android:` attribute on the root and save.
    fn set_android_attribute(&mut self, attribute: &str, value: &str) -> Result<(), ManifestError> {
        let Some(current) = find_root_attribute(&self.path, &self.source, attribute)? else {
            return Err(ManifestError::MissingAttribute {
                path: self.path.clone(),
                attribute: attribute.to_string(),
            });
        };

        // Both quote characters are escaped, so the value fits either quoting style
        let escaped = escape(value);
        let mut rewritten = String::with_capacity(self.source.len() + escaped.len());
        rewritten.push_str(&self.source[..current.span.start]);
        rewritten.push_str(&escaped);
        rewritten.push_str(&self.source[current.span.end..]);

        // Never put a document on disk that would not open again
        find_root_attribute(&self.path, &rewritten, attribute)?;

        fs::write(&self.path, &rewritten).map_err(|source| ManifestError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            "Set android:{} {:?} -> {:?} in {}",
            attribute,
            current.value,
            value,
            self.path
        );
        self.source = rewritten;
        Ok(())
    }
}

/// Walk the whole document, checking it is well formed, and locate
/// `android:<attribute>` on the root element.
fn find_root_attribute(
    path: &Utf8Path,
    source: &str,
    attribute: &str,
) -> Result<Option<RootAttribute>, ManifestError> {
    let parse_error = |reason: String| ManifestError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = NsReader::from_str(source);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut found = None;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(e) => return Err(parse_error(e.to_string())),
        };

        match event {
            Event::Start(start) if !root_seen => {
                root_seen = true;
                depth += 1;
                found = locate_attribute(&reader, source, &start, attribute, &parse_error)?;
            }
            Event::Empty(start) if !root_seen => {
                root_seen = true;
                found = locate_attribute(&reader, source, &start, attribute, &parse_error)?;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| parse_error("unexpected closing tag".to_string()))?;
            }
            _ => {}
        }
    }

    if !root_seen {
        return Err(parse_error("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(parse_error(format!("{} element(s) left unclosed", depth)));
    }

    Ok(found)
}

/// Find the android attribute on the root start tag and where its raw value sits in `source`.
fn locate_attribute<F>(
    reader: &NsReader<&[u8]>,
    source: &str,
    start: &BytesStart<'_>,
    attribute: &str,
    parse_error: &F,
) -> Result<Option<RootAttribute>, ManifestError>
where
    F: Fn(String) -> ManifestError,
{
    for attr in start.attributes() {
        let attr = attr.map_err(|e| parse_error(e.to_string()))?;
        let (namespace, local_name) = reader.resolve_attribute(attr.key);
        let is_target = local_name.as_ref() == attribute.as_bytes()
            && matches!(namespace, ResolveResult::Bound(Namespace(uri)) if uri == ANDROID_NS.as_bytes());
        if !is_target {
            continue;
        }

        let value = attr
            .unescape_value()
            .map_err(|e| parse_error(e.to_string()))?
            .into_owned();
        let span = match &attr.value {
            Cow::Borrowed(raw) => span_within(source, raw),
            Cow::Owned(_) => None,
        }
        .ok_or_else(|| parse_error(format!("cannot locate android:{} value", attribute)))?;

        return Ok(Some(RootAttribute { value, span }));
    }

    Ok(None)
}

/// Byte range of `part` when it is a slice borrowed from `whole`.
fn span_within(whole: &str, part: &[u8]) -> Option<Range<usize>> {
    let start = (part.as_ptr() as usize).checked_sub(whole.as_ptr() as usize)?;
    let end = start.checked_add(part.len())?;
    let bytes = whole.as_bytes();
    (end <= bytes.len()
        && whole.is_char_boundary(start)
        && whole.is_char_boundary(end)
        && &bytes[start..end] == part)
        .then_some(start..end)
}
