//! Asset naming templates and the inline-or-emit decision for media.
use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Template used to name emitted media assets.
pub const MEDIA_NAME: &str = "static/media/[name].[hash:8].[ext]";

/// Hex encoded content hash truncated to `len` characters.
pub fn content_hash(contents: &[u8], len: Option<usize>) -> String {
    let mut digest = hex::encode(Sha256::digest(contents));
    if let Some(len) = len {
        digest.truncate(len);
    }
    digest
}

/// Values substituted into a name template.
#[derive(Debug, Default)]
pub struct TemplateContext<'a> {
    /// File stem or chunk name.
    pub name: &'a str,
    /// Extension without the leading dot.
    pub ext: &'a str,
    /// Contents used to compute hash placeholders.
    pub contents: &'a [u8],
}

impl<'a> TemplateContext<'a> {
    /// Context for a file on disk and its contents.
    pub fn for_file(file: &'a Path, contents: &'a [u8]) -> Self {
        Self {
            name: file.file_stem().and_then(|s| s.to_str()).unwrap_or(""),
            ext: file.extension().and_then(|s| s.to_str()).unwrap_or(""),
            contents,
        }
    }
}

/// Output name template such as `[name].[contenthash:6].js`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NameTemplate(String);

impl NameTemplate {
    /// Create a template.
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self(template.into())
    }

    /// The raw template.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Determine if the template embeds a hash of the content.
    pub fn has_content_hash(&self) -> bool {
        self.segments().iter().any(|s| {
            matches!(s, Segment::Placeholder { kind, .. }
                if *kind == "hash" || *kind == "contenthash")
        })
    }

    /// Substitute the placeholders; unknown placeholders are kept verbatim.
    pub fn render(&self, context: &TemplateContext<'_>) -> String {
        let mut out = String::with_capacity(self.0.len());
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { kind, len } => match kind {
                    "name" | "chunkname" => out.push_str(context.name),
                    "ext" => out.push_str(context.ext),
                    _ => out.push_str(&content_hash(context.contents, len)),
                },
            }
        }
        out
    }

    fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(open) = rest.find('[') {
            let close = match rest[open..].find(']') {
                Some(close) => open + close,
                None => break,
            };
            match placeholder(&rest[open + 1..close]) {
                Some(segment) => {
                    if open > 0 {
                        segments.push(Segment::Literal(&rest[..open]));
                    }
                    segments.push(segment);
                    rest = &rest[close + 1..];
                }
                None => {
                    segments.push(Segment::Literal(&rest[..open + 1]));
                    rest = &rest[open + 1..];
                }
            }
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        segments
    }
}

#[derive(Debug)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder { kind: &'a str, len: Option<usize> },
}

fn placeholder(inner: &str) -> Option<Segment<'_>> {
    let (kind, len) = match inner.split_once(':') {
        Some((kind, len)) => (kind, Some(len.parse::<usize>().ok()?)),
        None => (inner, None),
    };
    match kind {
        "name" | "chunkname" | "ext" if len.is_none() => {
            Some(Segment::Placeholder { kind, len })
        }
        "hash" | "contenthash" => Some(Segment::Placeholder { kind, len }),
        _ => None,
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for NameTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for NameTemplate {
    fn from(value: &str) -> Self {
        NameTemplate::new(value)
    }
}

/// How a media asset ends up in the build.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AssetOutput {
    /// Embedded in the referencing module as a data URL.
    Inline { data_url: String },
    /// Emitted as a separate file.
    Emit { path: String },
}

impl AssetOutput {
    /// Determine if the asset is embedded.
    pub fn is_inline(&self) -> bool {
        matches!(self, AssetOutput::Inline { .. })
    }
}

/// Encode contents as a base64 data URL.
pub fn data_url(file: &Path, contents: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(file), STANDARD.encode(contents))
}

/// MIME type guessed from a file extension.
pub fn mime_type(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
