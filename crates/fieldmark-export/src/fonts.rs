//! Font resolution for exported form fields
//!
//! Arial maps to the built-in Helvetica standard font. The script fonts
//! (Allura, Dancing Script) are embedded from TrueType files in a
//! configurable fonts directory; when the file is missing or unreadable
//! the field falls back to Helvetica. A fallback never fails the export.

use std::path::PathBuf;

use fieldmark_core::model::FontFamily;
use tracing::warn;

/// Base font used whenever a requested font asset cannot be embedded.
pub const FALLBACK_BASE_FONT: &str = "Helvetica";

/// The outcome of resolving a [`FontFamily`] for embedding.
#[derive(Debug, Clone)]
pub enum ResolvedFont {
    /// One of the PDF standard 14 fonts; nothing to embed.
    BuiltIn(&'static str),
    /// A TrueType font to embed as a FontFile2 stream.
    Embedded { ps_name: &'static str, data: Vec<u8> },
}

/// Resolves field fonts against an optional fonts directory.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    fonts_dir: Option<PathBuf>,
}

impl FontResolver {
    pub fn new(fonts_dir: Option<PathBuf>) -> Self {
        Self { fonts_dir }
    }

    pub fn resolve(&self, family: FontFamily) -> ResolvedFont {
        match family {
            FontFamily::Arial => ResolvedFont::BuiltIn(FALLBACK_BASE_FONT),
            FontFamily::Allura => self.load("Allura-Regular.ttf", "Allura-Regular"),
            FontFamily::DancingScript => {
                self.load("DancingScript-Regular.ttf", "DancingScript-Regular")
            }
        }
    }

    fn load(&self, file_name: &str, ps_name: &'static str) -> ResolvedFont {
        let Some(dir) = &self.fonts_dir else {
            warn!(font = ps_name, "no fonts directory configured, using fallback");
            return ResolvedFont::BuiltIn(FALLBACK_BASE_FONT);
        };
        let path = dir.join(file_name);
        match std::fs::read(&path) {
            Ok(data) => ResolvedFont::Embedded { ps_name, data },
            Err(error) => {
                warn!(path = %path.display(), %error, "font asset unavailable, using fallback");
                ResolvedFont::BuiltIn(FALLBACK_BASE_FONT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arial_is_builtin_helvetica() {
        let resolver = FontResolver::new(None);
        assert!(matches!(
            resolver.resolve(FontFamily::Arial),
            ResolvedFont::BuiltIn("Helvetica")
        ));
    }

    #[test]
    fn test_script_fonts_fall_back_without_a_directory() {
        let resolver = FontResolver::new(None);
        for family in [FontFamily::Allura, FontFamily::DancingScript] {
            assert!(matches!(
                resolver.resolve(family),
                ResolvedFont::BuiltIn(FALLBACK_BASE_FONT)
            ));
        }
    }

    #[test]
    fn test_missing_file_falls_back() {
        let resolver = FontResolver::new(Some(PathBuf::from("/nonexistent/fonts")));
        assert!(matches!(
            resolver.resolve(FontFamily::Allura),
            ResolvedFont::BuiltIn(FALLBACK_BASE_FONT)
        ));
    }

    #[test]
    fn test_present_file_is_embedded() {
        let dir = std::env::temp_dir().join("fieldmark-font-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Allura-Regular.ttf"), b"\x00\x01\x00\x00fake").unwrap();

        let resolver = FontResolver::new(Some(dir.clone()));
        match resolver.resolve(FontFamily::Allura) {
            ResolvedFont::Embedded { ps_name, data } => {
                assert_eq!(ps_name, "Allura-Regular");
                assert!(!data.is_empty());
            }
            other => panic!("expected embedded font, got {:?}", other),
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
