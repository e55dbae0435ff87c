use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Backend-agnostic font configuration.
///
/// Describes where fonts come from and which concrete families stand in for
/// the generic names a plotting host sends (`""`, `"sans"`, `"serif"`,
/// `"mono"`) and for the symbol face. Each [`FontBackend`](crate::text::FontBackend)
/// consumes the [`ResolvedFontConfig`] produced by [`FontConfig::resolve`].
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Custom font data to register (font file bytes + optional family override).
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families for each generic name, in priority order.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// A custom font to register: raw font file data and an optional family name override.
#[derive(Clone, Debug)]
pub struct CustomFont {
    /// Raw font file data (TTF/OTF). Arc-wrapped for cheap cloning.
    pub data: Arc<Vec<u8>>,
    /// Optional family name override. If None, the family name is read from
    /// the font's name table.
    pub family_name: Option<String>,
}

/// Mappings from generic family names to concrete font family names, in priority order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericFamilyMap {
    /// Concrete fonts for "serif".
    pub serif: Vec<String>,
    /// Concrete fonts for "sans" and the empty family.
    pub sans_serif: Vec<String>,
    /// Concrete fonts for "mono".
    pub monospace: Vec<String>,
    /// Concrete fonts for the symbol face (face code 5).
    pub symbol: Vec<String>,
}

impl GenericFamilyMap {
    /// Default preference lists.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            symbol: default_symbol_families(),
        }
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn default_symbol_families() -> Vec<String> {
    vec!["Symbol".into()]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_symbol_families() -> Vec<String> {
    vec!["Standard Symbols PS".into(), "Symbol".into()]
}

impl FontConfig {
    /// Resolve this configuration into a concrete font database.
    ///
    /// This performs the expensive work (system font scanning, directory loading,
    /// custom font registration) once. The resulting [`ResolvedFontConfig`] can be
    /// cloned to create several devices without repeating the filesystem scan.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A [`FontConfig`] that has been resolved into a concrete font database.
///
/// Cloning a `ResolvedFontConfig` clones the underlying database in memory
/// (no filesystem scan).
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    pub(crate) families: GenericFamilyMap,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        Self {
            fontdb: font_config_to_fontdb(config),
            families: config.generic_families.clone(),
        }
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Family preference lists this configuration was resolved with.
    pub fn families(&self) -> &GenericFamilyMap {
        &self.families
    }
}

/// Convert a [`FontConfig`] into a [`fontdb::Database`].
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    if config.load_system_fonts {
        db.load_system_fonts();
    }

    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    for font in &config.custom_fonts {
        let ids = db.load_font_source(fontdb::Source::Binary(font.data.clone()));
        if let Some(name) = &font.family_name {
            for id in ids {
                rename_face(&mut db, id, name);
            }
        }
    }

    apply_generic_families(&mut db, &config.generic_families);
    log::debug!(target: "ink", "font database holds {} faces", db.len());

    db
}

fn rename_face(db: &mut fontdb::Database, id: fontdb::ID, family: &str) {
    let Some(info) = db.face(id) else {
        return;
    };
    let mut info = info.clone();
    info.families = vec![(family.to_string(), fontdb::Language::English_UnitedStates)];
    info.id = fontdb::ID::dummy();
    db.remove_face(id);
    db.push_face_info(info);
}

/// Choose the first available family from each priority list.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(fam, _lang)| fam.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    if let Some(family) = first_available(&families.sans_serif, &available) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = first_available(&families.monospace, &available) {
        db.set_monospace_family(family);
    }
    if let Some(family) = first_available(&families.serif, &available) {
        db.set_serif_family(family);
    }
}

fn first_available<'a>(candidates: &'a [String], available: &HashSet<String>) -> Option<&'a str> {
    candidates
        .iter()
        .find(|family| available.contains(family.as_str()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
        assert_eq!(config.generic_families.sans_serif[0], "Arial");
    }

    #[test]
    fn test_symbol_family_defaults() {
        let symbol = GenericFamilyMap::defaults().symbol;
        assert_eq!(symbol.last().map(String::as_str), Some("Symbol"));
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            assert_eq!(symbol.len(), 1);
        } else {
            assert_eq!(symbol[0], "Standard Symbols PS");
        }
    }

    #[test]
    fn test_font_config_to_fontdb_no_system_fonts() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!(resolved.face_count(), 0);
        assert_eq!(resolved.families(), &GenericFamilyMap::defaults());
    }

    #[test]
    fn test_first_available_respects_priority() {
        let available: HashSet<String> = ["Liberation Sans", "Helvetica"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let candidates = GenericFamilyMap::defaults().sans_serif;
        assert_eq!(first_available(&candidates, &available), Some("Helvetica"));
        assert_eq!(first_available(&[], &available), None);
    }

    #[test]
    fn test_font_config_clone_is_cheap() {
        let data = Arc::new(vec![0u8; 1000]);
        let font = CustomFont {
            data: data.clone(),
            family_name: None,
        };
        let config = FontConfig {
            custom_fonts: vec![font],
            ..FontConfig::default()
        };
        let cloned = config.clone();
        assert!(Arc::ptr_eq(
            &config.custom_fonts[0].data,
            &cloned.custom_fonts[0].data
        ));
    }
}
