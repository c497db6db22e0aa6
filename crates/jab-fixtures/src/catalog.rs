//! Catalog of Swing demo applications used as test subjects.
//!
//! Each [`OracleApp`] maps to a static [`AppSource`]. Resolving the catalog
//! against a destination directory yields one [`CatalogEntry`] per app with the
//! download URL, the local file path and the expected window title.

use crate::result::{HarnessError, HarnessResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root of the Oracle Java SE documentation site
pub const BASE_ORACLE_URL: &str = "https://docs.oracle.com/javase";

/// Root of the Swing tutorial web-start samples
pub const UI_SWING_BASE_URL: &str = "https://docs.oracle.com/javase/tutorialJWS/samples/uiswing";

const JNLP_EXTENSION: &str = "jnlp";
const ZIP_EXTENSION: &str = "zip";

/// Static description of where a demo application lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSource {
    /// Base URL the path is appended to
    pub base: &'static str,
    /// Path below the base URL
    pub path: &'static str,
    /// Window title override; derived from the URL when absent
    pub title: Option<&'static str>,
}

impl AppSource {
    const fn swing(path: &'static str) -> Self {
        Self {
            base: UI_SWING_BASE_URL,
            path,
            title: None,
        }
    }

    const fn oracle(path: &'static str) -> Self {
        Self {
            base: BASE_ORACLE_URL,
            path,
            title: None,
        }
    }

    /// Full download URL
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/{}", self.base, self.path)
    }
}

/// Demo applications available to tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum OracleApp {
    Button,
    CheckBox,
    ColorChooser,
    ComboBox,
    Dialog,
    FileChooser,
    Frame,
    InternalFrame,
    Label,
    LayeredPane,
    List,
    Menu,
    Password,
    Popup,
    ProgressBar,
    RadioButton,
    RootLayeredPane,
    Scroll,
    Slider,
    SliderTwo,
    Spinner,
    SplitPane,
    StatusBar,
    Table,
    TextArea,
    Toolbar,
    Tree,
    TableFtfEdit,
}

impl OracleApp {
    /// Every app, in catalog order
    pub const ALL: [Self; 28] = [
        Self::Button,
        Self::CheckBox,
        Self::ColorChooser,
        Self::ComboBox,
        Self::Dialog,
        Self::FileChooser,
        Self::Frame,
        Self::InternalFrame,
        Self::Label,
        Self::LayeredPane,
        Self::List,
        Self::Menu,
        Self::Password,
        Self::Popup,
        Self::ProgressBar,
        Self::RadioButton,
        Self::RootLayeredPane,
        Self::Scroll,
        Self::Slider,
        Self::SliderTwo,
        Self::Spinner,
        Self::SplitPane,
        Self::StatusBar,
        Self::Table,
        Self::TextArea,
        Self::Toolbar,
        Self::Tree,
        Self::TableFtfEdit,
    ];

    /// Entry name, also used as the local file stem
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Button => "BUTTON",
            Self::CheckBox => "CHECK_BOX",
            Self::ColorChooser => "COLOR_CHOOSER",
            Self::ComboBox => "COMBO_BOX",
            Self::Dialog => "DIALOG",
            Self::FileChooser => "FILE_CHOOSER",
            Self::Frame => "FRAME",
            Self::InternalFrame => "INTERNAL_FRAME",
            Self::Label => "LABEL",
            Self::LayeredPane => "LAYERED_PANE",
            Self::List => "LIST",
            Self::Menu => "MENU",
            Self::Password => "PASSWORD",
            Self::Popup => "POPUP",
            Self::ProgressBar => "PROGRESS_BAR",
            Self::RadioButton => "RADIO_BUTTON",
            Self::RootLayeredPane => "ROOT_LAYERED_PANE",
            Self::Scroll => "SCROLL",
            Self::Slider => "SLIDER",
            Self::SliderTwo => "SLIDER_TWO",
            Self::Spinner => "SPINNER",
            Self::SplitPane => "SPLIT_PANE",
            Self::StatusBar => "STATUS_BAR",
            Self::Table => "TABLE",
            Self::TextArea => "TEXT_AREA",
            Self::Toolbar => "TOOLBAR",
            Self::Tree => "TREE",
            Self::TableFtfEdit => "TABLE_FTF_EDIT",
        }
    }

    /// Where this app is downloaded from
    #[must_use]
    pub const fn source(self) -> AppSource {
        match self {
            Self::Button => AppSource::swing("ButtonDemoProject/ButtonDemo.jnlp"),
            Self::CheckBox => AppSource::swing("CheckBoxDemoProject/CheckBoxDemo.jnlp"),
            Self::ColorChooser => AppSource::swing("ColorChooserDemoProject/ColorChooserDemo.jnlp"),
            Self::ComboBox => AppSource::swing("ComboBoxDemoProject/ComboBoxDemo.jnlp"),
            Self::Dialog => AppSource::swing("DialogDemoProject/DialogDemo.jnlp"),
            Self::FileChooser => AppSource::oracle(
                "tutorial/uiswing/examples/zipfiles/components-FileChooserDemo2Project.zip",
            ),
            Self::Frame => AppSource::swing("FrameDemoProject/FrameDemo.jnlp"),
            Self::InternalFrame => {
                AppSource::swing("InternalFrameDemoProject/InternalFrameDemo.jnlp")
            }
            Self::Label => AppSource::swing("LabelDemoProject/LabelDemo.jnlp"),
            Self::LayeredPane => AppSource::swing("LayeredPaneDemoProject/LayeredPaneDemo.jnlp"),
            Self::List => AppSource::swing("ListDemoProject/ListDemo.jnlp"),
            Self::Menu => AppSource::swing("MenuDemoProject/MenuDemo.jnlp"),
            Self::Password => AppSource::swing("PasswordDemoProject/PasswordDemo.jnlp"),
            Self::Popup => AppSource::swing("PopupMenuDemoProject/PopupMenuDemo.jnlp"),
            Self::ProgressBar => AppSource::swing("ProgressBarDemoProject/ProgressBarDemo.jnlp"),
            Self::RadioButton => AppSource::swing("RadioButtonDemoProject/RadioButtonDemo.jnlp"),
            Self::RootLayeredPane => {
                AppSource::swing("RootLayeredPaneDemoProject/RootLayeredPaneDemo.jnlp")
            }
            Self::Scroll => AppSource::swing("ScrollDemoProject/ScrollDemo.jnlp"),
            Self::Slider => AppSource::swing("SliderDemoProject/SliderDemo.jnlp"),
            Self::SliderTwo => AppSource::swing("SliderDemo2Project/SliderDemo2.jnlp"),
            Self::Spinner => AppSource::swing("SpinnerDemoProject/SpinnerDemo.jnlp"),
            Self::SplitPane => AppSource::swing("SplitPaneDemoProject/SplitPaneDemo.jnlp"),
            Self::StatusBar => AppSource::swing("StatusBarDemoProject/StatusBarDemo.jnlp"),
            Self::Table => AppSource::swing("TableDemoProject/TableDemo.jnlp"),
            Self::TextArea => AppSource::swing("TextAreaDemoProject/TextAreaDemo.jnlp"),
            Self::Toolbar => AppSource::swing("ToolBarDemoProject/ToolBarDemo.jnlp"),
            Self::Tree => AppSource::swing("TreeDemoProject/TreeDemo.jnlp"),
            Self::TableFtfEdit => {
                AppSource::swing("TableFTFEditDemoProject/TableFTFEditDemo.jnlp")
            }
        }
    }
}

impl fmt::Display for OracleApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OracleApp {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|app| app.name() == wanted)
            .ok_or_else(|| HarnessError::Catalog {
                name: s.to_string(),
                message: "no such demo application".to_string(),
            })
    }
}

/// Kind of file a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Web-start descriptor, launched through the managed launcher
    Jnlp,
    /// Zipped project
    Zip,
}

impl FileKind {
    /// File extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jnlp => JNLP_EXTENSION,
            Self::Zip => ZIP_EXTENSION,
        }
    }
}

/// Classify a URL by its suffix. Anything that is not `.jnlp` is stored as a zip.
#[must_use]
pub fn file_kind(url: &str) -> FileKind {
    if url.ends_with(".jnlp") {
        FileKind::Jnlp
    } else {
        FileKind::Zip
    }
}

/// Remove every ASCII digit.
#[must_use]
pub fn strip_digits(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Derive the expected window title for a URL.
///
/// An explicit title wins; otherwise the last `/` segment of the URL is cut at
/// its first `.`. Digits are removed in both cases. Returns `None` when the URL
/// has no usable final segment.
#[must_use]
pub fn derive_window_title(url: &str, explicit: Option<&str>) -> Option<String> {
    if let Some(title) = explicit {
        return Some(strip_digits(title));
    }
    let segment = url.rsplit('/').next()?;
    let stem = segment.split('.').next()?;
    if stem.is_empty() {
        return None;
    }
    Some(strip_digits(stem))
}

/// A resolved test subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Which app this entry describes
    pub app: OracleApp,
    /// Download URL
    pub url: String,
    /// Destination on disk
    pub local_path: PathBuf,
    /// Title of the window the app opens
    pub window_title: String,
}

impl CatalogEntry {
    /// Resolve a source against a destination directory.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Catalog`] when no window title can be derived.
    pub fn resolve(app: OracleApp, source: AppSource, dir: &Path) -> HarnessResult<Self> {
        let url = source.url();
        let window_title =
            derive_window_title(&url, source.title).ok_or_else(|| HarnessError::Catalog {
                name: app.name().to_string(),
                message: format!("URL '{url}' has no final path segment"),
            })?;
        let file_name = format!("{}.{}", app.name(), file_kind(&url).extension());

        Ok(Self {
            app,
            local_path: dir.join(file_name),
            url,
            window_title,
        })
    }

    /// File name component of the local path
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// Ordered set of resolved entries, keyed by app.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Resolve every [`OracleApp`] against `dir`.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed source.
    pub fn load(dir: impl Into<PathBuf>) -> HarnessResult<Self> {
        let dir = dir.into();
        let entries = OracleApp::ALL
            .iter()
            .map(|app| CatalogEntry::resolve(*app, app.source(), &dir))
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(Self { dir, entries })
    }

    /// Directory the entries resolve into
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up the entry for an app
    #[must_use]
    pub fn entry(&self, app: OracleApp) -> &CatalogEntry {
        // Entries are built from ALL in order, so the discriminant is the index.
        &self.entries[app as usize]
    }

    /// Iterate entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn catalog() -> Catalog {
        Catalog::load("jnlps").expect("static catalog resolves")
    }

    mod title_tests {
        use super::*;

        #[test]
        fn test_button_demo_title() {
            let url = format!("{UI_SWING_BASE_URL}/ButtonDemoProject/ButtonDemo.jnlp");
            assert_eq!(
                derive_window_title(&url, None).as_deref(),
                Some("ButtonDemo")
            );
        }

        #[test]
        fn test_digits_stripped_from_derived_title() {
            let url = format!("{UI_SWING_BASE_URL}/SliderDemo2Project/SliderDemo2.jnlp");
            assert_eq!(
                derive_window_title(&url, None).as_deref(),
                Some("SliderDemo")
            );
        }

        #[test]
        fn test_explicit_title_wins_and_is_stripped() {
            assert_eq!(
                derive_window_title("https://host/x/Ignored.jnlp", Some("Demo 2000")).as_deref(),
                Some("Demo ")
            );
        }

        #[test]
        fn test_trailing_slash_is_malformed() {
            assert_eq!(derive_window_title("https://host/path/", None), None);
        }

        #[test]
        fn test_malformed_source_fails_resolve() {
            let source = AppSource {
                base: "https://host",
                path: "dir/",
                title: None,
            };
            let err = CatalogEntry::resolve(OracleApp::Button, source, Path::new("d"))
                .expect_err("should fail");
            assert!(matches!(err, HarnessError::Catalog { .. }));
        }
    }

    mod entry_tests {
        use super::*;

        #[test]
        fn test_button_entry() {
            let entry = catalog().entry(OracleApp::Button).clone();
            assert_eq!(entry.window_title, "ButtonDemo");
            assert!(entry.local_path.ends_with("BUTTON.jnlp"));
            assert_eq!(
                entry.url,
                "https://docs.oracle.com/javase/tutorialJWS/samples/uiswing/ButtonDemoProject/ButtonDemo.jnlp"
            );
        }

        #[test]
        fn test_zip_entry() {
            let entry = catalog().entry(OracleApp::FileChooser).clone();
            assert!(entry.local_path.ends_with("FILE_CHOOSER.zip"));
            assert_eq!(entry.window_title, "components-FileChooserDemoProject");
            assert_eq!(entry.file_name(), "FILE_CHOOSER.zip");
        }

        #[test]
        fn test_entry_lookup_matches_app() {
            let catalog = catalog();
            for app in OracleApp::ALL {
                assert_eq!(catalog.entry(app).app, app);
            }
        }

        #[test]
        fn test_catalog_order_and_size() {
            let catalog = catalog();
            assert_eq!(catalog.len(), 28);
            assert!(!catalog.is_empty());
            let first = catalog.iter().next().unwrap();
            assert_eq!(first.app, OracleApp::Button);
        }

        #[test]
        fn test_names_unique() {
            let names: HashSet<_> = OracleApp::ALL.iter().map(|a| a.name()).collect();
            assert_eq!(names.len(), OracleApp::ALL.len());
        }

        #[test]
        fn test_extension_matches_url() {
            for entry in catalog().iter() {
                let ext = entry.local_path.extension().unwrap().to_str().unwrap();
                assert_eq!(ext == "zip", !entry.url.ends_with(".jnlp"), "{}", entry.app);
            }
        }

        #[test]
        fn test_titles_have_no_digits() {
            for entry in catalog().iter() {
                assert!(
                    !entry.window_title.chars().any(|c| c.is_ascii_digit()),
                    "{}",
                    entry.window_title
                );
            }
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_variants() {
            assert_eq!("BUTTON".parse::<OracleApp>().unwrap(), OracleApp::Button);
            assert_eq!(
                "table-ftf-edit".parse::<OracleApp>().unwrap(),
                OracleApp::TableFtfEdit
            );
            assert_eq!(
                " slider_two ".parse::<OracleApp>().unwrap(),
                OracleApp::SliderTwo
            );
        }

        #[test]
        fn test_parse_unknown() {
            assert!("NOPE".parse::<OracleApp>().is_err());
        }

        #[test]
        fn test_display_roundtrips_through_parse() {
            for app in OracleApp::ALL {
                assert_eq!(app.to_string().parse::<OracleApp>().unwrap(), app);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_derived_title_never_has_digits(stem in "[A-Za-z0-9]{1,16}", ext in "(jnlp|zip)") {
            let url = format!("https://host/p/{stem}.{ext}");
            let title = derive_window_title(&url, None).unwrap();
            prop_assert!(!title.chars().any(|c| c.is_ascii_digit()));
        }

        #[test]
        fn prop_file_kind_is_zip_unless_jnlp(url in "https://host/[a-z/]{0,12}[a-z]{1,8}\\.[a-z]{1,5}") {
            let is_zip = file_kind(&url) == FileKind::Zip;
            prop_assert_eq!(is_zip, !url.ends_with(".jnlp"));
        }
    }
}
