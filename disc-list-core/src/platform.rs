/// Console profiles supported by the catalog builder.
///
/// Each profile fixes where images live under the game root, which file
/// extensions count as images, and which reference table names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ps1,
    Ps2,
}

/// A top-level image folder and the extensions scanned inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFolder {
    /// Folder name under the game root, also written as the catalog's folder tag.
    pub name: &'static str,
    /// Lowercase extensions without the dot.
    pub extensions: &'static [&'static str],
}

impl ImageFolder {
    /// Case-insensitive extension check.
    pub fn matches(&self, filename: &str) -> bool {
        extension_of(filename)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

const ALL_PLATFORMS: &[Platform] = &[Platform::Ps1, Platform::Ps2];

const PS1_FOLDERS: &[ImageFolder] = &[ImageFolder {
    name: "POPS",
    extensions: &["vcd"],
}];

const PS2_FOLDERS: &[ImageFolder] = &[
    ImageFolder {
        name: "DVD",
        extensions: &["iso", "zso"],
    },
    ImageFolder {
        name: "CD",
        extensions: &["iso", "zso"],
    },
];

/// Extensions of compressed images that must be expanded before scanning.
pub const COMPRESSED_EXTENSIONS: &[&str] = &["zso"];

/// Whether a filename names a compressed image.
pub fn is_compressed(filename: &str) -> bool {
    extension_of(filename)
        .is_some_and(|ext| COMPRESSED_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn extension_of(filename: &str) -> Option<&str> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
}

impl Platform {
    /// Canonical short name used for CLI arguments and catalog filenames.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Ps1 => "ps1",
            Self::Ps2 => "ps2",
        }
    }

    /// Full display name for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ps1 => "Sony PlayStation",
            Self::Ps2 => "Sony PlayStation 2",
        }
    }

    /// All accepted names for this platform (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Ps1 => &["ps1", "psx", "pops", "playstation", "playstation1"],
            Self::Ps2 => &["ps2", "playstation2", "playstation 2"],
        }
    }

    /// Image folders in the order they are processed.
    pub fn folders(&self) -> &'static [ImageFolder] {
        match self {
            Self::Ps1 => PS1_FOLDERS,
            Self::Ps2 => PS2_FOLDERS,
        }
    }

    /// Default reference table filename.
    pub fn titles_db_name(&self) -> &'static str {
        match self {
            Self::Ps1 => "TitlesDB_PS1_English.csv",
            Self::Ps2 => "TitlesDB_PS2_English.csv",
        }
    }

    /// Conventional catalog filename (`ps2.list`).
    pub fn list_name(&self) -> &'static str {
        match self {
            Self::Ps1 => "ps1.list",
            Self::Ps2 => "ps2.list",
        }
    }

    /// Infer the platform from a catalog path ending in `ps1.list` or `ps2.list`.
    pub fn from_list_path(path: &std::path::Path) -> Option<Platform> {
        let name = path.to_str()?;
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| name.ends_with(p.list_name()))
    }

    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.aliases().contains(&lower.as_str()))
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn canonical_names_round_trip() {
        for &platform in Platform::all() {
            let parsed: Platform = platform.short_name().parse().unwrap();
            assert_eq!(parsed, platform, "round-trip failed for {:?}", platform);
        }
    }

    #[test]
    fn aliases_resolve_correctly() {
        let cases = [
            ("psx", Platform::Ps1),
            ("POPS", Platform::Ps1),
            ("PlayStation 2", Platform::Ps2),
            ("PS2", Platform::Ps2),
        ];
        for (input, expected) in cases {
            let parsed: Platform = input.parse().unwrap();
            assert_eq!(parsed, expected, "alias '{}'", input);
        }
        assert!("ps3".parse::<Platform>().is_err());
    }

    #[test]
    fn short_name_is_first_alias() {
        for &platform in Platform::all() {
            assert_eq!(platform.short_name(), platform.aliases()[0]);
        }
    }

    #[test]
    fn folder_layout() {
        let names: Vec<&str> = Platform::Ps2.folders().iter().map(|f| f.name).collect();
        assert_eq!(names, ["DVD", "CD"]);
        assert_eq!(Platform::Ps1.folders()[0].name, "POPS");
    }

    #[test]
    fn folder_extension_matching() {
        let dvd = Platform::Ps2.folders()[0];
        assert!(dvd.matches("Game.iso"));
        assert!(dvd.matches("Game.ZSO"));
        assert!(!dvd.matches("Game.vcd"));
        assert!(!dvd.matches("iso"));

        let pops = Platform::Ps1.folders()[0];
        assert!(pops.matches("Game.VCD"));
        assert!(!pops.matches("Game.iso"));
    }

    #[test]
    fn compressed_detection() {
        assert!(is_compressed("Game.zso"));
        assert!(is_compressed("Game.ZSO"));
        assert!(!is_compressed("Game.iso"));
        assert!(!is_compressed("zso"));
    }

    #[test]
    fn platform_from_list_path() {
        assert_eq!(
            Platform::from_list_path(Path::new("/mnt/opl/games/ps2.list")),
            Some(Platform::Ps2)
        );
        assert_eq!(
            Platform::from_list_path(Path::new("ps1.list")),
            Some(Platform::Ps1)
        );
        assert_eq!(Platform::from_list_path(Path::new("games.txt")), None);
    }

    #[test]
    fn titles_db_names() {
        assert_eq!(Platform::Ps2.titles_db_name(), "TitlesDB_PS2_English.csv");
        assert_eq!(Platform::Ps1.titles_db_name(), "TitlesDB_PS1_English.csv");
    }
}
