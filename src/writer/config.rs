use std::fmt;
use std::str::FromStr;

/// Rolling mode of a writer: files roll by size or by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollingKind {
    Size,
    Time,
}

impl RollingKind {
    /// Get the string name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Time => "date",
        }
    }

    /// Parse from string name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "size" => Some(Self::Size),
            "date" => Some(Self::Time),
            _ => None,
        }
    }
}

impl fmt::Display for RollingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RollingKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(())
    }
}

/// Minimum spacing between time-based rolls.
///
/// `Any` rolls as soon as the formatted timestamp tail changes; `Daily`
/// additionally waits for a full day to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollInterval {
    Any,
    Daily,
}

impl RollInterval {
    /// Get the string name for this interval
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Daily => "daily",
        }
    }

    /// Parse from string name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "any" => Some(Self::Any),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for RollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RollInterval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(())
    }
}

/// How rotated-out history files are archived.
///
/// Reserved policy hook: retention currently deletes regardless of the
/// configured kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveKind {
    #[default]
    None,
    Zip,
}

impl ArchiveKind {
    /// Get the string name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zip => "zip",
        }
    }

    /// Parse from string name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Default archive filename for kinds that produce one
    pub fn default_file_name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Zip => Some("log.zip"),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ArchiveKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(())
    }
}
