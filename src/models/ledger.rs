use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Whether a ledger row spends or collects money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "D")]
    Expenditure,
    #[serde(rename = "R")]
    Revenue,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expenditure => "D",
            Self::Revenue => "R",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "d" | "depense" | "dépense" => Some(Self::Expenditure),
            "r" | "recette" => Some(Self::Revenue),
            _ => None,
        }
    }
}

/// Operating ("fonctionnement") or investment budget section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "F")]
    Operating,
    #[serde(rename = "I")]
    Investment,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operating => "F",
            Self::Investment => "I",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "f" | "fonctionnement" => Some(Self::Operating),
            "i" | "investissement" => Some(Self::Investment),
            _ => None,
        }
    }
}

/// Direction × section pair, written `DF`, `DI`, `RF` or `RI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rdfi {
    pub direction: Direction,
    pub section: Section,
}

impl Rdfi {
    pub const DF: Rdfi = Rdfi::new(Direction::Expenditure, Section::Operating);
    pub const DI: Rdfi = Rdfi::new(Direction::Expenditure, Section::Investment);
    pub const RF: Rdfi = Rdfi::new(Direction::Revenue, Section::Operating);
    pub const RI: Rdfi = Rdfi::new(Direction::Revenue, Section::Investment);

    pub const fn new(direction: Direction, section: Section) -> Self {
        Self { direction, section }
    }

    /// Parses the two-letter code (`"DF"`). Anything else is `None`.
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let direction = Direction::parse(&chars.next()?.to_string())?;
        let section = Section::parse(&chars.next()?.to_string())?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(direction, section))
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.direction.as_str(), self.section.as_str())
    }
}

impl fmt::Display for Rdfi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.as_str(), self.section.as_str())
    }
}

impl From<Rdfi> for String {
    fn from(rdfi: Rdfi) -> Self {
        rdfi.code()
    }
}

impl TryFrom<String> for Rdfi {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rdfi::parse(&value).ok_or_else(|| format!("invalid RDFI code '{}'", value))
    }
}

/// One accounting line of a year's budget instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub direction: Direction,
    pub section: Section,
    pub function_code: String,
    pub nature_code: String,
    pub amount_cents: i64,
    pub label: String,
}

impl LedgerRow {
    pub fn rdfi(&self) -> Rdfi {
        Rdfi::new(self.direction, self.section)
    }
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Immutable set of rows for one year.
///
/// Every snapshot gets a process-unique `revision` at construction; caches
/// compare revisions to tell whether a year's data was swapped out.
#[derive(Debug)]
pub struct LedgerSnapshot {
    year: i32,
    revision: u64,
    rows: Vec<LedgerRow>,
}

impl LedgerSnapshot {
    pub fn new(year: i32, rows: Vec<LedgerRow>) -> Self {
        Self {
            year,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
            rows,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
