//! IUCN conservation status catalog
//!
//! Status codes carry a fixed categorical display order (threat severity,
//! then the non-assessment buckets) that every sorted view and chart axis
//! must reproduce exactly. Lexicographic order on the code string is wrong
//! and must never be used.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// IUCN conservation status code.
///
/// Discriminant values define the fixed display order:
/// LC < NT < VU < EN < CR < EX < DO < DD < NE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IucnStatus {
    /// Least Concern
    LeastConcern,
    /// Near Threatened
    NearThreatened,
    /// Vulnerable
    Vulnerable,
    /// Endangered
    Endangered,
    /// Critically Endangered
    CriticallyEndangered,
    /// Extinct
    Extinct,
    /// Domesticated (non-IUCN bucket used by the source data)
    Domesticated,
    /// Data Deficient
    DataDeficient,
    /// Not Evaluated
    NotEvaluated,
}

/// All statuses in display order, for chart axes and rank iteration.
pub const ALL_STATUSES: [IucnStatus; 9] = [
    IucnStatus::LeastConcern,
    IucnStatus::NearThreatened,
    IucnStatus::Vulnerable,
    IucnStatus::Endangered,
    IucnStatus::CriticallyEndangered,
    IucnStatus::Extinct,
    IucnStatus::Domesticated,
    IucnStatus::DataDeficient,
    IucnStatus::NotEvaluated,
];

impl IucnStatus {
    /// Two-letter status code as it appears in the source sheet.
    pub fn code(&self) -> &'static str {
        match self {
            IucnStatus::LeastConcern => "LC",
            IucnStatus::NearThreatened => "NT",
            IucnStatus::Vulnerable => "VU",
            IucnStatus::Endangered => "EN",
            IucnStatus::CriticallyEndangered => "CR",
            IucnStatus::Extinct => "EX",
            IucnStatus::Domesticated => "DO",
            IucnStatus::DataDeficient => "DD",
            IucnStatus::NotEvaluated => "NE",
        }
    }

    /// Full display label.
    pub fn label(&self) -> &'static str {
        match self {
            IucnStatus::LeastConcern => "Least Concern",
            IucnStatus::NearThreatened => "Near Threatened",
            IucnStatus::Vulnerable => "Vulnerable",
            IucnStatus::Endangered => "Endangered",
            IucnStatus::CriticallyEndangered => "Critically Endangered",
            IucnStatus::Extinct => "Extinct",
            IucnStatus::Domesticated => "Domesticated",
            IucnStatus::DataDeficient => "Data Deficient",
            IucnStatus::NotEvaluated => "Not Evaluated",
        }
    }

    /// Position in the fixed display order (0 = LC).
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Bar fill colour for chart rendering.
    pub fn fill_color(&self) -> &'static str {
        match self {
            IucnStatus::LeastConcern => "#63c5ff",
            IucnStatus::NearThreatened => "#7af054",
            IucnStatus::Vulnerable => "#e5cb50",
            IucnStatus::Endangered => "#ffa759",
            IucnStatus::CriticallyEndangered => "#f65f54",
            IucnStatus::Extinct => "#363636",
            IucnStatus::Domesticated => "#9C826C",
            IucnStatus::DataDeficient => "#b9b9b9",
            IucnStatus::NotEvaluated => "#b9b9b9",
        }
    }

    /// Bar border colour for chart rendering.
    pub fn border_color(&self) -> &'static str {
        match self {
            IucnStatus::LeastConcern => "#2db6ff",
            IucnStatus::NearThreatened => "#3eb800",
            IucnStatus::Vulnerable => "#d1a300",
            IucnStatus::Endangered => "#cd8900",
            IucnStatus::CriticallyEndangered => "#b3310b",
            IucnStatus::Extinct => "#ff4647",
            IucnStatus::Domesticated => "#85552c",
            IucnStatus::DataDeficient => "#979797",
            IucnStatus::NotEvaluated => "#979797",
        }
    }

    /// Parse a status code from the sheet. Unknown or empty input is `None`,
    /// never an error; uncoded rows render with neutral styling downstream.
    pub fn parse_code(code: &str) -> Option<IucnStatus> {
        match code.trim() {
            "LC" => Some(IucnStatus::LeastConcern),
            "NT" => Some(IucnStatus::NearThreatened),
            "VU" => Some(IucnStatus::Vulnerable),
            "EN" => Some(IucnStatus::Endangered),
            "CR" => Some(IucnStatus::CriticallyEndangered),
            "EX" => Some(IucnStatus::Extinct),
            "DO" => Some(IucnStatus::Domesticated),
            "DD" => Some(IucnStatus::DataDeficient),
            "NE" => Some(IucnStatus::NotEvaluated),
            _ => None,
        }
    }
}

impl FromStr for IucnStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IucnStatus::parse_code(s).ok_or(())
    }
}

impl fmt::Display for IucnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rank for sorting rows where the status may be absent.
/// Uncoded rows sort after every coded status.
pub fn rank_or_last(status: Option<IucnStatus>) -> usize {
    status.map(|s| s.rank()).unwrap_or(ALL_STATUSES.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order() {
        let codes: Vec<&str> = ALL_STATUSES.iter().map(|s| s.code()).collect();
        assert_eq!(codes, ["LC", "NT", "VU", "EN", "CR", "EX", "DO", "DD", "NE"]);
    }

    #[test]
    fn test_rank_matches_order() {
        for (i, status) in ALL_STATUSES.iter().enumerate() {
            assert_eq!(status.rank(), i);
        }
        // Derived Ord must agree with the catalog order
        let mut shuffled = vec![
            IucnStatus::NotEvaluated,
            IucnStatus::CriticallyEndangered,
            IucnStatus::LeastConcern,
            IucnStatus::Extinct,
            IucnStatus::Vulnerable,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                IucnStatus::LeastConcern,
                IucnStatus::Vulnerable,
                IucnStatus::CriticallyEndangered,
                IucnStatus::Extinct,
                IucnStatus::NotEvaluated,
            ]
        );
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(IucnStatus::parse_code("EN"), Some(IucnStatus::Endangered));
        assert_eq!(IucnStatus::parse_code(" LC "), Some(IucnStatus::LeastConcern));
        assert_eq!(IucnStatus::parse_code("XX"), None);
        assert_eq!(IucnStatus::parse_code(""), None);
        // Lowercase codes do not appear in the sheet; keep the match strict
        assert_eq!(IucnStatus::parse_code("lc"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(IucnStatus::LeastConcern.label(), "Least Concern");
        assert_eq!(IucnStatus::Domesticated.label(), "Domesticated");
        assert_eq!(IucnStatus::NotEvaluated.label(), "Not Evaluated");
    }

    #[test]
    fn test_rank_or_last() {
        assert_eq!(rank_or_last(Some(IucnStatus::LeastConcern)), 0);
        assert_eq!(rank_or_last(None), 9);
    }
}
