#![forbid(unsafe_code)]

//! Named responsive breakpoints.
//!
//! A [`BreakpointTable`] maps each [`Breakpoint`] to a pixel width. The
//! default table is `xs=400, sm=600, md=768, lg=1024, xl=1200, xxl=1440`.
//! Device classes derive from `md` and `lg`:
//!
//! | Class   | Width range       |
//! |---------|-------------------|
//! | Mobile  | `< md`            |
//! | Tablet  | `md ..< lg`       |
//! | Desktop | `>= lg`           |

use std::fmt;
use std::str::FromStr;

/// Breakpoint key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Xxl => "xxl",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown breakpoint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBreakpoint(pub String);

impl fmt::Display for UnknownBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown breakpoint `{}`", self.0)
    }
}

impl std::error::Error for UnknownBreakpoint {}

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBreakpoint(s.to_owned()))
    }
}

/// Coarse device class derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

/// Pixel widths for every [`Breakpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BreakpointTable {
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
    pub xxl: u32,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self {
            xs: 400,
            sm: 600,
            md: 768,
            lg: 1024,
            xl: 1200,
            xxl: 1440,
        }
    }
}

impl BreakpointTable {
    /// Width for `bp`.
    #[must_use]
    pub const fn width(&self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
            Breakpoint::Xxl => self.xxl,
        }
    }

    /// Builder: override one width.
    #[must_use]
    pub fn with(self, bp: Breakpoint, width: u32) -> Self {
        let mut widths = self.as_array();
        widths[bp.index()] = width;
        Self::from_array(widths)
    }

    fn as_array(&self) -> [u32; 6] {
        [self.xs, self.sm, self.md, self.lg, self.xl, self.xxl]
    }

    fn from_array(w: [u32; 6]) -> Self {
        Self {
            xs: w[0],
            sm: w[1],
            md: w[2],
            lg: w[3],
            xl: w[4],
            xxl: w[5],
        }
    }

    /// Breakpoints ordered by ascending width. Ties keep declaration order.
    #[must_use]
    pub fn ascending(&self) -> Vec<(Breakpoint, u32)> {
        let mut entries: Vec<_> = Breakpoint::ALL
            .into_iter()
            .map(|bp| (bp, self.width(bp)))
            .collect();
        entries.sort_by_key(|&(_, w)| w);
        entries
    }

    #[must_use]
    pub fn classify(&self, width: u32) -> DeviceClass {
        if width < self.md {
            DeviceClass::Mobile
        } else if width < self.lg {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Problems with this table; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let widths = self.as_array();
        let mut problems = Vec::new();
        for pair in Breakpoint::ALL.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if widths[lo.index()] >= widths[hi.index()] {
                problems.push(format!(
                    "breakpoint {lo} ({}) must be narrower than {hi} ({})",
                    widths[lo.index()],
                    widths[hi.index()]
                ));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_widths() {
        let t = BreakpointTable::default();
        assert_eq!(t.width(Breakpoint::Sm), 600);
        assert_eq!(t.width(Breakpoint::Xl), 1200);
        assert!(t.validate().is_empty());
    }

    #[test]
    fn classify_uses_md_and_lg() {
        let t = BreakpointTable::default();
        assert_eq!(t.classify(767), DeviceClass::Mobile);
        assert_eq!(t.classify(768), DeviceClass::Tablet);
        assert_eq!(t.classify(1023), DeviceClass::Tablet);
        assert_eq!(t.classify(1024), DeviceClass::Desktop);
    }

    #[test]
    fn parse_names() {
        assert_eq!("XL".parse::<Breakpoint>(), Ok(Breakpoint::Xl));
        assert!("huge".parse::<Breakpoint>().is_err());
    }

    #[test]
    fn custom_table_reorders() {
        let t = BreakpointTable::default().with(Breakpoint::Xs, 2000);
        let order: Vec<_> = t.ascending().into_iter().map(|(bp, _)| bp).collect();
        assert_eq!(order.last(), Some(&Breakpoint::Xs));
        assert_eq!(t.validate().len(), 1);
    }
}
