//! Saturating fixed-width counters and human-readable size formatting.

use serde::Serialize;
use std::fmt;

/// An SI prefix descriptor used by [`Count64::human`].
#[derive(Debug, Clone, Copy)]
pub struct Prefix {
    pub symbol: &'static str,
    pub factor: f64,
}

/// Metric (decimal, 1000-based) SI prefixes, largest first.
pub const METRIC_PREFIXES: &[Prefix] = &[
    Prefix { symbol: "P", factor: 1_000_000_000_000_000.0 },
    Prefix { symbol: "T", factor: 1_000_000_000_000.0 },
    Prefix { symbol: "G", factor: 1_000_000_000.0 },
    Prefix { symbol: "M", factor: 1_000_000.0 },
    Prefix { symbol: "K", factor: 1_000.0 },
];

/// Binary (1024-based) SI prefixes, largest first.
pub const BINARY_PREFIXES: &[Prefix] = &[
    Prefix { symbol: "Pi", factor: 1_125_899_906_842_624.0 },
    Prefix { symbol: "Ti", factor: 1_099_511_627_776.0 },
    Prefix { symbol: "Gi", factor: 1_073_741_824.0 },
    Prefix { symbol: "Mi", factor: 1_048_576.0 },
    Prefix { symbol: "Ki", factor: 1_024.0 },
];

/// Which prefix family to use when rendering a value for human consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixStyle {
    Metric,
    Binary,
}

impl PrefixStyle {
    fn table(self) -> &'static [Prefix] {
        match self {
            PrefixStyle::Metric => METRIC_PREFIXES,
            PrefixStyle::Binary => BINARY_PREFIXES,
        }
    }
}

/// Render `value unit` with three significant digits of mantissa precision, e.g.
/// `"1.25 KiB"` or `"998 B"`.
pub fn humanize(value: u64, style: PrefixStyle, unit: &str) -> String {
    let v = value as f64;
    for prefix in style.table() {
        if v >= prefix.factor {
            let mantissa = v / prefix.factor;
            return format!("{} {}{}", format_mantissa(mantissa), prefix.symbol, unit);
        }
    }
    format!("{value} {unit}")
}

/// Format a mantissa to three significant digits, the way `git-sizer`-style reports do:
/// `9.99`, `99.9`, `999`.
fn format_mantissa(m: f64) -> String {
    if m < 10.0 {
        format!("{m:.2}")
    } else if m < 100.0 {
        format!("{m:.1}")
    } else {
        format!("{:.0}", m.round())
    }
}

/// A 32-bit counter that saturates at `u32::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Count32(u32);

impl Count32 {
    pub const ZERO: Count32 = Count32(0);

    pub fn new(v: u32) -> Self {
        Count32(v)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Saturating add in place.
    pub fn increment(&mut self, n: u32) {
        self.0 = self.0.saturating_add(n);
    }

    /// Saturating add, returning the new value.
    pub fn plus(self, n: u32) -> Count32 {
        Count32(self.0.saturating_add(n))
    }

    /// Replace with `n` if `n` is strictly greater than the current value.
    /// Returns whether the replacement happened.
    pub fn adjust_max_if_necessary(&mut self, n: u32) -> bool {
        if n > self.0 {
            self.0 = n;
            true
        } else {
            false
        }
    }

    /// Replace with `n` if `n` is greater than or equal to the current value. Used so
    /// that, when candidates are processed in chronological order, the most recently
    /// processed candidate wins ties.
    pub fn adjust_max_if_possible(&mut self, n: u32) -> bool {
        if n >= self.0 {
            self.0 = n;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Count32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A 64-bit counter that saturates at `u64::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Count64(u64);

impl Count64 {
    pub const ZERO: Count64 = Count64(0);

    pub fn new(v: u64) -> Self {
        Count64(v)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn increment(&mut self, n: u64) {
        self.0 = self.0.saturating_add(n);
    }

    pub fn plus(self, n: u64) -> Count64 {
        Count64(self.0.saturating_add(n))
    }

    pub fn adjust_max_if_necessary(&mut self, n: u64) -> bool {
        if n > self.0 {
            self.0 = n;
            true
        } else {
            false
        }
    }

    pub fn adjust_max_if_possible(&mut self, n: u64) -> bool {
        if n >= self.0 {
            self.0 = n;
            true
        } else {
            false
        }
    }

    pub fn humanize(self, style: PrefixStyle, unit: &str) -> String {
        humanize(self.0, style, unit)
    }
}

impl fmt::Display for Count64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Count32> for Count64 {
    fn from(c: Count32) -> Self {
        Count64(c.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn count32_saturates_instead_of_panicking() {
        let mut c = Count32::new(u32::MAX - 1);
        c.increment(10);
        assert_eq!(c.get(), u32::MAX);
    }

    #[test]
    fn count64_saturates_instead_of_panicking() {
        let mut c = Count64::new(u64::MAX - 1);
        c.increment(10);
        assert_eq!(c.get(), u64::MAX);
    }

    #[test]
    fn adjust_max_if_necessary_is_strict() {
        let mut c = Count32::new(5);
        assert!(!c.adjust_max_if_necessary(5));
        assert_eq!(c.get(), 5);
        assert!(c.adjust_max_if_necessary(6));
        assert_eq!(c.get(), 6);
    }

    #[test]
    fn adjust_max_if_possible_favors_ties() {
        let mut c = Count32::new(5);
        assert!(c.adjust_max_if_possible(5));
        assert_eq!(c.get(), 5);
    }

    #[test]
    fn humanize_binary_prefixes() {
        assert_eq!(humanize(1024, PrefixStyle::Binary, "B"), "1.00 KiB");
        assert_eq!(humanize(999, PrefixStyle::Binary, "B"), "999 B");
    }

    #[test]
    fn humanize_metric_prefixes() {
        assert_eq!(humanize(1_000_000, PrefixStyle::Metric, "B"), "1.00 MB");
    }

    proptest! {
        #[test]
        fn count32_increment_never_panics(start in 0u32..=u32::MAX, delta in 0u32..=u32::MAX) {
            let mut c = Count32::new(start);
            c.increment(delta);
            prop_assert!(c.get() >= start || start == u32::MAX);
        }

        #[test]
        fn count64_plus_is_monotonic(start in 0u64..=u64::MAX, delta in 0u64..=u64::MAX) {
            let c = Count64::new(start).plus(delta);
            prop_assert!(c.get() >= start);
        }
    }
}
