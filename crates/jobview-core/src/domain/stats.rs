//! Named counters used to build the `stats` column.

use std::fmt;

/// Ordered set of named counters.
///
/// Counter order is the registration order; it is also the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    counters: Vec<(String, u64)>,
}

impl Statistics {
    /// Create counters for the given names, all starting at zero.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stats = Self::default();
        for name in names {
            let name = name.into();
            if stats.position(&name).is_none() {
                stats.counters.push((name, 0));
            }
        }
        stats
    }

    /// Increment a counter by one.
    ///
    /// Unknown names are appended at the end.
    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, amount: u64) {
        match self.position(name) {
            Some(idx) => self.counters[idx].1 += amount,
            None => self.counters.push((name.to_string(), amount)),
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.position(name).map_or(0, |idx| self.counters[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(name, count)| (name.as_str(), *count))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.counters.iter().position(|(n, _)| n == name)
    }
}

/// `name=count` pairs separated by spaces; zero counters are skipped.
impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, count) in self.iter().filter(|(_, count)| *count > 0) {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={count}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counters_start_at_zero_and_render_empty() {
        let stats = Statistics::new(["in", "out", "err"]);
        assert_eq!(stats.get("in"), 0);
        assert_eq!(stats.to_string(), "");
    }

    #[test]
    fn renders_non_zero_counters_in_registration_order() {
        let mut stats = Statistics::new(["in", "out", "err"]);
        stats.add("out", 2);
        stats.add("in", 3);

        assert_eq!(stats.to_string(), "in=3 out=2");
    }

    #[test]
    fn unknown_counter_is_appended() {
        let mut stats = Statistics::new(["in"]);
        stats.increment("in");
        stats.increment("skipped");

        assert_eq!(stats.get("skipped"), 1);
        assert_eq!(stats.to_string(), "in=1 skipped=1");
    }

    #[test]
    fn duplicate_names_are_registered_once() {
        let stats = Statistics::new(["in", "in"]);
        assert_eq!(stats.iter().count(), 1);
    }
}
