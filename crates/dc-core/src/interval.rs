//! Closed intervals over an ordered scalar.

/// A closed interval `[start, stop]`. Constructed fresh per query; never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<T> {
    pub start: T,
    pub stop: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    #[must_use]
    pub const fn new(start: T, stop: T) -> Self {
        Self { start, stop }
    }

    /// `start <= x <= stop`.
    #[must_use]
    pub fn contains(&self, x: T) -> bool {
        self.start <= x && x <= self.stop
    }

    /// The subsequence of `xs` falling inside the interval, preserving input
    /// order.
    pub fn filter<I>(&self, xs: I) -> impl Iterator<Item = T>
    where
        I: IntoIterator<Item = T>,
    {
        let interval = *self;
        xs.into_iter().filter(move |&x| interval.contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let interval = Interval::new(2, 5);
        assert!(!interval.contains(1));
        assert!(interval.contains(2));
        assert!(interval.contains(5));
        assert!(!interval.contains(6));
    }

    #[test]
    fn filter_preserves_input_order() {
        let interval = Interval::new(2, 5);
        let kept: Vec<i32> = interval.filter(vec![7, 5, 1, 3, 2, 9]).collect();
        assert_eq!(kept, vec![5, 3, 2]);
    }

    #[test]
    fn filter_over_empty_input() {
        let interval = Interval::new(0, 10);
        assert_eq!(interval.filter(Vec::<i32>::new()).count(), 0);
    }
}
