//! Survivor-count (lx) table indexed by integer age

use crate::error::TableLoadError;

/// Actuarial cutoff age. Summations never reach past this age.
pub const MAX_AGE: u32 = 110;

/// Number of survivors `lx` at each integer age out of a notional cohort
///
/// Ages without a row are kept distinct from ages whose survivor count is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeTable {
    /// Survivor counts by age (index = age, 0..=MAX_AGE)
    survivors: Vec<Option<f64>>,
}

impl LifeTable {
    /// Build a table from `(age, lx)` rows
    ///
    /// Rejects repeated ages, ages above `MAX_AGE` and survivor counts that are
    /// negative or not finite. Rows need not be contiguous or sorted.
    pub fn from_pairs<I>(rows: I) -> Result<Self, TableLoadError>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut survivors = vec![None; MAX_AGE as usize + 1];

        for (age, lx) in rows {
            if age > MAX_AGE {
                return Err(TableLoadError::AgeOutOfRange { age, max: MAX_AGE });
            }
            if !lx.is_finite() || lx < 0.0 {
                return Err(TableLoadError::NegativeSurvivors { age, lx });
            }
            let slot = &mut survivors[age as usize];
            if slot.is_some() {
                return Err(TableLoadError::RepeatedAge { age });
            }
            *slot = Some(lx);
        }

        Ok(Self { survivors })
    }

    /// Survivor count at `age`, or `None` when the table has no row for it
    pub fn lookup(&self, age: u32) -> Option<f64> {
        self.survivors.get(age as usize).copied().flatten()
    }

    /// Survivor count for summation terms: missing rows contribute nothing
    pub fn survivors(&self, age: u32) -> f64 {
        self.lookup(age).unwrap_or(0.0)
    }

    /// Survivor count usable as a valuation base (present and positive)
    pub fn valuation_base(&self, age: u32) -> Option<f64> {
        self.lookup(age).filter(|&lx| lx > 0.0)
    }

    /// Number of ages with a row
    pub fn len(&self) -> usize {
        self.survivors.iter().filter(|lx| lx.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(age, lx)` over the ages that have a row, in age order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.survivors
            .iter()
            .enumerate()
            .filter_map(|(age, lx)| lx.map(|lx| (age as u32, lx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_age_is_not_zero() {
        let table = LifeTable::from_pairs([(60, 1000.0), (61, 0.0)]).unwrap();

        assert_eq!(table.lookup(60), Some(1000.0));
        assert_eq!(table.lookup(61), Some(0.0));
        assert_eq!(table.lookup(62), None);

        // Both count as no contribution in a sum
        assert_eq!(table.survivors(61), 0.0);
        assert_eq!(table.survivors(62), 0.0);

        // Neither is a valid valuation base
        assert_eq!(table.valuation_base(60), Some(1000.0));
        assert_eq!(table.valuation_base(61), None);
        assert_eq!(table.valuation_base(62), None);
    }

    #[test]
    fn test_lookup_beyond_max_age() {
        let table = LifeTable::from_pairs([(110, 5.0)]).unwrap();
        assert_eq!(table.lookup(110), Some(5.0));
        assert_eq!(table.lookup(111), None);
        assert_eq!(table.lookup(u32::MAX), None);
    }

    #[test]
    fn test_rejects_structural_problems() {
        assert!(matches!(
            LifeTable::from_pairs([(50, 1.0), (50, 2.0)]),
            Err(TableLoadError::RepeatedAge { age: 50 })
        ));
        assert!(matches!(
            LifeTable::from_pairs([(111, 1.0)]),
            Err(TableLoadError::AgeOutOfRange { age: 111, max: MAX_AGE })
        ));
        assert!(matches!(
            LifeTable::from_pairs([(40, -1.0)]),
            Err(TableLoadError::NegativeSurvivors { age: 40, .. })
        ));
        assert!(LifeTable::from_pairs([(40, f64::NAN)]).is_err());
    }

    #[test]
    fn test_repeated_age_message() {
        let err = LifeTable::from_pairs([(50, 1.0), (50, 2.0)]).unwrap_err();
        assert_eq!(err.to_string(), "age 50 appears more than once");
    }

    #[test]
    fn test_iter_in_age_order() {
        let table = LifeTable::from_pairs([(3, 30.0), (1, 10.0), (2, 20.0)]).unwrap();
        let rows: Vec<_> = table.iter().collect();
        assert_eq!(rows, vec![(1, 10.0), (2, 20.0), (3, 30.0)]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }
}
