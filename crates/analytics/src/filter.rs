use core_types::{FilterCriteria, OrderLine};

/// Applies the criteria to the full record set, producing the subset every
/// aggregation runs over. Predicates combine with AND; an absent predicate
/// constrains nothing. The store itself is never touched.
pub fn apply<'a>(records: &'a [OrderLine], criteria: &FilterCriteria) -> Vec<&'a OrderLine> {
    records
        .iter()
        .filter(|line| criteria.matches(line))
        .collect()
}
