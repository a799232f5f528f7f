use rust_decimal::Decimal;
use starling_proto::starling::TransactionDetail;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Category label for transactions without a spending category.
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TotalsError {
    #[error("Total for category `{0}` overflowed")]
    Overflow(String),
}

/// The category a transaction is counted under.
///
/// This is the spending category label, verbatim, or [`UNKNOWN_CATEGORY`] when the label is absent
/// or empty.
pub fn effective_category(detail: &TransactionDetail) -> &str {
    match detail.spending_category.as_deref() {
        Some(category) if !category.is_empty() => category,
        _ => UNKNOWN_CATEGORY,
    }
}

/// Exact decimal totals of transaction amounts, grouped by [`effective_category`].
///
/// Categories are kept sorted by label. The totals do not depend on the order in which details are
/// added.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CategoryTotals {
    totals: BTreeMap<String, Decimal>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total every detail by category.
    ///
    /// # Errors
    ///
    /// Fails when any category total exceeds the range of [`Decimal`].
    pub fn collate<'a, I>(details: I) -> Result<Self, TotalsError>
    where
        I: IntoIterator<Item = &'a TransactionDetail>,
    {
        let mut totals = Self::new();
        for detail in details {
            totals.add(detail)?;
        }

        Ok(totals)
    }

    /// Add a transaction's amount to its category total.
    ///
    /// The totals are left unchanged when the category total would overflow.
    pub fn add(&mut self, detail: &TransactionDetail) -> Result<(), TotalsError> {
        let category = effective_category(detail);
        match self.totals.get_mut(category) {
            Some(total) => {
                *total = total
                    .checked_add(detail.amount)
                    .ok_or_else(|| TotalsError::Overflow(category.to_string()))?;
            }
            None => {
                self.totals.insert(category.to_string(), detail.amount);
            }
        }

        Ok(())
    }

    /// Get the total for a single category.
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.totals
            .iter()
            .map(|(category, total)| (category.as_str(), *total))
    }

    pub fn as_map(&self) -> &BTreeMap<String, Decimal> {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum across all categories, or `None` if it does not fit in a [`Decimal`].
    pub fn total(&self) -> Option<Decimal> {
        self.totals
            .values()
            .try_fold(Decimal::ZERO, |sum, total| sum.checked_add(*total))
    }
}

impl fmt::Display for CategoryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CATEGORY: &str = "Category";
        const AMOUNT: &str = "Amount";
        const TOTAL: &str = "Total";

        let total = self
            .total()
            .map_or_else(|| "overflow".to_string(), |total| total.to_string());
        let rows = self
            .totals
            .iter()
            .map(|(category, amount)| (category.as_str(), amount.to_string()))
            .collect::<Vec<_>>();

        let category_width = rows
            .iter()
            .map(|(category, _)| category.chars().count())
            .chain([CATEGORY.len(), TOTAL.len()])
            .max()
            .unwrap_or_default();
        let amount_width = rows
            .iter()
            .map(|(_, amount)| amount.len())
            .chain([AMOUNT.len(), total.len()])
            .max()
            .unwrap_or_default();

        writeln!(f, "{CATEGORY:<category_width$}  {AMOUNT:>amount_width$}")?;
        for (category, amount) in &rows {
            writeln!(f, "{category:<category_width$}  {amount:>amount_width$}")?;
        }
        writeln!(f, "{}", "-".repeat(category_width + 2 + amount_width))?;
        writeln!(f, "{TOTAL:<category_width$}  {total:>amount_width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbtest::arbitrary::{Result as ArbResult, Unstructured};
    use arbtest::arbtest;
    use similar_asserts::assert_eq;
    use starling_proto::starling::Direction;
    use std::str::FromStr;
    use tracing_test::traced_test;

    fn detail(amount: &str, category: Option<&str>) -> TransactionDetail {
        TransactionDetail {
            amount: Decimal::from_str(amount).unwrap(),
            currency: "GBP".to_string(),
            direction: Direction::Outbound,
            narrative: "Test".to_string(),
            source: "MASTER_CARD".to_string(),
            spending_category: category.map(str::to_string),
        }
    }

    fn max_detail(category: Option<&str>) -> TransactionDetail {
        TransactionDetail {
            amount: Decimal::MAX,
            spending_category: category.map(str::to_string),
            ..detail("0", None)
        }
    }

    fn dec(amount: &str) -> Decimal {
        Decimal::from_str(amount).unwrap()
    }

    fn generate_detail(u: &mut Unstructured<'_>) -> ArbResult<TransactionDetail> {
        let categories = [
            None,
            Some(""),
            Some("GROCERIES"),
            Some("Groceries"),
            Some("EATING_OUT"),
            Some(UNKNOWN_CATEGORY),
        ];
        let category = *u.choose(&categories)?;
        let amount = Decimal::new(
            u.int_in_range(-100_000_000_i64..=100_000_000)?,
            u.int_in_range(0..=4)?,
        );

        Ok(TransactionDetail {
            amount,
            spending_category: category.map(str::to_string),
            ..detail("0", None)
        })
    }

    fn generate_details(u: &mut Unstructured<'_>) -> ArbResult<Vec<TransactionDetail>> {
        let len = u.int_in_range(0..=64)?;

        (0..len).map(|_| generate_detail(u)).collect()
    }

    #[test]
    fn test_collate_spending() {
        let details = [
            detail("10.00", Some("Groceries")),
            detail("5.50", Some("Groceries")),
            detail("3.25", Some("")),
        ];
        let totals = CategoryTotals::collate(&details).unwrap();

        let expected = BTreeMap::from([
            ("Groceries".to_string(), dec("15.50")),
            ("UNKNOWN".to_string(), dec("3.25")),
        ]);
        assert_eq!(totals.as_map(), &expected);
        assert_eq!(totals.total(), Some(dec("18.75")));
    }

    #[test]
    fn test_collate_empty() {
        let details: [TransactionDetail; 0] = [];
        let totals = CategoryTotals::collate(&details).unwrap();

        assert!(totals.is_empty());
        assert_eq!(totals.len(), 0);
        assert_eq!(totals.total(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_effective_category() {
        assert_eq!(effective_category(&detail("1", None)), UNKNOWN_CATEGORY);
        assert_eq!(effective_category(&detail("1", Some(""))), UNKNOWN_CATEGORY);
        assert_eq!(effective_category(&detail("1", Some("Groceries"))), "Groceries");

        // Labels are not normalized.
        assert_eq!(effective_category(&detail("1", Some(" "))), " ");
        assert_eq!(effective_category(&detail("1", Some("groceries"))), "groceries");
    }

    #[test]
    fn test_labels_are_distinct() {
        let details = [
            detail("1.00", Some("GROCERIES")),
            detail("2.00", Some("Groceries")),
            detail("4.00", None),
            detail("8.00", Some("")),
        ];
        let totals = CategoryTotals::collate(details.iter()).unwrap();

        assert_eq!(totals.len(), 3);
        assert_eq!(totals.get("GROCERIES"), Some(dec("1.00")));
        assert_eq!(totals.get("Groceries"), Some(dec("2.00")));
        assert_eq!(totals.get(UNKNOWN_CATEGORY), Some(dec("12.00")));
        assert_eq!(totals.get("EATING_OUT"), None);
    }

    #[test]
    fn test_sums_are_exact() {
        // 0.1 is not representable in binary floating point.
        let details = vec![detail("0.10", Some("TRANSPORT")); 1_000];
        let totals = CategoryTotals::collate(&details).unwrap();

        assert_eq!(totals.get("TRANSPORT"), Some(dec("100.00")));
        assert_eq!(totals.get("TRANSPORT").unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_add_matches_collate() {
        let details = [
            detail("-12.34", Some("EATING_OUT")),
            detail("100", Some("INCOME")),
            detail("-0.66", Some("EATING_OUT")),
        ];

        let mut totals = CategoryTotals::new();
        for detail in &details {
            totals.add(detail).unwrap();
        }

        assert_eq!(totals, CategoryTotals::collate(&details).unwrap());
        assert_eq!(totals.get("EATING_OUT"), Some(dec("-13.00")));

        let categories: Vec<_> = totals.iter().map(|(category, _)| category).collect();
        assert_eq!(categories, ["EATING_OUT", "INCOME"]);
    }

    #[test]
    fn test_category_overflow() {
        let details = [
            detail("1", Some("SAVING")),
            max_detail(Some("SAVING")),
            max_detail(Some("SAVING")),
        ];
        let err = CategoryTotals::collate(&details).unwrap_err();
        assert_eq!(err, TotalsError::Overflow("SAVING".to_string()));
        assert_eq!(err.to_string(), "Total for category `SAVING` overflowed");

        // The failed addition leaves the running total as it was.
        let mut totals = CategoryTotals::new();
        totals.add(&max_detail(None)).unwrap();
        assert!(totals.add(&max_detail(None)).is_err());
        assert_eq!(totals.get(UNKNOWN_CATEGORY), Some(Decimal::MAX));

        // Cancelling amounts within range are fine.
        let details = [max_detail(Some("A")), detail("-1", Some("A"))];
        let totals = CategoryTotals::collate(&details).unwrap();
        assert_eq!(totals.get("A"), Some(Decimal::MAX - Decimal::ONE));
    }

    #[test]
    fn test_grand_total_overflow() {
        let details = [max_detail(Some("A")), max_detail(Some("B"))];
        let totals = CategoryTotals::collate(&details).unwrap();

        assert_eq!(totals.get("A"), Some(Decimal::MAX));
        assert_eq!(totals.get("B"), Some(Decimal::MAX));
        assert_eq!(totals.total(), None);

        let table = totals.to_string();
        assert!(table.contains(&Decimal::MAX.to_string()));
        assert!(table.ends_with("overflow\n"));
    }

    #[test]
    fn test_display() {
        let details = [
            detail("10.00", Some("Groceries")),
            detail("5.50", Some("Groceries")),
            detail("3.25", None),
        ];
        let totals = CategoryTotals::collate(&details).unwrap();

        let expected = "\
Category   Amount
Groceries   15.50
UNKNOWN      3.25
-----------------
Total       18.75
";
        assert_eq!(totals.to_string(), expected);
    }

    #[test]
    #[traced_test]
    fn prop_test_totals_are_exact_sums() {
        arbtest(|u| {
            let details = generate_details(u)?;
            let totals = CategoryTotals::collate(&details).unwrap();

            for (category, total) in totals.iter() {
                let expected: Decimal = details
                    .iter()
                    .filter(|detail| effective_category(detail) == category)
                    .map(|detail| detail.amount)
                    .sum();
                assert_eq!(total, expected);
            }

            // Exactly the categories present in the input.
            let mut categories = details.iter().map(effective_category).collect::<Vec<_>>();
            categories.sort_unstable();
            categories.dedup();
            let keys = totals.iter().map(|(category, _)| category).collect::<Vec<_>>();
            assert_eq!(keys, categories);

            let sum: Decimal = details.iter().map(|detail| detail.amount).sum();
            assert_eq!(totals.total(), Some(sum));

            Ok(())
        });
    }

    #[test]
    #[traced_test]
    fn prop_test_totals_are_order_independent() {
        arbtest(|u| {
            let details = generate_details(u)?;

            // Fisher-Yates shuffle driven by the fuzzer input.
            let mut shuffled = details.clone();
            for i in (1..shuffled.len()).rev() {
                let j = u.int_in_range(0..=i)?;
                shuffled.swap(i, j);
            }

            let reversed = CategoryTotals::collate(details.iter().rev()).unwrap();
            let totals = CategoryTotals::collate(&details).unwrap();
            assert_eq!(CategoryTotals::collate(&shuffled).unwrap(), totals);
            assert_eq!(reversed, totals);

            Ok(())
        });
    }
}
