use rust_decimal::Decimal;

/// Supplies a common contract for retrieving exact money amounts.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Sums the amounts of any iterator of amounted items.
pub fn sum_amounts<'a, T, I>(items: I) -> Decimal
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Amounted::amount).sum()
}

// Re-export so consumers can build dates without a direct chrono dependency.
pub use chrono;
