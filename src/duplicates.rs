/// Collect the values that occur more than once in `values`.
///
/// Each duplicated value is reported once, in the order its first repeat is
/// met. Only `PartialEq` is required so float collections work too; the scan
/// is quadratic, which is fine for field-sized collections.
pub fn find_duplicates<'a, T, I>(values: I) -> Vec<&'a T>
where
    T: PartialEq + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen: Vec<&'a T> = Vec::new();
    let mut duplicates: Vec<&'a T> = Vec::new();
    for value in values {
        if seen.iter().any(|s| *s == value) {
            if !duplicates.iter().any(|d| *d == value) {
                duplicates.push(value);
            }
        } else {
            seen.push(value);
        }
    }
    duplicates
}
