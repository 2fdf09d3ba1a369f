/// Trimmed `value`, or `None` when nothing but whitespace is left.
pub fn non_blank<T: AsRef<str> + ?Sized>(value: &T) -> Option<&str> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Case-insensitive comparison that also folds non-ASCII letters.
pub fn eq_ignore_case<T: AsRef<str> + ?Sized, U: AsRef<str> + ?Sized>(left: &T, right: &U) -> bool {
    let (left, right) = (left.as_ref(), right.as_ref());
    left.eq_ignore_ascii_case(right) || left.to_lowercase() == right.to_lowercase()
}
