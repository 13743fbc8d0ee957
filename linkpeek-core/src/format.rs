//! Small text helpers for rendering tooltips.

/// Inserts a comma every `group` digits, counting from the right.
///
/// ```rust
/// use linkpeek_core::format::insert_commas;
///
/// assert_eq!(insert_commas("1234567", 3), "1,234,567");
/// ```
pub fn insert_commas(digits: &str, group: usize) -> String {
    if group == 0 {
        return digits.to_string();
    }

    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / group);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % group == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", 3, ""; "empty")]
    #[test_case("7", 3, "7"; "single digit")]
    #[test_case("123", 3, "123"; "exactly one group")]
    #[test_case("1234", 3, "1,234"; "one comma")]
    #[test_case("123456", 3, "123,456"; "two full groups")]
    #[test_case("1234567890", 3, "1,234,567,890"; "billions")]
    #[test_case("12345", 2, "1,23,45"; "group of two")]
    #[test_case("12345", 0, "12345"; "zero group is identity")]
    fn test_insert_commas(input: &str, group: usize, expected: &str) {
        assert_eq!(insert_commas(input, group), expected);
    }
}
