//! DOM selection APIs count UTF-16 code units; the core counts characters.

/// Character offset of a UTF-16 offset into `text`. An offset inside a
/// surrogate pair rounds down.
pub fn utf16_to_char(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, c) in text.chars().enumerate() {
        units += c.len_utf16();
        if units > utf16_offset {
            return index;
        }
    }
    text.chars().count()
}

/// UTF-16 offset of a character offset into `text`.
pub fn char_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_identity() {
        assert_eq!(utf16_to_char("hello", 3), 3);
        assert_eq!(char_to_utf16("hello", 3), 3);
    }

    #[test]
    fn test_surrogate_pairs() {
        let text = "a😀b";
        assert_eq!(char_to_utf16(text, 2), 3);
        assert_eq!(utf16_to_char(text, 3), 2);
        assert_eq!(utf16_to_char(text, 2), 1);
        assert_eq!(utf16_to_char(text, 99), 3);
    }
}
