/// Collapse raw alert text into a single-line canonical string: control
/// characters become whitespace, whitespace runs collapse to single spaces,
/// leading/trailing whitespace is trimmed. Emoji and punctuation pass through
/// untouched — they carry meaning as format markers.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("  BTC/USDT \t LONG\n\nEntry:  100 "), "BTC/USDT LONG Entry: 100");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(normalize("BTC\u{0}USDT\u{7}LONG"), "BTC USDT LONG");
    }

    #[test]
    fn preserves_emoji_and_punctuation() {
        assert_eq!(normalize("🚀 #BTCUSDT\nLONG!"), "🚀 #BTCUSDT LONG!");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("   \n\t "), "");
    }
}
