use crate::error::RejectReason;
use crate::models::{StructuredSignal, TradeEvent};
use crate::parsing::extractors;
use crate::parsing::normalizer::normalize;

/// Turn raw alert text into a structured signal, or reject it with a reason.
/// Symbol and direction are mandatory; everything else is optional. Pure —
/// no side effects, the same text always parses the same way.
pub fn parse_signal(raw_text: &str) -> Result<StructuredSignal, RejectReason> {
    let text = normalize(raw_text);
    if text.is_empty() {
        return Err(RejectReason::UnrecognizedFormat);
    }

    let (symbol, notation) = extractors::extract_symbol(&text).ok_or(RejectReason::NoSymbol)?;
    let (direction, cue) = extractors::extract_direction(&text).ok_or(RejectReason::NoDirection)?;

    let event = extractors::extract_event(&text);
    let entry = extractors::extract_entry(&text);
    let stop_loss = extractors::extract_stop_loss(&text);
    let annotation = extractors::extract_annotation(&text);

    // Numbers in a fill report ("Target 2 hit at 115") are fills, not plan
    // revisions, so target extraction is skipped for those messages.
    let targets = match event {
        Some(TradeEvent::TargetReached | TradeEvent::StopTriggered | TradeEvent::PositionClosed) => Vec::new(),
        _ => extractors::extract_targets(&text),
    };

    Ok(StructuredSignal {
        symbol,
        direction,
        entry,
        targets,
        stop_loss,
        annotation,
        event,
        source_format: format!("{}/{}", notation, cue),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, EntryZone};

    #[test]
    fn full_english_template() {
        let signal = parse_signal("🚀 #BTCUSDT LONG\nEntry: 42000 - 42500\nTargets 🎯 43000 44000 45000\nSL: 41000\nLeverage: 10x")
            .unwrap();
        assert_eq!(signal.symbol, "BTCUSDT");
        assert_eq!(signal.direction, Direction::Long);
        assert_eq!(signal.entry, Some(EntryZone::range(42000.0, 42500.0)));
        assert_eq!(signal.targets, vec![43000.0, 44000.0, 45000.0]);
        assert_eq!(signal.stop_loss, Some(41000.0));
        assert_eq!(signal.annotation.as_deref(), Some("Leverage: 10x"));
        assert!(signal.event.is_none());
        assert_eq!(signal.source_format, "hashtag/word");
    }

    #[test]
    fn swedish_template() {
        let signal = parse_signal("LÅNG BTC/USDT Ingång 42000 Mål 43000 44000 Stopp 41000").unwrap();
        assert_eq!(signal.symbol, "BTCUSDT");
        assert_eq!(signal.direction, Direction::Long);
        assert_eq!(signal.entry, Some(EntryZone::single(42000.0)));
        assert_eq!(signal.targets, vec![43000.0, 44000.0]);
        assert_eq!(signal.stop_loss, Some(41000.0));
    }

    #[test]
    fn missing_symbol_rejected() {
        assert_eq!(parse_signal("LONG now! Entry 100"), Err(RejectReason::NoSymbol));
    }

    #[test]
    fn missing_direction_rejected() {
        assert_eq!(parse_signal("#BTCUSDT Entry 42000"), Err(RejectReason::NoDirection));
    }

    #[test]
    fn blank_message_rejected() {
        assert_eq!(parse_signal("  \n\t "), Err(RejectReason::UnrecognizedFormat));
    }

    #[test]
    fn direction_tie_break_word_wins() {
        let signal = parse_signal("#ETHUSDT SHORT 🚀 Entry 2200").unwrap();
        assert_eq!(signal.direction, Direction::Short);
        assert!(signal.source_format.ends_with("/word"));
    }

    #[test]
    fn fill_report_does_not_revise_targets() {
        let signal = parse_signal("#BTCUSDT LONG Target 2 hit at 44000 ✅").unwrap();
        assert_eq!(signal.event, Some(crate::models::TradeEvent::TargetReached));
        assert!(signal.targets.is_empty());
    }

    #[test]
    fn status_only_detection() {
        let status = parse_signal("#BTCUSDT LONG stopped out ❌").unwrap();
        assert!(status.is_status_only());
        let plan = parse_signal("#BTCUSDT LONG Entry 42000 SL 41000").unwrap();
        assert!(!plan.is_status_only());
    }
}
