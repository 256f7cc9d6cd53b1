use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Direction, EntryZone, TradeEvent};

/// One recognized symbol notation. Patterns are tried in declaration order;
/// the first hit wins. All capture groups are concatenated and uppercased to
/// form the ticker, so `BTC/USDT`, `#BTCUSDT` and `BTCUSDT.P` all normalize
/// to `BTCUSDT`.
struct SymbolPattern {
    re: Regex,
    tag: &'static str,
}

/// One direction cue. Lower priority tiers are evaluated first, so an
/// explicit word always beats a decorative emoji of the opposite polarity.
/// Within a tier the earliest match in the text wins. Compound cues only
/// count when a hash-tag marker appears somewhere in the message.
struct DirectionCue {
    re: Regex,
    direction: Direction,
    priority: u8,
    needs_hashtag: bool,
    tag: &'static str,
}

struct EventCue {
    re: Regex,
    event: TradeEvent,
}

lazy_static! {
    static ref SYMBOL_PATTERNS: Vec<SymbolPattern> = vec![
        SymbolPattern {
            re: Regex::new(r"(?i)\b([A-Z0-9]{2,10})\s*/\s*(USDT|USDC|BUSD|USD|BTC|ETH)\b").unwrap(),
            tag: "slash-pair",
        },
        SymbolPattern {
            re: Regex::new(r"#([A-Za-z0-9]{2,15})\b").unwrap(),
            tag: "hashtag",
        },
        SymbolPattern {
            re: Regex::new(r"(?i)\b([A-Z0-9]{4,15})\.P(?:ERP)?\b").unwrap(),
            tag: "perp",
        },
        SymbolPattern {
            re: Regex::new(r"\b([A-Z0-9]{1,10}(?:USDT|USDC|BUSD))\b").unwrap(),
            tag: "bare-pair",
        },
    ];

    static ref DIRECTION_CUES: Vec<DirectionCue> = vec![
        DirectionCue {
            re: Regex::new(r"(?i)\b(?:long|lång|buy|köp|compra|largo)\b").unwrap(),
            direction: Direction::Long,
            priority: 0,
            needs_hashtag: false,
            tag: "word",
        },
        DirectionCue {
            re: Regex::new(r"(?i)\b(?:short|kort|sell|sälj|venta|corto)\b").unwrap(),
            direction: Direction::Short,
            priority: 0,
            needs_hashtag: false,
            tag: "word",
        },
        DirectionCue {
            re: Regex::new(r"🟢|📈|🚀|⬆️|⬆|🔼").unwrap(),
            direction: Direction::Long,
            priority: 1,
            needs_hashtag: false,
            tag: "emoji",
        },
        DirectionCue {
            re: Regex::new(r"🔴|📉|🐻|⬇️|⬇|🔽").unwrap(),
            direction: Direction::Short,
            priority: 1,
            needs_hashtag: false,
            tag: "emoji",
        },
        DirectionCue {
            re: Regex::new(r"(?i)\b(?:bullish|bull|alcista)\b").unwrap(),
            direction: Direction::Long,
            priority: 2,
            needs_hashtag: true,
            tag: "compound",
        },
        DirectionCue {
            re: Regex::new(r"(?i)\b(?:bearish|bear|bajista)\b").unwrap(),
            direction: Direction::Short,
            priority: 2,
            needs_hashtag: true,
            tag: "compound",
        },
    ];

    static ref ENTRY_RE: Regex = Regex::new(
        r"(?i)\b(?:entry|entrada|entré|ingång|einstieg)\b\D{0,12}?(\d+(?:\.\d+)?)(?:(?:\s*[-–—/]\s*|\s+)(\d+(?:\.\d+)?))?"
    )
    .unwrap();

    static ref TARGET_LABEL_RE: Regex =
        Regex::new(r"(?i)\btargets?\b|\btake[\s-]?profits?\b|\btps?\b|\bobjetivos?\b|\bmål\b|🎯").unwrap();

    // Where a target number sequence ends: the next labeled field.
    static ref FIELD_BOUNDARY_RE: Regex = Regex::new(
        r"(?i)\b(?:entry|entrada|ingång|stop[\s-]?loss|sl|stopp|stop|risk|leverage|lev|timeframe|tf)\b"
    )
    .unwrap();

    static ref STOP_RE: Regex = Regex::new(
        r"(?i)(?:\bstop[\s-]?loss\b|\bsl\b|\bstopp\b|\bstop\b)\D{0,12}?(\d+(?:\.\d+)?)"
    )
    .unwrap();

    static ref ANNOTATION_RE: Regex = Regex::new(
        r"(?i)\b(?:risk|leverage|lev|timeframe|tf)\b[:=\s]*\S+(?:\s+\S+)?"
    )
    .unwrap();

    static ref NUM_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();

    static ref EVENT_CUES: Vec<EventCue> = vec![
        EventCue {
            re: Regex::new(
                r"(?i)\ball\s+targets?\s+(?:hit|reached|done)\b|\b(?:position|trade)\s+closed\b|\bclosed?\s+(?:the\s+)?(?:trade|position)\b|\bclosed\b|\bcerrado\b|\bstängd\b"
            )
            .unwrap(),
            event: TradeEvent::PositionClosed,
        },
        EventCue {
            re: Regex::new(
                r"(?i)\bstop[\s-]?loss\s+(?:hit|triggered|reached)\b|\bstopped\s+out\b|\b(?:sl|stop)\s+hit\b|\bstoppad\b"
            )
            .unwrap(),
            event: TradeEvent::StopTriggered,
        },
        EventCue {
            re: Regex::new(
                r"(?i)\b(?:target|tp|mål|objetivo)\s*\d*\s+(?:hit|reached|done|filled|träffat|alcanzado)\b|✅"
            )
            .unwrap(),
            event: TradeEvent::TargetReached,
        },
        EventCue {
            re: Regex::new(
                r"(?i)\bentry\s+(?:filled|reached|hit)\b|\bposition\s+open(?:ed)?\b|\bopened\b|\bentrada\s+alcanzada\b|\böppnad\b|\bfilled\b"
            )
            .unwrap(),
            event: TradeEvent::PositionOpened,
        },
    ];
}

/// First matching notation wins. Returns the normalized ticker and the
/// notation tag.
pub fn extract_symbol(text: &str) -> Option<(String, &'static str)> {
    for pattern in SYMBOL_PATTERNS.iter() {
        if let Some(caps) = pattern.re.captures(text) {
            let mut symbol = String::new();
            for group in caps.iter().skip(1).flatten() {
                symbol.push_str(group.as_str());
            }
            if !symbol.is_empty() {
                return Some((symbol.to_uppercase(), pattern.tag));
            }
        }
    }
    None
}

/// Evaluate cue tiers in priority order; within a tier the earliest match in
/// the text wins. Returns the direction and the cue tag that decided it.
pub fn extract_direction(text: &str) -> Option<(Direction, &'static str)> {
    let has_hashtag = text.contains('#');
    for priority in 0..=2u8 {
        let mut best: Option<(usize, Direction, &'static str)> = None;
        for cue in DIRECTION_CUES.iter().filter(|c| c.priority == priority) {
            if cue.needs_hashtag && !has_hashtag {
                continue;
            }
            if let Some(m) = cue.re.find(text) {
                if best.map_or(true, |(start, _, _)| m.start() < start) {
                    best = Some((m.start(), cue.direction, cue.tag));
                }
            }
        }
        if let Some((_, direction, tag)) = best {
            return Some((direction, tag));
        }
    }
    None
}

/// One number after the label is a single entry price, two numbers separated
/// by a dash or whitespace form a range.
pub fn extract_entry(text: &str) -> Option<EntryZone> {
    let caps = ENTRY_RE.captures(text)?;
    let first: f64 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) {
        Some(second) => Some(EntryZone::range(first, second)),
        None => Some(EntryZone::single(first)),
    }
}

/// All decimal numbers between a target label and the next labeled field, in
/// appearance order. The order is never changed.
pub fn extract_targets(text: &str) -> Vec<f64> {
    let Some(label) = TARGET_LABEL_RE.find(text) else {
        return Vec::new();
    };
    let tail = &text[label.end()..];
    let end = FIELD_BOUNDARY_RE.find(tail).map_or(tail.len(), |b| b.start());
    NUM_RE
        .find_iter(&tail[..end])
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Absent stop loss is valid — the field stays unset, never zero.
pub fn extract_stop_loss(text: &str) -> Option<f64> {
    STOP_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Free-text risk / leverage / timeframe note, verbatim.
pub fn extract_annotation(text: &str) -> Option<String> {
    ANNOTATION_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Lifecycle cue, if the message carries one. Cues are checked from most to
/// least specific so "all targets hit" reads as a close, not a target hit.
pub fn extract_event(text: &str) -> Option<TradeEvent> {
    EVENT_CUES
        .iter()
        .find(|cue| cue.re.is_match(text))
        .map(|cue| cue.event)
}
