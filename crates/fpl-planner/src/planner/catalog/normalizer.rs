use crate::planner::domain::AvailabilityState;

/// Substrings in a news note that mark a player as a fitness doubt.
pub(crate) const HAZARD_KEYWORDS: [&str; 5] = ["injury", "doubt", "knock", "illness", "suspend"];

pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Inactive status flags win over the news note; a `d` flag or any hazard keyword in the note
/// marks the player doubtful. A missing flag counts as active.
pub(crate) fn derive_availability(status: Option<&str>, news: Option<&str>) -> AvailabilityState {
    let flag = status
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match flag.as_str() {
        "" | "a" => {}
        "d" => return AvailabilityState::Doubtful,
        _ => return AvailabilityState::Unavailable,
    }

    if news.map(mentions_hazard).unwrap_or(false) {
        AvailabilityState::Doubtful
    } else {
        AvailabilityState::Available
    }
}

fn mentions_hazard(note: &str) -> bool {
    let lowered = note.to_lowercase();
    HAZARD_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_strips_bom() {
        assert_eq!(normalize_name("\u{feff}  Son   Heung-Min "), "son heung-min");
        assert_eq!(normalize_name("Ødegaard"), "ødegaard");
    }

    #[test]
    fn inactive_flag_beats_clean_news() {
        assert_eq!(
            derive_availability(Some("i"), None),
            AvailabilityState::Unavailable
        );
        assert_eq!(
            derive_availability(Some("s"), Some("Suspended for one match")),
            AvailabilityState::Unavailable
        );
    }

    #[test]
    fn hazard_keywords_match_case_insensitively() {
        assert_eq!(
            derive_availability(Some("a"), Some("Minor KNOCK - 75% chance of playing")),
            AvailabilityState::Doubtful
        );
        assert_eq!(
            derive_availability(None, Some("Returned from Illness")),
            AvailabilityState::Doubtful
        );
        assert_eq!(
            derive_availability(Some("d"), Some("")),
            AvailabilityState::Doubtful
        );
    }

    #[test]
    fn clean_active_player_is_available() {
        assert_eq!(
            derive_availability(Some("a"), Some("Joined on loan")),
            AvailabilityState::Available
        );
        assert_eq!(derive_availability(None, None), AvailabilityState::Available);
    }
}
