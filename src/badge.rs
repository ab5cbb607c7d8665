// Status badges shown next to bookings, payments and listings

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
            Tone::Info => "info",
            Tone::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: Cow<'static, str>,
    pub tone: Tone,
}

pub struct StatusBadge;

impl StatusBadge {
    // None when there is no status to show. Unknown statuses are displayed as sent.
    pub fn for_status(status: Option<&str>) -> Option<Badge> {
        let raw = status.map(str::trim).filter(|s| !s.is_empty())?;

        let known = match raw.to_ascii_lowercase().as_str() {
            "pending" => Some(("En attente", Tone::Warning)),
            "confirmed" => Some(("Confirmée", Tone::Success)),
            "cancelled" | "canceled" => Some(("Annulée", Tone::Danger)),
            "completed" => Some(("Terminée", Tone::Info)),
            "paid" => Some(("Payé", Tone::Success)),
            "unpaid" => Some(("Non payé", Tone::Warning)),
            "processing" => Some(("En cours", Tone::Info)),
            "failed" => Some(("Échoué", Tone::Danger)),
            "refunded" => Some(("Remboursé", Tone::Info)),
            "active" => Some(("Actif", Tone::Success)),
            "inactive" => Some(("Inactif", Tone::Neutral)),
            "suspended" => Some(("Suspendu", Tone::Danger)),
            _ => None,
        };

        Some(match known {
            Some((label, tone)) => Badge {
                label: Cow::Borrowed(label),
                tone,
            },
            None => Badge {
                label: Cow::Owned(raw.to_string()),
                tone: Tone::Neutral,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None ; "missing status")]
    #[test_case(Some("") ; "empty status")]
    #[test_case(Some("   ") ; "blank status")]
    fn test_no_status_renders_nothing(status: Option<&str>) {
        assert_eq!(StatusBadge::for_status(status), None);
    }

    #[test_case("confirmed", "Confirmée", Tone::Success)]
    #[test_case("PENDING", "En attente", Tone::Warning)]
    #[test_case("canceled", "Annulée", Tone::Danger)]
    #[test_case("refunded", "Remboursé", Tone::Info)]
    fn test_known_status(status: &str, label: &str, tone: Tone) {
        let badge = StatusBadge::for_status(Some(status)).unwrap();
        assert_eq!(badge.label, label);
        assert_eq!(badge.tone, tone);
    }

    #[test]
    fn test_unknown_status_shown_verbatim() {
        let badge = StatusBadge::for_status(Some("on_hold")).unwrap();
        assert_eq!(badge.label, "on_hold");
        assert_eq!(badge.tone.as_str(), "neutral");
    }
}
