//! Mobile network operator detection for Kenyan numbers
//!
//! Numbers are matched against fixed numbering-plan patterns in priority order
//! Safaricom, Airtel, Telkom, Equitel; the first match wins. Airtime lookups
//! only consider the first three.

use regex::Regex;
use std::sync::LazyLock;

/// Returned by [`classify`] when no carrier matches
pub const NO_CARRIER: &str = "0";

// Optional +254 / 254 / 0 prefix followed by a 9-digit subscriber number.
static SAFARICOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?254|0)?(?:7(?:[0-2]\d|4[0-689]|5[7-9]|6[89]|9\d)|11[0-5])\d{6}$")
        .expect("invalid Safaricom pattern")
});

static AIRTEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?254|0)?(?:7(?:3\d|5[0-6]|8\d)|10[0-2])\d{6}$")
        .expect("invalid Airtel pattern")
});

static TELKOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?254|0)?77\d{7}$").expect("invalid Telkom pattern")
});

static EQUITEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?254|0)?76[3-6]\d{6}$").expect("invalid Equitel pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Carrier {
    Safaricom,
    Airtel,
    Telkom,
    Equitel,
}

impl Carrier {
    /// Carriers checked for payment lookups, in priority order
    pub const PAYMENT_ORDER: [Carrier; 4] = [
        Carrier::Safaricom,
        Carrier::Airtel,
        Carrier::Telkom,
        Carrier::Equitel,
    ];

    /// Carriers checked for airtime lookups, in priority order
    pub const AIRTIME_ORDER: [Carrier; 3] = [Carrier::Safaricom, Carrier::Airtel, Carrier::Telkom];

    fn pattern(&self) -> &'static Regex {
        match self {
            Carrier::Safaricom => &SAFARICOM,
            Carrier::Airtel => &AIRTEL,
            Carrier::Telkom => &TELKOM,
            Carrier::Equitel => &EQUITEL,
        }
    }

    pub fn matches(&self, number: &str) -> bool {
        self.pattern().is_match(number.trim())
    }

    /// First carrier whose pattern matches `number`.
    pub fn detect(number: &str, airtime: bool) -> Option<Carrier> {
        let order: &[Carrier] = if airtime {
            &Self::AIRTIME_ORDER
        } else {
            &Self::PAYMENT_ORDER
        };
        order.iter().copied().find(|carrier| carrier.matches(number))
    }

    /// Provider code for this carrier, or `None` when it takes no part in the lookup
    pub fn code(&self, airtime: bool) -> Option<&'static str> {
        match (self, airtime) {
            (Carrier::Safaricom, false) => Some("MPESA"),
            (Carrier::Airtel, false) => Some("AIRTEL"),
            (Carrier::Telkom, false) => Some("TKASH"),
            (Carrier::Equitel, false) => Some("EQUITEL"),
            (Carrier::Safaricom, true) => Some("SAFARICOM"),
            (Carrier::Airtel, true) => Some("AIRTEL_AIRTIME"),
            (Carrier::Telkom, true) => Some("TELKOM"),
            (Carrier::Equitel, true) => None,
        }
    }
}

/// Carrier code for `number`, or [`NO_CARRIER`] when nothing matches.
pub fn classify(number: &str, airtime: bool) -> &'static str {
    Carrier::detect(number, airtime)
        .and_then(|carrier| carrier.code(airtime))
        .unwrap_or(NO_CARRIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_codes() {
        assert_eq!(classify("0712345678", false), "MPESA");
        assert_eq!(classify("0110345678", false), "MPESA");
        assert_eq!(classify("0733123456", false), "AIRTEL");
        assert_eq!(classify("0100123456", false), "AIRTEL");
        assert_eq!(classify("0771123456", false), "TKASH");
        assert_eq!(classify("0763123456", false), "EQUITEL");
    }

    #[test]
    fn test_airtime_codes() {
        assert_eq!(classify("0712345678", true), "SAFARICOM");
        assert_eq!(classify("0733123456", true), "AIRTEL_AIRTIME");
        assert_eq!(classify("0771123456", true), "TELKOM");
    }

    #[test]
    fn test_equitel_excluded_from_airtime() {
        assert_eq!(Carrier::detect("0763123456", false), Some(Carrier::Equitel));
        assert_eq!(Carrier::detect("0763123456", true), None);
        assert_eq!(classify("0763123456", true), NO_CARRIER);
    }

    #[test]
    fn test_unrecognized_numbers() {
        for number in ["0912345678", "071234567", "07123456789", "", "not a number"] {
            assert_eq!(classify(number, false), NO_CARRIER, "{number}");
            assert_eq!(classify(number, true), NO_CARRIER, "{number}");
        }
    }

    #[test]
    fn test_prefix_variants() {
        assert_eq!(classify("254712345678", false), "MPESA");
        assert_eq!(classify("+254712345678", false), "MPESA");
        assert_eq!(classify("712345678", false), "MPESA");
        assert_eq!(classify(" 0712345678 ", false), "MPESA");
    }

    #[test]
    fn test_patterns_do_not_overlap() {
        for number in ["0712345678", "0733123456", "0771123456", "0763123456", "0768123456"] {
            let matching = Carrier::PAYMENT_ORDER
                .iter()
                .filter(|carrier| carrier.matches(number))
                .count();
            assert_eq!(matching, 1, "{number}");
        }
    }

    #[test]
    fn test_safaricom_074x_and_076x_boundaries() {
        assert_eq!(classify("0748123456", false), "MPESA");
        assert_eq!(classify("0749123456", false), "MPESA");
        assert_eq!(classify("0747123456", false), NO_CARRIER);
        assert_eq!(classify("0760123456", false), NO_CARRIER);
        assert_eq!(classify("0767123456", false), NO_CARRIER);
        assert_eq!(classify("0769123456", false), "MPESA");
    }

    #[test]
    fn test_equitel_code_only_for_payments() {
        assert_eq!(Carrier::Equitel.code(false), Some("EQUITEL"));
        assert_eq!(Carrier::Equitel.code(true), None);
    }
}
