use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identity and timestamp recorded on a commit as author or committer.
///
/// Canonical text form: `Name <email> <unix-seconds> <+hhmm>`, e.g.
/// `Ada Lovelace <ada@example.com> 1700000000 +0100`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Display name.
    pub name: String,
    /// Email address, without angle brackets.
    pub email: String,
    /// Seconds since the UNIX epoch.
    pub when: i64,
    /// Timezone offset from UTC in minutes.
    pub offset_minutes: i32,
}

impl Signature {
    /// Create a signature with an explicit timestamp.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        when: i64,
        offset_minutes: i32,
    ) -> Result<Self, TypeError> {
        let sig = Self {
            name: name.into(),
            email: email.into(),
            when,
            offset_minutes,
        };
        sig.validate()?;
        Ok(sig)
    }

    /// Create a signature stamped with the current local time.
    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Result<Self, TypeError> {
        let now = Local::now();
        Self::new(
            name,
            email,
            now.timestamp(),
            now.offset().local_minus_utc() / 60,
        )
    }

    /// The timestamp as a timezone-aware datetime, if representable.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        let tz = FixedOffset::east_opt(self.offset_minutes * 60)?;
        tz.timestamp_opt(self.when, 0).single()
    }

    fn validate(&self) -> Result<(), TypeError> {
        let bad = |s: &str| s.contains(['<', '>', '\n', '\0']);
        if bad(&self.name) || bad(&self.email) {
            return Err(TypeError::InvalidSignature(format!(
                "name and email must not contain '<', '>', newlines or NUL: {:?} <{:?}>",
                self.name, self.email
            )));
        }
        if self.name != self.name.trim() || self.email != self.email.trim() {
            return Err(TypeError::InvalidSignature(format!(
                "name and email must not start or end with whitespace: {:?} <{:?}>",
                self.name, self.email
            )));
        }
        if self.offset_minutes.abs() >= 24 * 60 {
            return Err(TypeError::InvalidSignature(format!(
                "timezone offset out of range: {}",
                self.offset_minutes
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let abs = self.offset_minutes.abs();
        write!(
            f,
            "{} <{}> {} {}{:02}{:02}",
            self.name,
            self.email,
            self.when,
            sign,
            abs / 60,
            abs % 60
        )
    }
}

impl FromStr for Signature {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidSignature(format!("{reason}: {s:?}"));

        let open = s.find('<').ok_or_else(|| invalid("missing '<'"))?;
        let close = s.rfind('>').ok_or_else(|| invalid("missing '>'"))?;
        if close < open {
            return Err(invalid("'>' before '<'"));
        }
        let name = s[..open].trim_end();
        let email = &s[open + 1..close];

        let mut rest = s[close + 1..].split_whitespace();
        let when = rest
            .next()
            .and_then(|t| t.parse::<i64>().ok())
            .ok_or_else(|| invalid("missing timestamp"))?;
        let tz = rest.next().ok_or_else(|| invalid("missing timezone"))?;
        if rest.next().is_some() {
            return Err(invalid("trailing data"));
        }

        let (sign, digits) = match tz.as_bytes().first() {
            Some(b'+') => (1, &tz[1..]),
            Some(b'-') => (-1, &tz[1..]),
            _ => return Err(invalid("timezone must start with '+' or '-'")),
        };
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("timezone must be four digits"));
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid("bad timezone"))?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid("bad timezone"))?;

        Self::new(name, email, when, sign * (hours * 60 + minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let sig = Signature::new("Ada", "ada@example.com", 1_700_000_000, 90).unwrap();
        assert_eq!(sig.to_string(), "Ada <ada@example.com> 1700000000 +0130");
    }

    #[test]
    fn negative_offset_display() {
        let sig = Signature::new("Bob", "bob@example.com", 42, -300).unwrap();
        assert_eq!(sig.to_string(), "Bob <bob@example.com> 42 -0500");
    }

    #[test]
    fn parse_inverts_display() {
        let sig = Signature::new("Grace Hopper", "grace@navy.mil", 1_234_567_890, -480).unwrap();
        let parsed: Signature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn rejects_angle_brackets_in_name() {
        let err = Signature::new("a<b", "x@y", 0, 0).unwrap_err();
        assert!(matches!(err, TypeError::InvalidSignature(_)));
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        for name in ["Ada ", " Ada", "Ada\r", "Ada\t"] {
            let err = Signature::new(name, "ada@example.com", 0, 0).unwrap_err();
            assert!(matches!(err, TypeError::InvalidSignature(_)), "{name:?}");
        }
        assert!(Signature::new("Ada", " ada@example.com", 0, 0).is_err());
        assert!(Signature::new("Ada Lovelace", "ada@example.com", 0, 0).is_ok());
    }

    #[test]
    fn rejects_missing_timezone() {
        let err = "Ada <ada@example.com> 1700000000".parse::<Signature>().unwrap_err();
        assert!(matches!(err, TypeError::InvalidSignature(_)));
    }

    #[test]
    fn rejects_malformed_timezone() {
        assert!("Ada <a@b> 1 0100".parse::<Signature>().is_err());
        assert!("Ada <a@b> 1 +1".parse::<Signature>().is_err());
    }

    #[test]
    fn now_has_valid_datetime() {
        let sig = Signature::now("Now", "now@example.com").unwrap();
        let dt = sig.datetime().expect("representable");
        assert_eq!(dt.timestamp(), sig.when);
    }

    #[test]
    fn empty_name_is_allowed() {
        let sig: Signature = "<anon@example.com> 0 +0000".parse().unwrap();
        assert_eq!(sig.name, "");
        assert_eq!(sig.email, "anon@example.com");
    }
}
