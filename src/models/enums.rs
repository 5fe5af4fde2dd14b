use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

/// Macro for small ordinal scales stored as integers (severity, mood).
/// Serialized as the bare number; out-of-range values are rejected.
macro_rules! ordinal_enum {
    ($name:ident { $($variant:ident => $n:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn level(self) -> u8 {
                match self {
                    $(Self::$variant => $n),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_level(level: i64) -> Result<Self, DatabaseError> {
                match level {
                    $($n => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidValue {
                        field: stringify!($name).into(),
                        value: level.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = DatabaseError;

            fn try_from(level: u8) -> Result<Self, Self::Error> {
                Self::from_level(i64::from(level))
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.level()
            }
        }
    };
}

ordinal_enum!(Severity {
    Mild => 1, "Mild",
    Moderate => 2, "Moderate",
    Severe => 3, "Severe",
});

ordinal_enum!(MoodLevel {
    Rough => 1, "Rough",
    Okay => 2, "Okay",
    Good => 3, "Good",
    Great => 4, "Great",
});

impl Severity {
    pub fn is_high(self) -> bool {
        self == Severity::Severe
    }
}

impl MoodLevel {
    /// Good or Great counts as a "good day".
    pub fn is_good(self) -> bool {
        self >= MoodLevel::Good
    }
}

str_enum!(MealType {
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    Snack => "snack",
});

str_enum!(Intensity {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(TimeOfDay {
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
    Night => "night",
});

impl TimeOfDay {
    /// Morning 06-12, afternoon 12-18, evening 18-22, night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn meal_type_round_trip() {
        for (variant, s) in [
            (MealType::Breakfast, "breakfast"),
            (MealType::Lunch, "lunch"),
            (MealType::Dinner, "dinner"),
            (MealType::Snack, "snack"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MealType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_levels_and_labels() {
        assert_eq!(Severity::from_level(1).unwrap(), Severity::Mild);
        assert_eq!(Severity::from_level(3).unwrap().label(), "Severe");
        assert!(Severity::Severe.is_high());
        assert!(!Severity::Moderate.is_high());
    }

    #[test]
    fn severity_out_of_range_rejected() {
        assert!(Severity::from_level(0).is_err());
        assert!(Severity::from_level(4).is_err());
        assert!(Severity::from_level(-1).is_err());
    }

    #[test]
    fn mood_good_days() {
        assert!(MoodLevel::Great.is_good());
        assert!(MoodLevel::Good.is_good());
        assert!(!MoodLevel::Okay.is_good());
        assert!(MoodLevel::from_level(5).is_err());
    }

    #[test]
    fn severity_serializes_as_number() {
        let json = serde_json::to_string(&Severity::Moderate).unwrap();
        assert_eq!(json, "2");
        let parsed: Severity = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Severity::Severe);
        assert!(serde_json::from_str::<Severity>("7").is_err());
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
        assert_eq!(TimeOfDay::Evening.as_str(), "evening");
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(MealType::from_str("brunch").is_err());
        assert!(Intensity::from_str("").is_err());
    }
}
