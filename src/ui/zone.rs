//! Zone bucketing and per-zone visual themes.

use seat_wire::SeatId;

/// Seats per zone; zone 4 takes everything past the third bucket.
const ZONE_SIZE: i64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    One,
    Two,
    Three,
    Four,
}

/// Fixed look of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTheme {
    pub name: &'static str,
    /// Tailwind classes used by the web front end for the same zone
    pub css: &'static str,
    /// ANSI SGR foreground color
    pub ansi: &'static str,
}

const BLUE: ZoneTheme = ZoneTheme {
    name: "blue",
    css: "border-blue-200 bg-blue-50 text-blue-400 hover:border-blue-500 hover:bg-blue-100",
    ansi: "\x1b[34m",
};

const ORANGE: ZoneTheme = ZoneTheme {
    name: "orange",
    css: "border-orange-200 bg-orange-50 text-orange-400 hover:border-orange-500 hover:bg-orange-100",
    ansi: "\x1b[33m",
};

const RED: ZoneTheme = ZoneTheme {
    name: "red",
    css: "border-red-200 bg-red-50 text-red-400 hover:border-red-500 hover:bg-red-100",
    ansi: "\x1b[31m",
};

const GREEN: ZoneTheme = ZoneTheme {
    name: "green",
    css: "border-green-200 bg-green-50 text-green-400 hover:border-green-500 hover:bg-green-100",
    ansi: "\x1b[32m",
};

impl Zone {
    /// Bucket a seat id: 1-25, 26-50, 51-75, 76+.
    ///
    /// Ids at or below zero land in zone 1. String ids are bucketed by
    /// their numeric value; ids that are not numbers land in zone 4.
    pub fn for_seat(id: &SeatId) -> Self {
        match id.as_number() {
            Some(n) if n <= ZONE_SIZE => Self::One,
            Some(n) if n <= ZONE_SIZE * 2 => Self::Two,
            Some(n) if n <= ZONE_SIZE * 3 => Self::Three,
            _ => Self::Four,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    pub fn theme(self) -> &'static ZoneTheme {
        match self {
            Self::One => &BLUE,
            Self::Two => &ORANGE,
            Self::Three => &RED,
            Self::Four => &GREEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(n: i64) -> Zone {
        Zone::for_seat(&SeatId::Number(n))
    }

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(zone(1), Zone::One);
        assert_eq!(zone(25), Zone::One);
        assert_eq!(zone(26), Zone::Two);
        assert_eq!(zone(50), Zone::Two);
        assert_eq!(zone(51), Zone::Three);
        assert_eq!(zone(75), Zone::Three);
        assert_eq!(zone(76), Zone::Four);
        assert_eq!(zone(100), Zone::Four);
    }

    #[test]
    fn test_zone_themes() {
        assert_eq!(zone(25).theme().name, "blue");
        assert_eq!(zone(26).theme().name, "orange");
        assert_eq!(zone(75).theme().name, "red");
        assert_eq!(zone(76).theme().name, "green");
        assert!(zone(26).theme().css.starts_with("border-orange-200"));
    }

    #[test]
    fn test_zone_edge_ids() {
        assert_eq!(zone(0), Zone::One);
        assert_eq!(zone(-3), Zone::One);
        assert_eq!(Zone::for_seat(&SeatId::Text("30".to_string())), Zone::Two);
        assert_eq!(Zone::for_seat(&SeatId::Text("lobby-a".to_string())), Zone::Four);
    }
}
