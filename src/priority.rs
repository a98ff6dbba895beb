//! Priority names as Jira installations commonly ship them, ranked from most
//! to least urgent. Sorting, the tray badge colour and the menu glyphs all go
//! through this one table so they can never disagree.

/// Highest urgency first. An unknown name ranks below everything here.
pub const PRIORITY_ORDER: &[&str] = &[
    "Immediate",
    "Blocker",
    "Highest",
    "1=Must Have",
    "P1",
    "Critical",
    "High",
    "2=Should Have",
    "P2",
    "Major",
    "Medium",
    "3=Could Have",
    "P3",
    "Minor",
    "Low",
    "Trivial",
    "Lowest",
    "Very Low",
    "P4",
];

const PRIORITY_COLORS: &[(&str, [u8; 3])] = &[
    ("Immediate", [0xcc, 0x00, 0x00]),
    ("Blocker", [0xcc, 0x00, 0x00]),
    ("Highest", [0xec, 0x35, 0x36]),
    ("1=Must Have", [0xec, 0x35, 0x36]),
    ("P1", [0xec, 0x35, 0x36]),
    ("Critical", [0xff, 0x00, 0x00]),
    ("High", [0xff, 0x00, 0x00]),
    ("2=Should Have", [0xf2, 0x93, 0x28]),
    ("P2", [0xf6, 0xbc, 0x17]),
    ("Major", [0x00, 0x99, 0x00]),
    ("Medium", [0xff, 0x99, 0x00]),
    ("3=Could Have", [0xf6, 0xbc, 0x17]),
    ("P3", [0xf7, 0xe4, 0x02]),
    ("Minor", [0x00, 0x66, 0x00]),
    ("Low", [0x33, 0xcc, 0x00]),
    ("Trivial", [0x00, 0x33, 0x00]),
    ("Lowest", [0x00, 0x33, 0x00]),
    ("Very Low", [0x00, 0x33, 0x00]),
    ("P4", [0x00, 0xa3, 0xdd]),
];

const PRIORITY_GLYPHS: &[(&str, &str)] = &[
    ("Immediate", "\u{1f534}"),
    ("Blocker", "\u{1f534}"),
    ("Highest", "\u{1f534}"),
    ("1=Must Have", "\u{1f534}"),
    ("P1", "\u{1f534}"),
    ("Critical", "\u{1f7e0}"),
    ("High", "\u{1f7e0}"),
    ("2=Should Have", "\u{1f7e0}"),
    ("P2", "\u{1f7e0}"),
    ("Major", "\u{1f7e1}"),
    ("Medium", "\u{1f7e1}"),
    ("3=Could Have", "\u{1f7e1}"),
    ("P3", "\u{1f7e1}"),
    ("Minor", "\u{1f7e2}"),
    ("Low", "\u{1f7e2}"),
    ("Trivial", "\u{1f535}"),
    ("Lowest", "\u{1f535}"),
    ("Very Low", "\u{1f535}"),
    ("4 = Won\u{2019}t Have", "\u{1f535}"),
    ("P4", "\u{1f535}"),
    ("Undefined", "\u{26aa}"),
    ("Standard", "\u{26aa}"),
];

/// Badge colour when no issue carries a recognised priority.
pub const DEFAULT_BADGE_COLOR: [u8; 3] = [0x00, 0x00, 0xff];

const DEFAULT_GLYPH: &str = "\u{26aa}";

/// Position in [`PRIORITY_ORDER`], `usize::MAX` for names not in the table.
pub fn rank(name: &str) -> usize {
    PRIORITY_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(usize::MAX)
}

/// Badge colour for a priority name, blue for unknown or absent priorities.
pub fn badge_color(name: Option<&str>) -> [u8; 3] {
    name.and_then(|name| {
        PRIORITY_COLORS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, rgb)| *rgb)
    })
    .unwrap_or(DEFAULT_BADGE_COLOR)
}

/// Menu glyph for a priority name. Unknown names get the neutral circle.
pub fn glyph(name: Option<&str>) -> &'static str {
    name.and_then(|name| {
        PRIORITY_GLYPHS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, glyph)| *glyph)
    })
    .unwrap_or(DEFAULT_GLYPH)
}

/// Most urgent priority among `names`, by table position. Names missing from
/// the table are skipped, so a set of only unknown names yields `None`.
pub fn highest<'a, I>(names: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(rank)
        .filter(|rank| *rank != usize::MAX)
        .min()
        .map(|rank| PRIORITY_ORDER[rank])
}
