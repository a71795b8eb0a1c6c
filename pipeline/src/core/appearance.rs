//! Stage color and icon tokens resolved into closed sets
//!
//! Unknown tokens resolve to `None` and render nothing.

use std::fmt;

use serde::{Serialize, Serializer};

/// Named palette colors accepted as stage color tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Slate,
    Gray,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

const PALETTE: &[(&str, PaletteColor, (u8, u8, u8))] = &[
    ("slate", PaletteColor::Slate, (0x64, 0x74, 0x8b)),
    ("gray", PaletteColor::Gray, (0x6b, 0x72, 0x80)),
    ("red", PaletteColor::Red, (0xef, 0x44, 0x44)),
    ("orange", PaletteColor::Orange, (0xf9, 0x73, 0x16)),
    ("amber", PaletteColor::Amber, (0xf5, 0x9e, 0x0b)),
    ("yellow", PaletteColor::Yellow, (0xea, 0xb3, 0x08)),
    ("lime", PaletteColor::Lime, (0x84, 0xcc, 0x16)),
    ("green", PaletteColor::Green, (0x22, 0xc5, 0x5e)),
    ("emerald", PaletteColor::Emerald, (0x10, 0xb9, 0x81)),
    ("teal", PaletteColor::Teal, (0x14, 0xb8, 0xa6)),
    ("cyan", PaletteColor::Cyan, (0x06, 0xb6, 0xd4)),
    ("sky", PaletteColor::Sky, (0x0e, 0xa5, 0xe9)),
    ("blue", PaletteColor::Blue, (0x3b, 0x82, 0xf6)),
    ("indigo", PaletteColor::Indigo, (0x63, 0x66, 0xf1)),
    ("violet", PaletteColor::Violet, (0x8b, 0x5c, 0xf6)),
    ("purple", PaletteColor::Purple, (0xa8, 0x55, 0xf7)),
    ("fuchsia", PaletteColor::Fuchsia, (0xd9, 0x46, 0xef)),
    ("pink", PaletteColor::Pink, (0xec, 0x48, 0x99)),
    ("rose", PaletteColor::Rose, (0xf4, 0x3f, 0x5e)),
];

impl PaletteColor {
    fn entry(&self) -> &'static (&'static str, PaletteColor, (u8, u8, u8)) {
        // every variant has a row
        PALETTE.iter().find(|(_, color, _)| color == self).unwrap_or(&PALETTE[0])
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        self.entry().2
    }
}

/// Resolved stage color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageColor {
    Rgb(u8, u8, u8),
    Named(PaletteColor),
}

impl StageColor {
    /// Accepts `#rgb`, `#rrggbb` and palette names (optionally `bg-`/`text-`
    /// prefixed and `-500` style suffixed)
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        if let Some(hex) = token.strip_prefix('#') {
            return parse_hex(hex).map(|(r, g, b)| StageColor::Rgb(r, g, b));
        }

        let bare = token
            .strip_prefix("bg-")
            .or_else(|| token.strip_prefix("text-"))
            .unwrap_or(&token);
        let name = bare.split('-').next().unwrap_or(bare);

        PALETTE
            .iter()
            .find(|(palette_name, _, _)| *palette_name == name)
            .map(|(_, color, _)| StageColor::Named(*color))
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            StageColor::Rgb(r, g, b) => (*r, *g, *b),
            StageColor::Named(color) => color.rgb(),
        }
    }

    pub fn hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for StageColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

/// Icons a stage may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageIcon {
    Target,
    Phone,
    Mail,
    Users,
    Handshake,
    FileText,
    Briefcase,
    DollarSign,
    Calendar,
    Star,
    Flag,
    Trophy,
    CheckCircle,
    XCircle,
    Clock,
}

const ICONS: &[(&str, StageIcon, &str)] = &[
    ("target", StageIcon::Target, "◎"),
    ("phone", StageIcon::Phone, "☎"),
    ("mail", StageIcon::Mail, "✉"),
    ("users", StageIcon::Users, "👥"),
    ("handshake", StageIcon::Handshake, "🤝"),
    ("file-text", StageIcon::FileText, "📄"),
    ("briefcase", StageIcon::Briefcase, "💼"),
    ("dollar-sign", StageIcon::DollarSign, "$"),
    ("calendar", StageIcon::Calendar, "📅"),
    ("star", StageIcon::Star, "★"),
    ("flag", StageIcon::Flag, "⚑"),
    ("trophy", StageIcon::Trophy, "🏆"),
    ("check-circle", StageIcon::CheckCircle, "✔"),
    ("x-circle", StageIcon::XCircle, "✖"),
    ("clock", StageIcon::Clock, "⏱"),
];

impl StageIcon {
    /// Icon names, optionally `lucide:` prefixed; camel and snake case accepted
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim();
        let name = token.strip_prefix("lucide:").unwrap_or(token);
        let normalized = to_kebab(name);

        ICONS
            .iter()
            .find(|(icon_name, _, _)| *icon_name == normalized)
            .map(|(_, icon, _)| *icon)
    }

    fn entry(&self) -> &'static (&'static str, StageIcon, &'static str) {
        ICONS.iter().find(|(_, icon, _)| icon == self).unwrap_or(&ICONS[0])
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    /// Terminal glyph
    pub fn glyph(&self) -> &'static str {
        self.entry().2
    }
}

impl fmt::Display for StageIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for StageIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c == '_' || c == ' ' {
            out.push('-');
        } else if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
