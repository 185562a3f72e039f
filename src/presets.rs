//! Canned message sets for events the display has been taken to.

/// A named, read-only bundle of slot contents.
///
/// Slot `i` of the preset fills message slot `i`; each inner slice holds
/// that slot's lines in display order.
#[derive(Debug)]
pub struct PresetSet {
    pub name: &'static str,
    pub slots: &'static [&'static [&'static str]],
}

const PLOTTERS: &[&str] = &["FUN WITH FLAT-BED", "PEN PLOTTERS"];
const HONNIBALL: &[&str] = &["JOHN HONNIBALL", "BRISTOL HACKSPACE"];

/// Presets in the order they are offered to the user.
pub static PRESETS: &[PresetSet] = &[
    PresetSet {
        name: "MFUK",
        slots: &[
            &["   MAKER FAIRE UK", "   NEWCASTLE 2013"],
            PLOTTERS,
            HONNIBALL,
            PLOTTERS,
            &["@anachrocomputer", "   #MakerFaireUK"],
        ],
    },
    PresetSet {
        name: "Bristol",
        slots: &[
            &["BRISTOL MINI", "MAKER FAIRE 2014"],
            PLOTTERS,
            HONNIBALL,
            PLOTTERS,
            &["@anachrocomputer", "           #bmmf"],
        ],
    },
    PresetSet {
        name: "LUG",
        slots: &[
            &["  BRISTOL AND BATH", "  LINUX USER GROUP"],
            &["  Bristol and Bath", "  Linux User Group"],
        ],
    },
    PresetSet {
        name: "Derby",
        slots: &[
            &["DERBY MINI", "MAKER FAIRE 2014"],
            PLOTTERS,
            HONNIBALL,
            PLOTTERS,
            &["@anachrocomputer", "         #DMMF14"],
        ],
    },
    PresetSet {
        name: "BV",
        slots: &[
            &["BRISTOL HACKSPACE", "  BV Studios 2014"],
            &["BRISTOL HACKSPACE", "John Honniball"],
            PLOTTERS,
            &["EARTH DEMOLITION", "SIMULATOR GAME"],
            &["@anachrocomputer"],
        ],
    },
    PresetSet {
        name: "Brighton",
        slots: &[
            &["BRIGHTON MINI", "MAKER FAIRE 2014"],
            PLOTTERS,
            HONNIBALL,
            PLOTTERS,
            &["@anachrocomputer", "           #bmmf"],
        ],
    },
    PresetSet {
        name: "Memes",
        slots: &[
            &["   ALL YOUR BASE", "  ARE BELONG TO US"],
            &["   FOUR SEASONS", " TOTAL LANDSCAPING"],
            &["SOON MAY THE", " WELLERMAN COME", "TO BRING US SUGAR", " AND TEA AND RUM"],
            &["        EVER", "        GIVEN"],
            &["NOTES ARE DISPENSED", " BELOW THE SCANNER"],
            &["  UNEXPECTED ITEM", "  IN BAGGING AREA"],
        ],
    },
];

/// Look a preset up by name, ignoring case.
pub fn find_preset(name: &str) -> Option<&'static PresetSet> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Names of every preset, in menu order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
