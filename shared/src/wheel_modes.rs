use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared_wheel_game::{WeightedItem, WheelConfiguration};

const SPIN_DURATION_MS: f64 = 6000.0;
const SPIN_VARIANCE_MS: f64 = 4000.0;

const WIKI: &str = "https://oldschool.runescape.wiki";

struct ItemRow {
    name: &'static str,
    weight: u32,
    images: &'static [&'static str],
    page: &'static str,
}

const fn row(name: &'static str, weight: u32, images: &'static [&'static str], page: &'static str) -> ItemRow {
    ItemRow { name, weight, images, page }
}

// Raids and group bosses
const TEAMS: &[ItemRow] = &[
    row("Chambers of Xeric", 3, &["/images/thumb/Chambers_of_Xeric_logo.png/500px-Chambers_of_Xeric_logo.png?34a98"], "Chambers_of_Xeric"),
    row("Theatre of Blood", 3, &["/images/thumb/Theatre_of_Blood_logo.png/500px-Theatre_of_Blood_logo.png?e6e68"], "Theatre_of_Blood"),
    row("Tombs of Amascut", 3, &["/images/Tombs_of_Amascut.png"], "Tombs_of_Amascut"),
    row("Nex", 2, &["/images/Nex.png"], "Nex"),
    row("The Nightmare", 2, &["/images/The_Nightmare.png"], "The_Nightmare"),
    row("Callisto", 3, &["/images/Callisto.png"], "Callisto"),
    row("Venenatis", 3, &["/images/Venenatis.png"], "Venenatis"),
    row("Vet'ion", 3, &["/images/Vet%27ion.png"], "Vet%27ion"),
    row("Revs", 1, &["/images/thumb/Revenant_maledictus.png/291px-Revenant_maledictus.png?73c48"], "Revenant_Caves"),
    row("Barbarian Assault", 2, &["/images/thumb/Penance_Queen.png/580px-Penance_Queen.png"], "Barbarian_Assault"),
    row("The Hueycoatl", 2, &["/images/The_Hueycoatl.png"], "The_Hueycoatl"),
    row("Scurrius", 1, &["/images/Scurrius.png"], "Scurrius"),
];

// Content that works for two players
const DUOS: &[ItemRow] = &[
    row("Chambers of Xeric", 2, &["/images/thumb/Chambers_of_Xeric_logo.png/500px-Chambers_of_Xeric_logo.png?34a98"], "Chambers_of_Xeric"),
    row("Tombs of Amascut", 2, &["/images/Tombs_of_Amascut.png"], "Tombs_of_Amascut"),
    row("Nex", 1, &["/images/Nex.png"], "Nex"),
    row("The Nightmare", 1, &["/images/The_Nightmare.png"], "The_Nightmare"),
    row("Callisto", 3, &["/images/Callisto.png"], "Callisto"),
    row("Venenatis", 3, &["/images/Venenatis.png"], "Venenatis"),
    row("Vet'ion", 3, &["/images/Vet%27ion.png"], "Vet%27ion"),
    row("The Hueycoatl", 2, &["/images/The_Hueycoatl.png"], "The_Hueycoatl"),
    row("Scurrius", 1, &["/images/Scurrius.png"], "Scurrius"),
    row("Yama", 3, &["/images/thumb/Yama.png/310px-Yama.png"], "Yama"),
    row(
        "Titans",
        5,
        &[
            "/images/thumb/Eldric_the_Ice_King.png/196px-Eldric_the_Ice_King.png",
            "/images/thumb/Branda_the_Fire_Queen.png/188px-Branda_the_Fire_Queen.png?0687c",
        ],
        "Royal_Titans",
    ),
];

// Bosses built for solo play
const SOLOS: &[ItemRow] = &[
    row("Duke Sucellus", 3, &["/images/Duke_Sucellus.png"], "Duke_Sucellus"),
    row("The Leviathan", 3, &["/images/The_Leviathan.png"], "The_Leviathan"),
    row("The Whisperer", 3, &["/images/The_Whisperer.png"], "The_Whisperer"),
    row("Vardorvis", 3, &["/images/Vardorvis.png"], "Vardorvis"),
    row("Giant Mole", 1, &["/images/thumb/Giant_Mole.png/300px-Giant_Mole.png"], "Giant_Mole"),
    row(
        "Barrows",
        1,
        &[
            "/images/thumb/Verac_the_Defiled.png/126px-Verac_the_Defiled.png",
            "/images/thumb/Guthan_the_Infested.png/93px-Guthan_the_Infested.png?33092",
            "/images/thumb/Torag_the_Corrupted.png/145px-Torag_the_Corrupted.png?33092",
            "/images/thumb/Dharok_the_Wretched.png/114px-Dharok_the_Wretched.png?33092",
            "/images/thumb/Karil_the_Tainted.png/169px-Karil_the_Tainted.png?33092",
            "/images/thumb/Ahrim_the_Blighted.png/113px-Ahrim_the_Blighted.png?33092",
        ],
        "Barrows",
    ),
    row(
        "Moons of Peril",
        1,
        &[
            "/images/thumb/Blood_Moon.png/162px-Blood_Moon.png?c3e72",
            "/images/thumb/Eclipse_Moon.png/162px-Eclipse_Moon.png?c3e72",
            "/images/thumb/Blue_Moon.png/174px-Blue_Moon.png?c3e72",
        ],
        "Moons_of_Peril",
    ),
    row(
        "God Wars",
        1,
        &[
            "/images/thumb/Kree%27arra.png/282px-Kree%27arra.png?ba75c",
            "/images/thumb/General_Graardor.png/250px-General_Graardor.png?4dd90",
            "/images/thumb/K%27ril_Tsutsaroth.png/275px-K%27ril_Tsutsaroth.png?73bda",
            "/images/thumb/Commander_Zilyana.png/177px-Commander_Zilyana.png?c5eaa",
        ],
        "God_Wars_Dungeon",
    ),
    row("General Graardor", 1, &["/images/General_Graardor.png"], "General_Graardor"),
    row("Commander Zilyana", 1, &["/images/Commander_Zilyana.png"], "Commander_Zilyana"),
    row("Kree'arra", 1, &["/images/Kree%27arra.png"], "Kree%27arra"),
    row("K'ril Tsutsaroth", 1, &["/images/K%27ril_Tsutsaroth.png"], "K%27ril_Tsutsaroth"),
    row("Doom of Mokhaiotl", 1, &["/images/thumb/Doom_of_Mokhaiotl.png/300px-Doom_of_Mokhaiotl.png?e5edb"], "Doom_of_Mokhaiotl"),
    row("Zulrah", 1, &["/images/thumb/Zulrah_%28serpentine%29.png/280px-Zulrah_%28serpentine%29.png?29a54"], "Zulrah"),
    row("Vorkath", 1, &["/images/thumb/Vorkath.png/380px-Vorkath.png?1ce3f"], "Vorkath"),
    row("Muspah", 1, &["/images/thumb/Phantom_Muspah_%28ranged%29.png/298px-Phantom_Muspah_%28ranged%29.png?9cf6a"], "Phantom_Muspah"),
];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WheelMode {
    #[default]
    Teams,
    Duos,
    Solos,
}

impl WheelMode {
    pub const ALL: [WheelMode; 3] = [WheelMode::Teams, WheelMode::Duos, WheelMode::Solos];

    pub fn label(&self) -> &'static str {
        match self {
            WheelMode::Teams => "teams",
            WheelMode::Duos => "duos",
            WheelMode::Solos => "solos",
        }
    }

    /// Capitalized label used in announcements.
    pub fn title_label(&self) -> &'static str {
        match self {
            WheelMode::Teams => "Teams",
            WheelMode::Duos => "Duos",
            WheelMode::Solos => "Solos",
        }
    }

    fn rows(&self) -> &'static [ItemRow] {
        match self {
            WheelMode::Teams => TEAMS,
            WheelMode::Duos => DUOS,
            WheelMode::Solos => SOLOS,
        }
    }

    pub fn configuration(&self) -> WheelConfiguration {
        let items = self
            .rows()
            .iter()
            .map(|row| WeightedItem {
                name: row.name.to_string(),
                weight: row.weight,
                display_assets: row.images.iter().map(|path| format!("{}{}", WIKI, path)).collect(),
                detail_link: Some(format!("{}/w/{}", WIKI, row.page)),
            })
            .collect();

        WheelConfiguration {
            items,
            spin_duration_ms: SPIN_DURATION_MS,
            spin_duration_variance_ms: SPIN_VARIANCE_MS,
        }
    }
}

impl fmt::Display for WheelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WheelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teams" | "team" => Ok(WheelMode::Teams),
            "duos" => Ok(WheelMode::Duos),
            "solos" => Ok(WheelMode::Solos),
            other => Err(format!("Unknown wheel mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_modes_validate() {
        for mode in WheelMode::ALL {
            let config = mode.configuration();
            assert!(config.validate().is_ok(), "{} failed validation", mode);
            assert_eq!(config.spin_duration_ms, 6000.0);
            assert_eq!(config.spin_duration_variance_ms, 4000.0);
        }
    }

    #[test]
    fn test_mode_labels_round_trip() {
        for mode in WheelMode::ALL {
            assert_eq!(mode.to_string().parse::<WheelMode>(), Ok(mode));
        }
        assert_eq!("Team".parse::<WheelMode>(), Ok(WheelMode::Teams));
        assert!("raids".parse::<WheelMode>().is_err());
        assert_eq!(WheelMode::Duos.title_label(), "Duos");
    }

    #[test]
    fn test_tables() {
        let teams = WheelMode::Teams.configuration();
        assert_eq!(teams.items.len(), 12);
        assert_eq!(teams.total_weight(), 28);

        let duos = WheelMode::Duos.configuration();
        let titans = duos.item("Titans").unwrap();
        assert_eq!(titans.weight, 5);
        assert_eq!(titans.display_assets.len(), 2);
        assert_eq!(titans.detail_link.as_deref(), Some("https://oldschool.runescape.wiki/w/Royal_Titans"));

        let solos = WheelMode::Solos.configuration();
        assert_eq!(solos.item("Barrows").unwrap().display_assets.len(), 6);
        assert!(solos.items.iter().all(|item| !item.display_assets.is_empty()));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&WheelMode::Solos).unwrap(), "\"solos\"");
        let mode: WheelMode = serde_json::from_str("\"duos\"").unwrap();
        assert_eq!(mode, WheelMode::Duos);
    }
}
