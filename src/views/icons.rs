#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Icon {
    pub src: &'static str,
    pub alt: &'static str,
}

const fn icon(src: &'static str, alt: &'static str) -> Icon {
    Icon { src, alt }
}

// Order matters: the first entry with a matching keyword wins.
const ICONS: &[(&[&str], Icon)] = &[
    (&["wifi", "internet"], icon("/images/icon_wifi.png", "WiFi")),
    (&["bed", "bedroom"], icon("/images/icon_bed.png", "Bed")),
    (&["bath", "bathroom"], icon("/images/icon_bath.png", "Bath")),
    (&["parking", "موقف"], icon("/images/Free Parking.png", "Parking")),
    (&["pool", "swimming", "مسبح"], icon("/images/Swimming Pool.png", "Pool")),
    (&["gym", "fitness", "جيم"], icon("/images/Gym.png", "Gym")),
    (&["kitchen", "مطبخ"], icon("/images/Kitchen.png", "Kitchen")),
    (&["air", "conditioning", "تكييف"], icon("/images/Air_Conditioning.png", "AC")),
    (&["tv", "television"], icon("/images/TV.png", "TV")),
    (&["breakfast", "إفطار"], icon("/images/Kitchen.png", "Breakfast")),
    (&["pet", "حيوان"], icon("/images/Pet.png", "Pet")),
    (&["washer", "laundry", "غسالة"], icon("/images/Laundry.png", "Laundry")),
    (&["balcony", "شرفة"], icon("/images/Balcony.png", "Balcony")),
    (&["garden", "حديقة"], icon("/images/Garden.png", "Garden")),
];

/// Icon for an amenity name, by case-insensitive keyword.
pub fn for_amenity(name: &str) -> Option<Icon> {
    let name = name.to_lowercase();
    ICONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(_, icon)| *icon)
}
