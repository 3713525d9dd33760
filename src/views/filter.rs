use crate::model::Place;

/// Thresholds offered in the listing's price dropdown.
pub const THRESHOLDS: [u32; 3] = [50, 100, 200];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PriceFilter {
    #[default]
    All,
    AtMost(u32),
}

impl PriceFilter {
    /// Anything that is not one of the offered thresholds means "all".
    pub fn parse(value: Option<&str>) -> PriceFilter {
        value
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|threshold| THRESHOLDS.contains(threshold))
            .map_or(PriceFilter::All, PriceFilter::AtMost)
    }

    /// Keeps the places that pass, in their original order.
    pub fn apply<'a>(&self, places: &'a [Place]) -> Vec<&'a Place> {
        places.iter().filter(|place| self.allows(place)).collect()
    }

    pub fn allows(&self, place: &Place) -> bool {
        match self {
            PriceFilter::All => true,
            PriceFilter::AtMost(threshold) => place.price <= f64::from(*threshold),
        }
    }

    pub fn value(&self) -> String {
        match self {
            PriceFilter::All => "all".to_owned(),
            PriceFilter::AtMost(threshold) => threshold.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The dropdown entries, with the active one marked.
pub fn options(active: PriceFilter) -> Vec<FilterOption> {
    std::iter::once(PriceFilter::All)
        .chain(THRESHOLDS.into_iter().map(PriceFilter::AtMost))
        .map(|filter| FilterOption {
            value: filter.value(),
            label: match filter {
                PriceFilter::All => "All Prices".to_owned(),
                PriceFilter::AtMost(threshold) => format!("Under ${}", threshold),
            },
            selected: filter == active,
        })
        .collect()
}
