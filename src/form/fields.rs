use std::fmt;
use std::str::FromStr;

/// Every input the property form collects, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Area,
    Bedrooms,
    Bathrooms,
    Stories,
    Parking,
    FurnishingStatus,
    MainRoad,
    PrefArea,
    GuestRoom,
    Basement,
    HotWaterHeating,
    AirConditioning,
}

/// How a field is entered and checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Positive number without an upper bound
    Area,
    /// Whole number within an inclusive range
    Count { min: u8, max: u8 },
    /// Two-state toggle
    Toggle,
    /// One of the three furnishing strings
    Choice,
}

/// Form sections, as grouped on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Core,
    ParkingAndLocation,
    Amenities,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Core, Section::ParkingAndLocation, Section::Amenities];

    pub fn title(self) -> &'static str {
        match self {
            Section::Core => "Core attributes",
            Section::ParkingAndLocation => "Parking and location",
            Section::Amenities => "Additional features",
        }
    }

    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| f.section() == self)
    }
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Area,
        Field::Bedrooms,
        Field::Bathrooms,
        Field::Stories,
        Field::Parking,
        Field::FurnishingStatus,
        Field::MainRoad,
        Field::PrefArea,
        Field::GuestRoom,
        Field::Basement,
        Field::HotWaterHeating,
        Field::AirConditioning,
    ];

    /// Name used in the service payload and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Field::Area => "area",
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
            Field::Stories => "stories",
            Field::Parking => "parking",
            Field::FurnishingStatus => "furnishingstatus",
            Field::MainRoad => "mainroad",
            Field::PrefArea => "prefarea",
            Field::GuestRoom => "guestroom",
            Field::Basement => "basement",
            Field::HotWaterHeating => "hotwaterheating",
            Field::AirConditioning => "airconditioning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Area => "Area (m²)",
            Field::Bedrooms => "Bedrooms",
            Field::Bathrooms => "Bathrooms",
            Field::Stories => "Stories",
            Field::Parking => "Parking spaces",
            Field::FurnishingStatus => "Furnishing status",
            Field::MainRoad => "Near main road",
            Field::PrefArea => "Preferred location",
            Field::GuestRoom => "Guest room",
            Field::Basement => "Basement",
            Field::HotWaterHeating => "Hot water heating",
            Field::AirConditioning => "Air conditioning",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Area => FieldKind::Area,
            Field::Bedrooms => FieldKind::Count { min: 1, max: 6 },
            Field::Bathrooms => FieldKind::Count { min: 1, max: 4 },
            Field::Stories => FieldKind::Count { min: 1, max: 4 },
            Field::Parking => FieldKind::Count { min: 0, max: 3 },
            Field::FurnishingStatus => FieldKind::Choice,
            Field::MainRoad
            | Field::PrefArea
            | Field::GuestRoom
            | Field::Basement
            | Field::HotWaterHeating
            | Field::AirConditioning => FieldKind::Toggle,
        }
    }

    pub fn section(self) -> Section {
        match self {
            Field::Area | Field::Bedrooms | Field::Bathrooms | Field::Stories => Section::Core,
            Field::Parking | Field::FurnishingStatus => Section::ParkingAndLocation,
            _ => Section::Amenities,
        }
    }

    pub fn is_toggle(self) -> bool {
        self.kind() == FieldKind::Toggle
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| format!("unknown field '{}'", s.trim()))
    }
}
