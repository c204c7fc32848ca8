use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_NUM_TRAVELERS: u32 = 1;
pub const DEFAULT_DATE_FLEXIBILITY_DAYS: u32 = 0;
pub const MIN_HOTEL_RATING: f64 = 1.0;
pub const MAX_HOTEL_RATING: f64 = 5.0;

const FIELDS: &[&str] = &[
    "origin_airports",
    "destination_cities",
    "start_date",
    "end_date",
    "date_flexibility_days",
    "total_budget_currency",
    "total_budget_amount",
    "num_travelers",
    "trip_type",
    "cabin_preference",
    "hotel_min_rating",
    "hotel_type_preference",
    "avoid_airlines",
    "preferred_airlines",
    "avoid_redeye",
    "max_layovers",
    "notes",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    Business,
    Leisure,
    Mixed,
    Unknown,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Business => "business",
            TripType::Leisure => "leisure",
            TripType::Mixed => "mixed",
            TripType::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => TripType::Business,
            "leisure" => TripType::Leisure,
            "mixed" => TripType::Mixed,
            _ => TripType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CabinPreference {
    Economy,
    PremiumEconomy,
    Business,
    First,
    Unknown,
}

impl CabinPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinPreference::Economy => "economy",
            CabinPreference::PremiumEconomy => "premium_economy",
            CabinPreference::Business => "business",
            CabinPreference::First => "first",
            CabinPreference::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => CabinPreference::Economy,
            "premium_economy" => CabinPreference::PremiumEconomy,
            "business" => CabinPreference::Business,
            "first" => CabinPreference::First,
            _ => CabinPreference::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HotelTypePreference {
    Hotel,
    Airbnb,
    Either,
    Unknown,
}

impl HotelTypePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotelTypePreference::Hotel => "hotel",
            HotelTypePreference::Airbnb => "airbnb",
            HotelTypePreference::Either => "either",
            HotelTypePreference::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotel" => HotelTypePreference::Hotel,
            "airbnb" => HotelTypePreference::Airbnb,
            "either" => HotelTypePreference::Either,
            _ => HotelTypePreference::Unknown,
        }
    }
}

/// Normalized travel intent. Only [`normalize`] builds one from untrusted
/// input, so every value here is already inside its domain.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Intent {
    pub origin_airports: Vec<String>,
    pub destination_cities: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub date_flexibility_days: u32,
    pub total_budget_currency: String,
    pub total_budget_amount: Option<f64>,
    pub num_travelers: u32,
    pub trip_type: TripType,
    pub cabin_preference: CabinPreference,
    pub hotel_min_rating: Option<f64>,
    pub hotel_type_preference: HotelTypePreference,
    pub avoid_airlines: Vec<String>,
    pub preferred_airlines: Vec<String>,
    pub avoid_redeye: bool,
    pub max_layovers: Option<u32>,
    pub notes: String,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            origin_airports: Vec::new(),
            destination_cities: Vec::new(),
            start_date: None,
            end_date: None,
            date_flexibility_days: DEFAULT_DATE_FLEXIBILITY_DAYS,
            total_budget_currency: DEFAULT_CURRENCY.to_string(),
            total_budget_amount: None,
            num_travelers: DEFAULT_NUM_TRAVELERS,
            trip_type: TripType::Unknown,
            cabin_preference: CabinPreference::Unknown,
            hotel_min_rating: None,
            hotel_type_preference: HotelTypePreference::Unknown,
            avoid_airlines: Vec::new(),
            preferred_airlines: Vec::new(),
            avoid_redeye: false,
            max_layovers: None,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("intent payload is not a JSON object")]
    NotAnObject,

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    #[error("field `{field}` is not a YYYY-MM-DD date: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("end_date precedes start_date")]
    DateOrder,
}

/// Validates and repairs an untrusted extraction payload into an [`Intent`].
pub fn normalize(candidate: &Value) -> Result<Intent, ValidationError> {
    let obj = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    for key in obj.keys().filter(|k| !FIELDS.contains(&k.as_str())) {
        tracing::debug!(field = %key, "ignoring unexpected intent field");
    }

    let start_date = date_field(obj, "start_date")?;
    let end_date = date_field(obj, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(ValidationError::DateOrder);
        }
    }

    let total_budget_amount = number_field(obj, "total_budget_amount")?;
    if matches!(total_budget_amount, Some(amount) if amount <= 0.0) {
        return Err(ValidationError::OutOfRange {
            field: "total_budget_amount",
            reason: "must be positive",
        });
    }

    let num_travelers = integer_field(obj, "num_travelers")?.unwrap_or(DEFAULT_NUM_TRAVELERS);
    if num_travelers == 0 {
        return Err(ValidationError::OutOfRange {
            field: "num_travelers",
            reason: "must be at least 1",
        });
    }

    let hotel_min_rating = number_field(obj, "hotel_min_rating")?;
    if matches!(hotel_min_rating, Some(r) if !(MIN_HOTEL_RATING..=MAX_HOTEL_RATING).contains(&r)) {
        return Err(ValidationError::OutOfRange {
            field: "hotel_min_rating",
            reason: "must be between 1 and 5 stars",
        });
    }

    Ok(Intent {
        origin_airports: string_list(obj, "origin_airports")?
            .into_iter()
            .map(|code| code.to_ascii_uppercase())
            .collect(),
        destination_cities: string_list(obj, "destination_cities")?,
        start_date,
        end_date,
        date_flexibility_days: integer_field(obj, "date_flexibility_days")?
            .unwrap_or(DEFAULT_DATE_FLEXIBILITY_DAYS),
        total_budget_currency: currency_field(obj, "total_budget_currency")?,
        total_budget_amount,
        num_travelers,
        trip_type: enum_field(obj, "trip_type")?
            .map(TripType::parse)
            .unwrap_or(TripType::Unknown),
        cabin_preference: enum_field(obj, "cabin_preference")?
            .map(CabinPreference::parse)
            .unwrap_or(CabinPreference::Unknown),
        hotel_min_rating,
        hotel_type_preference: enum_field(obj, "hotel_type_preference")?
            .map(HotelTypePreference::parse)
            .unwrap_or(HotelTypePreference::Unknown),
        avoid_airlines: airline_set(obj, "avoid_airlines")?,
        preferred_airlines: airline_set(obj, "preferred_airlines")?,
        avoid_redeye: bool_field(obj, "avoid_redeye")?.unwrap_or(false),
        max_layovers: integer_field(obj, "max_layovers")?,
        notes: text_field(obj, "notes")?.unwrap_or_default(),
    })
}

// Missing keys and explicit nulls are both "absent".
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn text_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn enum_field<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn bool_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

fn number_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).map(Some).ok_or(
            ValidationError::WrongType {
                field,
                expected: "a finite number",
            },
        ),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a number or null",
        }),
    }
}

fn integer_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u32>, ValidationError> {
    let Some(value) = number_field(obj, field)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 {
        return Err(ValidationError::WrongType {
            field,
            expected: "a whole number",
        });
    }
    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "must not be negative",
        });
    }
    if value > f64::from(u32::MAX) {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "is too large",
        });
    }
    Ok(Some(value as u32))
}

fn date_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = text_field(obj, field)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // %Y accepts short years, so pin the shape before parsing.
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(ValidationError::InvalidDate { field, value: raw });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate { field, value: raw })
}

fn currency_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    let code = text_field(obj, field)?
        .map(|s| s.trim().to_ascii_uppercase())
        .unwrap_or_default();
    if code.is_empty() {
        return Ok(DEFAULT_CURRENCY.to_string());
    }
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "must be a three-letter currency code",
        });
    }
    Ok(code)
}

fn string_list(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    let items = match present(obj, field) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ValidationError::WrongType {
                field,
                expected: "an array of strings",
            })
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let s = item.as_str().ok_or(ValidationError::WrongType {
            field,
            expected: "an array of strings",
        })?;
        let s = s.trim();
        if !s.is_empty() {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

fn airline_set(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for airline in string_list(obj, field)? {
        let key = airline.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(airline);
        }
    }
    Ok(out)
}
