//! Read-only reference tables.
//!
//! States with their cities, generated pin codes per state, generated areas
//! per city, and the categorized language list. The tables are built once
//! with [`ReferenceData::builtin`] and only ever read afterwards; lookups for
//! unknown keys return an empty slice.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// First pin code handed out to each state; later cities step by 100.
const PIN_CODE_BASE: u32 = 110_001;

/// Pin code step between consecutive cities of a state.
const PIN_CODE_STEP: u32 = 100;

/// Suffixes appended to a city name to form its areas.
const AREA_SUFFIXES: [&str; 5] = ["North", "South", "East", "West", "Central"];

/// States and union territories with their cities, in table order.
const STATE_CITIES: &[(&str, &[&str])] = &[
    ("Andaman and Nicobar Islands", &["Port Blair", "Diglipur", "Mayabunder", "Rangat"]),
    ("Andhra Pradesh", &["Visakhapatnam", "Vijayawada", "Guntur", "Nellore", "Kurnool", "Rajahmundry", "Kakinada", "Tirupati", "Anantapur", "Kadapa"]),
    ("Arunachal Pradesh", &["Itanagar", "Naharlagun", "Pasighat", "Tawang", "Ziro", "Bomdila", "Tezu", "Seppa"]),
    ("Assam", &["Guwahati", "Silchar", "Dibrugarh", "Jorhat", "Nagaon", "Tinsukia", "Tezpur", "Bongaigaon"]),
    ("Bihar", &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur", "Purnia", "Darbhanga", "Bihar Sharif", "Arrah"]),
    ("Chhattisgarh", &["Raipur", "Bhilai", "Bilaspur", "Korba", "Durg", "Rajnandgaon", "Jagdalpur", "Raigarh"]),
    ("Goa", &["Panaji", "Margao", "Vasco da Gama", "Mapusa", "Ponda", "Bicholim", "Curchorem"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar", "Jamnagar", "Junagadh", "Gandhinagar", "Anand"]),
    ("Haryana", &["Faridabad", "Gurgaon", "Panipat", "Ambala", "Yamunanagar", "Rohtak", "Hisar", "Karnal", "Sonipat"]),
    ("Himachal Pradesh", &["Shimla", "Dharamshala", "Solan", "Mandi", "Palampur", "Kullu", "Hamirpur", "Bilaspur"]),
    ("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Deoghar", "Hazaribagh", "Giridih", "Ramgarh"]),
    ("Karnataka", &["Bangalore", "Mysore", "Mangalore", "Hubli", "Belgaum", "Gulbarga", "Davangere", "Bellary", "Tumkur"]),
    ("Kerala", &["Thiruvananthapuram", "Kochi", "Kozhikode", "Kollam", "Thrissur", "Palakkad", "Alappuzha", "Kannur", "Kottayam"]),
    ("Madhya Pradesh", &["Indore", "Bhopal", "Jabalpur", "Gwalior", "Ujjain", "Sagar", "Dewas", "Satna", "Ratlam"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Thane", "Nashik", "Aurangabad", "Solapur", "Amravati", "Kolhapur", "Navi Mumbai"]),
    ("Manipur", &["Imphal", "Thoubal", "Bishnupur", "Churachandpur", "Kakching", "Ukhrul"]),
    ("Meghalaya", &["Shillong", "Tura", "Nongstoin", "Jowai", "Baghmara", "Williamnagar"]),
    ("Mizoram", &["Aizawl", "Lunglei", "Champhai", "Serchhip", "Kolasib", "Lawngtlai"]),
    ("Nagaland", &["Kohima", "Dimapur", "Mokokchung", "Tuensang", "Wokha", "Zunheboto"]),
    ("Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Berhampur", "Sambalpur", "Puri", "Balasore", "Bhadrak"]),
    ("Punjab", &["Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda", "Mohali", "Pathankot", "Hoshiarpur"]),
    ("Rajasthan", &["Jaipur", "Jodhpur", "Kota", "Bikaner", "Ajmer", "Udaipur", "Bhilwara", "Alwar", "Sikar"]),
    ("Sikkim", &["Gangtok", "Namchi", "Mangan", "Gyalshing", "Rangpo", "Jorethang"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli", "Salem", "Tirunelveli", "Erode", "Vellore", "Thoothukudi"]),
    ("Telangana", &["Hyderabad", "Warangal", "Nizamabad", "Khammam", "Karimnagar", "Ramagundam", "Mahbubnagar"]),
    ("Tripura", &["Agartala", "Udaipur", "Dharmanagar", "Ambassa", "Kailasahar", "Belonia"]),
    ("Uttar Pradesh", &["Lucknow", "Kanpur", "Ghaziabad", "Agra", "Varanasi", "Meerut", "Prayagraj", "Bareilly", "Aligarh", "Noida"]),
    ("Uttarakhand", &["Dehradun", "Haridwar", "Roorkee", "Haldwani", "Rudrapur", "Kashipur", "Rishikesh"]),
    ("West Bengal", &["Kolkata", "Howrah", "Durgapur", "Asansol", "Siliguri", "Bardhaman", "Malda", "Baharampur"]),
    ("Chandigarh", &["Chandigarh"]),
    ("Dadra and Nagar Haveli and Daman and Diu", &["Daman", "Diu", "Silvassa"]),
    ("Delhi", &["New Delhi", "North Delhi", "South Delhi", "East Delhi", "West Delhi", "Central Delhi"]),
    ("Jammu and Kashmir", &["Srinagar", "Jammu", "Anantnag", "Baramulla", "Udhampur", "Kathua"]),
    ("Ladakh", &["Leh", "Kargil", "Nubra", "Zanskar"]),
    ("Lakshadweep", &["Kavaratti", "Agatti", "Amini", "Andrott"]),
    ("Puducherry", &["Puducherry", "Karaikal", "Mahe", "Yanam"]),
];

/// Language list with categories, in table order.
const LANGUAGES: &[(&str, LanguageCategory)] = &[
    ("Hindi", LanguageCategory::Scheduled),
    ("Bengali", LanguageCategory::Scheduled),
    ("Marathi", LanguageCategory::Scheduled),
    ("Telugu", LanguageCategory::Scheduled),
    ("Tamil", LanguageCategory::Scheduled),
    ("Gujarati", LanguageCategory::Scheduled),
    ("Urdu", LanguageCategory::Scheduled),
    ("Kannada", LanguageCategory::Scheduled),
    ("Odia", LanguageCategory::Scheduled),
    ("Malayalam", LanguageCategory::Scheduled),
    ("Punjabi", LanguageCategory::Scheduled),
    ("Assamese", LanguageCategory::Scheduled),
    ("Maithili", LanguageCategory::Scheduled),
    ("Santali", LanguageCategory::Scheduled),
    ("Kashmiri", LanguageCategory::Scheduled),
    ("Nepali", LanguageCategory::Scheduled),
    ("Sindhi", LanguageCategory::Scheduled),
    ("Konkani", LanguageCategory::Scheduled),
    ("Dogri", LanguageCategory::Scheduled),
    ("Manipuri", LanguageCategory::Scheduled),
    ("Bodo", LanguageCategory::Scheduled),
    ("Sanskrit", LanguageCategory::Scheduled),
    ("English", LanguageCategory::Major),
    ("Bhojpuri", LanguageCategory::Major),
    ("Rajasthani", LanguageCategory::Major),
    ("Chhattisgarhi", LanguageCategory::Major),
    ("Haryanvi", LanguageCategory::Major),
    ("Magahi", LanguageCategory::Major),
    ("Marwari", LanguageCategory::Major),
    ("Awadhi", LanguageCategory::Major),
    ("Tulu", LanguageCategory::Regional),
    ("Gondi", LanguageCategory::Regional),
    ("Khasi", LanguageCategory::Regional),
    ("Garo", LanguageCategory::Regional),
    ("Mizo", LanguageCategory::Regional),
    ("Kokborok", LanguageCategory::Regional),
];

/// How a language is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCategory {
    /// Listed in the Eighth Schedule.
    Scheduled,
    /// Widely spoken, not scheduled.
    Major,
    /// Regional language.
    Regional,
}

impl fmt::Display for LanguageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Major => write!(f, "major"),
            Self::Regional => write!(f, "regional"),
        }
    }
}

/// A selectable language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Display name.
    pub name: &'static str,
    /// Classification.
    pub category: LanguageCategory,
}

/// The lookup tables behind the intake form's dependent selects.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    states: Vec<(&'static str, &'static [&'static str])>,
    pin_codes: HashMap<&'static str, Vec<String>>,
    areas: HashMap<&'static str, Vec<String>>,
    languages: Vec<Language>,
}

impl ReferenceData {
    /// Build the built-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        let states: Vec<_> = STATE_CITIES.to_vec();

        let pin_codes = states
            .iter()
            .map(|(state, cities)| {
                let pins = (0..cities.len())
                    .map(|index| {
                        let step = u32::try_from(index).unwrap_or(u32::MAX);
                        let mut pin = PIN_CODE_BASE
                            .saturating_add(step.saturating_mul(PIN_CODE_STEP))
                            .to_string();
                        pin.truncate(6);
                        pin
                    })
                    .collect();
                (*state, pins)
            })
            .collect();

        let areas = states
            .iter()
            .flat_map(|(_, cities)| cities.iter())
            .map(|city| {
                let list = AREA_SUFFIXES
                    .iter()
                    .map(|suffix| format!("{city} {suffix}"))
                    .collect();
                (*city, list)
            })
            .collect();

        let mut languages: Vec<Language> = LANGUAGES
            .iter()
            .map(|&(name, category)| Language { name, category })
            .collect();
        languages.sort_by(|a, b| a.name.cmp(b.name));

        Self {
            states,
            pin_codes,
            areas,
            languages,
        }
    }

    /// State names, sorted alphabetically.
    #[must_use]
    pub fn states(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.states.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }

    /// Check whether `state` is a key of the state table.
    #[must_use]
    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|(name, _)| *name == state)
    }

    /// Cities of `state`, empty when the state is unknown.
    #[must_use]
    pub fn cities(&self, state: &str) -> &'static [&'static str] {
        self.states
            .iter()
            .find(|(name, _)| *name == state)
            .map(|(_, cities)| *cities)
            .unwrap_or_default()
    }

    /// Pin codes of `state`, empty when the state is unknown.
    #[must_use]
    pub fn pin_codes(&self, state: &str) -> &[String] {
        self.pin_codes
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Areas of `city`, empty when the city is unknown.
    #[must_use]
    pub fn areas(&self, city: &str) -> &[String] {
        self.areas
            .get(city)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Areas of every city in `cities`, in selection order.
    #[must_use]
    pub fn areas_for<'a, S: AsRef<str>>(&'a self, cities: &[S]) -> Vec<&'a str> {
        cities
            .iter()
            .flat_map(|city| self.areas(city.as_ref()))
            .map(String::as_str)
            .collect()
    }

    /// All languages, sorted by name.
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Languages of one category, sorted by name.
    #[must_use]
    pub fn languages_in(&self, category: LanguageCategory) -> Vec<&Language> {
        self.languages
            .iter()
            .filter(|lang| lang.category == category)
            .collect()
    }

    /// Check whether `name` is a known language.
    #[must_use]
    pub fn has_language(&self, name: &str) -> bool {
        self.languages.iter().any(|lang| lang.name == name)
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_table_size() {
        let reference = ReferenceData::builtin();
        assert_eq!(reference.states().len(), 36);
    }

    #[test]
    fn test_states_sorted() {
        let states = ReferenceData::builtin().states();
        let mut sorted = states.clone();
        sorted.sort_unstable();
        assert_eq!(states, sorted);
        assert_eq!(states[0], "Andaman and Nicobar Islands");
        assert_eq!(*states.last().unwrap(), "West Bengal");
    }

    #[test]
    fn test_cities_lookup() {
        let reference = ReferenceData::builtin();
        assert_eq!(reference.cities("Goa").len(), 7);
        assert_eq!(reference.cities("Goa")[0], "Panaji");
        assert!(reference.cities("Atlantis").is_empty());
    }

    #[test]
    fn test_pin_codes_generated_per_city() {
        let reference = ReferenceData::builtin();
        let pins = reference.pin_codes("Andhra Pradesh");
        assert_eq!(pins.len(), 10);
        assert_eq!(pins[0], "110001");
        assert_eq!(pins[1], "110101");
        assert_eq!(pins[9], "110901");
        assert!(pins.iter().all(|p| p.len() == 6));
        assert!(reference.pin_codes("Atlantis").is_empty());
    }

    #[test]
    fn test_areas_generated_per_city() {
        let reference = ReferenceData::builtin();
        assert_eq!(
            reference.areas("Panaji"),
            &[
                "Panaji North".to_string(),
                "Panaji South".to_string(),
                "Panaji East".to_string(),
                "Panaji West".to_string(),
                "Panaji Central".to_string(),
            ]
        );
        assert!(reference.areas("Atlantis").is_empty());
    }

    #[test]
    fn test_areas_for_selected_cities() {
        let reference = ReferenceData::builtin();
        let areas = reference.areas_for(&["Panaji", "Margao", "Nowhere"]);
        assert_eq!(areas.len(), 10);
        assert_eq!(areas[0], "Panaji North");
        assert_eq!(areas[5], "Margao North");
    }

    #[test]
    fn test_languages_sorted_and_categorized() {
        let reference = ReferenceData::builtin();
        let languages = reference.languages();
        assert_eq!(languages.len(), 36);
        assert_eq!(languages[0].name, "Assamese");
        assert_eq!(reference.languages_in(LanguageCategory::Major).len(), 8);
        assert_eq!(reference.languages_in(LanguageCategory::Regional).len(), 6);
        assert!(reference.has_language("Tulu"));
        assert!(!reference.has_language("Klingon"));
    }

    #[test]
    fn test_language_category_display() {
        assert_eq!(LanguageCategory::Scheduled.to_string(), "scheduled");
        assert_eq!(LanguageCategory::Regional.to_string(), "regional");
    }
}
