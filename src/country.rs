//! Country name / code resolution for map joins
//!
//! The choropleth layer joins on the ISO 3166-1 numeric region id. Source
//! rows carry an alpha-3 code and a free-text country name, neither of which
//! is entirely consistent: the sheet uses everyday names ("Russia", "UK",
//! "Ivory Coast") that differ from the official ISO short names. A small
//! override table takes precedence over the standard assignment list.
//!
//! Unresolvable input is `None`, not an error: such rows stay in tabular
//! output but are excluded from the map join.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// ISO 3166-1 assignment list: (alpha-3 code, numeric id, short name).
///
/// Numeric ids are the official ISO numeric codes with leading zeros
/// stripped, matching the id field of the world-110m topology used by the
/// rendering layer.
const ISO3166_TABLE: &[(&str, u16, &str)] = &[
    ("AFG", 4, "Afghanistan"),
    ("ALB", 8, "Albania"),
    ("DZA", 12, "Algeria"),
    ("ASM", 16, "American Samoa"),
    ("AND", 20, "Andorra"),
    ("AGO", 24, "Angola"),
    ("AIA", 660, "Anguilla"),
    ("ATA", 10, "Antarctica"),
    ("ATG", 28, "Antigua and Barbuda"),
    ("ARG", 32, "Argentina"),
    ("ARM", 51, "Armenia"),
    ("ABW", 533, "Aruba"),
    ("AUS", 36, "Australia"),
    ("AUT", 40, "Austria"),
    ("AZE", 31, "Azerbaijan"),
    ("BHS", 44, "Bahamas"),
    ("BHR", 48, "Bahrain"),
    ("BGD", 50, "Bangladesh"),
    ("BRB", 52, "Barbados"),
    ("BLR", 112, "Belarus"),
    ("BEL", 56, "Belgium"),
    ("BLZ", 84, "Belize"),
    ("BEN", 204, "Benin"),
    ("BMU", 60, "Bermuda"),
    ("BTN", 64, "Bhutan"),
    ("BOL", 68, "Bolivia (Plurinational State of)"),
    ("BES", 535, "Bonaire, Sint Eustatius and Saba"),
    ("BIH", 70, "Bosnia and Herzegovina"),
    ("BWA", 72, "Botswana"),
    ("BVT", 74, "Bouvet Island"),
    ("BRA", 76, "Brazil"),
    ("IOT", 86, "British Indian Ocean Territory"),
    ("BRN", 96, "Brunei Darussalam"),
    ("BGR", 100, "Bulgaria"),
    ("BFA", 854, "Burkina Faso"),
    ("BDI", 108, "Burundi"),
    ("CPV", 132, "Cabo Verde"),
    ("KHM", 116, "Cambodia"),
    ("CMR", 120, "Cameroon"),
    ("CAN", 124, "Canada"),
    ("CYM", 136, "Cayman Islands"),
    ("CAF", 140, "Central African Republic"),
    ("TCD", 148, "Chad"),
    ("CHL", 152, "Chile"),
    ("CHN", 156, "China"),
    ("CXR", 162, "Christmas Island"),
    ("CCK", 166, "Cocos (Keeling) Islands"),
    ("COL", 170, "Colombia"),
    ("COM", 174, "Comoros"),
    ("COG", 178, "Congo"),
    ("COD", 180, "Congo, Democratic Republic of the"),
    ("COK", 184, "Cook Islands"),
    ("CRI", 188, "Costa Rica"),
    ("CIV", 384, "Côte d'Ivoire"),
    ("HRV", 191, "Croatia"),
    ("CUB", 192, "Cuba"),
    ("CUW", 531, "Curaçao"),
    ("CYP", 196, "Cyprus"),
    ("CZE", 203, "Czechia"),
    ("DNK", 208, "Denmark"),
    ("DJI", 262, "Djibouti"),
    ("DMA", 212, "Dominica"),
    ("DOM", 214, "Dominican Republic"),
    ("ECU", 218, "Ecuador"),
    ("EGY", 818, "Egypt"),
    ("SLV", 222, "El Salvador"),
    ("GNQ", 226, "Equatorial Guinea"),
    ("ERI", 232, "Eritrea"),
    ("EST", 233, "Estonia"),
    ("SWZ", 748, "Eswatini"),
    ("ETH", 231, "Ethiopia"),
    ("FLK", 238, "Falkland Islands (Malvinas)"),
    ("FRO", 234, "Faroe Islands"),
    ("FJI", 242, "Fiji"),
    ("FIN", 246, "Finland"),
    ("FRA", 250, "France"),
    ("GUF", 254, "French Guiana"),
    ("PYF", 258, "French Polynesia"),
    ("ATF", 260, "French Southern Territories"),
    ("GAB", 266, "Gabon"),
    ("GMB", 270, "Gambia"),
    ("GEO", 268, "Georgia"),
    ("DEU", 276, "Germany"),
    ("GHA", 288, "Ghana"),
    ("GIB", 292, "Gibraltar"),
    ("GRC", 300, "Greece"),
    ("GRL", 304, "Greenland"),
    ("GRD", 308, "Grenada"),
    ("GLP", 312, "Guadeloupe"),
    ("GUM", 316, "Guam"),
    ("GTM", 320, "Guatemala"),
    ("GGY", 831, "Guernsey"),
    ("GIN", 324, "Guinea"),
    ("GNB", 624, "Guinea-Bissau"),
    ("GUY", 328, "Guyana"),
    ("HTI", 332, "Haiti"),
    ("HMD", 334, "Heard Island and McDonald Islands"),
    ("VAT", 336, "Holy See"),
    ("HND", 340, "Honduras"),
    ("HKG", 344, "Hong Kong"),
    ("HUN", 348, "Hungary"),
    ("ISL", 352, "Iceland"),
    ("IND", 356, "India"),
    ("IDN", 360, "Indonesia"),
    ("IRN", 364, "Iran (Islamic Republic of)"),
    ("IRQ", 368, "Iraq"),
    ("IRL", 372, "Ireland"),
    ("IMN", 833, "Isle of Man"),
    ("ISR", 376, "Israel"),
    ("ITA", 380, "Italy"),
    ("JAM", 388, "Jamaica"),
    ("JPN", 392, "Japan"),
    ("JEY", 832, "Jersey"),
    ("JOR", 400, "Jordan"),
    ("KAZ", 398, "Kazakhstan"),
    ("KEN", 404, "Kenya"),
    ("KIR", 296, "Kiribati"),
    ("PRK", 408, "Korea (Democratic People's Republic of)"),
    ("KOR", 410, "Korea, Republic of"),
    ("KWT", 414, "Kuwait"),
    ("KGZ", 417, "Kyrgyzstan"),
    ("LAO", 418, "Lao People's Democratic Republic"),
    ("LVA", 428, "Latvia"),
    ("LBN", 422, "Lebanon"),
    ("LSO", 426, "Lesotho"),
    ("LBR", 430, "Liberia"),
    ("LBY", 434, "Libya"),
    ("LIE", 438, "Liechtenstein"),
    ("LTU", 440, "Lithuania"),
    ("LUX", 442, "Luxembourg"),
    ("MAC", 446, "Macao"),
    ("MDG", 450, "Madagascar"),
    ("MWI", 454, "Malawi"),
    ("MYS", 458, "Malaysia"),
    ("MDV", 462, "Maldives"),
    ("MLI", 466, "Mali"),
    ("MLT", 470, "Malta"),
    ("MHL", 584, "Marshall Islands"),
    ("MTQ", 474, "Martinique"),
    ("MRT", 478, "Mauritania"),
    ("MUS", 480, "Mauritius"),
    ("MYT", 175, "Mayotte"),
    ("MEX", 484, "Mexico"),
    ("FSM", 583, "Micronesia (Federated States of)"),
    ("MDA", 498, "Moldova, Republic of"),
    ("MCO", 492, "Monaco"),
    ("MNG", 496, "Mongolia"),
    ("MNE", 499, "Montenegro"),
    ("MSR", 500, "Montserrat"),
    ("MAR", 504, "Morocco"),
    ("MOZ", 508, "Mozambique"),
    ("MMR", 104, "Myanmar"),
    ("NAM", 516, "Namibia"),
    ("NRU", 520, "Nauru"),
    ("NPL", 524, "Nepal"),
    ("NLD", 528, "Netherlands"),
    ("NCL", 540, "New Caledonia"),
    ("NZL", 554, "New Zealand"),
    ("NIC", 558, "Nicaragua"),
    ("NER", 562, "Niger"),
    ("NGA", 566, "Nigeria"),
    ("NIU", 570, "Niue"),
    ("NFK", 574, "Norfolk Island"),
    ("MKD", 807, "North Macedonia"),
    ("MNP", 580, "Northern Mariana Islands"),
    ("NOR", 578, "Norway"),
    ("OMN", 512, "Oman"),
    ("PAK", 586, "Pakistan"),
    ("PLW", 585, "Palau"),
    ("PSE", 275, "Palestine, State of"),
    ("PAN", 591, "Panama"),
    ("PNG", 598, "Papua New Guinea"),
    ("PRY", 600, "Paraguay"),
    ("PER", 604, "Peru"),
    ("PHL", 608, "Philippines"),
    ("PCN", 612, "Pitcairn"),
    ("POL", 616, "Poland"),
    ("PRT", 620, "Portugal"),
    ("PRI", 630, "Puerto Rico"),
    ("QAT", 634, "Qatar"),
    ("REU", 638, "Réunion"),
    ("ROU", 642, "Romania"),
    ("RUS", 643, "Russian Federation"),
    ("RWA", 646, "Rwanda"),
    ("BLM", 652, "Saint Barthélemy"),
    ("SHN", 654, "Saint Helena, Ascension and Tristan da Cunha"),
    ("KNA", 659, "Saint Kitts and Nevis"),
    ("LCA", 662, "Saint Lucia"),
    ("MAF", 663, "Saint Martin (French part)"),
    ("SPM", 666, "Saint Pierre and Miquelon"),
    ("VCT", 670, "Saint Vincent and the Grenadines"),
    ("WSM", 882, "Samoa"),
    ("SMR", 674, "San Marino"),
    ("STP", 678, "Sao Tome and Principe"),
    ("SAU", 682, "Saudi Arabia"),
    ("SEN", 686, "Senegal"),
    ("SRB", 688, "Serbia"),
    ("SYC", 690, "Seychelles"),
    ("SLE", 694, "Sierra Leone"),
    ("SGP", 702, "Singapore"),
    ("SXM", 534, "Sint Maarten (Dutch part)"),
    ("SVK", 703, "Slovakia"),
    ("SVN", 705, "Slovenia"),
    ("SLB", 90, "Solomon Islands"),
    ("SOM", 706, "Somalia"),
    ("ZAF", 710, "South Africa"),
    ("SGS", 239, "South Georgia and the South Sandwich Islands"),
    ("SSD", 728, "South Sudan"),
    ("ESP", 724, "Spain"),
    ("LKA", 144, "Sri Lanka"),
    ("SDN", 729, "Sudan"),
    ("SUR", 740, "Suriname"),
    ("SJM", 744, "Svalbard and Jan Mayen"),
    ("SWE", 752, "Sweden"),
    ("CHE", 756, "Switzerland"),
    ("SYR", 760, "Syrian Arab Republic"),
    ("TWN", 158, "Taiwan, Province of China"),
    ("TJK", 762, "Tajikistan"),
    ("TZA", 834, "Tanzania, United Republic of"),
    ("THA", 764, "Thailand"),
    ("TLS", 626, "Timor-Leste"),
    ("TGO", 768, "Togo"),
    ("TKL", 772, "Tokelau"),
    ("TON", 776, "Tonga"),
    ("TTO", 780, "Trinidad and Tobago"),
    ("TUN", 788, "Tunisia"),
    ("TUR", 792, "Türkiye"),
    ("TKM", 795, "Turkmenistan"),
    ("TCA", 796, "Turks and Caicos Islands"),
    ("TUV", 798, "Tuvalu"),
    ("UGA", 800, "Uganda"),
    ("UKR", 804, "Ukraine"),
    ("ARE", 784, "United Arab Emirates"),
    ("GBR", 826, "United Kingdom of Great Britain and Northern Ireland"),
    ("USA", 840, "United States of America"),
    ("UMI", 581, "United States Minor Outlying Islands"),
    ("URY", 858, "Uruguay"),
    ("UZB", 860, "Uzbekistan"),
    ("VUT", 548, "Vanuatu"),
    ("VEN", 862, "Venezuela (Bolivarian Republic of)"),
    ("VNM", 704, "Viet Nam"),
    ("VGB", 92, "Virgin Islands (British)"),
    ("VIR", 850, "Virgin Islands (U.S.)"),
    ("WLF", 876, "Wallis and Futuna"),
    ("ESH", 732, "Western Sahara"),
    ("YEM", 887, "Yemen"),
    ("ZMB", 894, "Zambia"),
    ("ZWE", 716, "Zimbabwe"),
];

lazy_static! {
    /// Sheet names that don't match the ISO short name. Override wins over
    /// the standard table.
    static ref NAME_OVERRIDES: HashMap<&'static str, u16> = {
        let mut m = HashMap::new();
        m.insert("Russia", 643);
        m.insert("Tanzania", 834);
        m.insert("Republic of the Congo", 178);
        m.insert("Democratic Republic of the Congo", 180);
        m.insert("Ivory Coast", 384);
        m.insert("USA", 840);
        m.insert("UK", 826);
        m.insert("Falkland Islands", 238);
        m.insert("Central African Republic", 140);
        m.insert("South Sandwich Islands", 239);
        m.insert("Viet Nam", 704);
        m.insert("United Arab Emirates", 784);
        m.insert("Türkiye", 792);
        m.insert("Syria", 760);
        m.insert("Micronesia", 583);
        m.insert("Laos", 418);
        m.insert("South Korea", 410);
        m.insert("Bolivia", 68);
        m.insert("French Guiana", 254);
        m
    };

    static ref BY_ALPHA3: HashMap<&'static str, u16> =
        ISO3166_TABLE.iter().map(|&(a3, id, _)| (a3, id)).collect();

    static ref BY_NAME: HashMap<&'static str, u16> =
        ISO3166_TABLE.iter().map(|&(_, id, name)| (name, id)).collect();
}

/// Resolve a country name or ISO alpha-3 code to its numeric region id.
///
/// Lookup order: name override table, alpha-3 code, ISO short name.
/// Returns `None` for anything unresolvable.
pub fn resolve(name_or_code: &str) -> Option<u16> {
    let input = name_or_code.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(&id) = NAME_OVERRIDES.get(input) {
        return Some(id);
    }
    if let Some(&id) = BY_ALPHA3.get(input) {
        return Some(id);
    }
    BY_NAME.get(input).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alpha3() {
        assert_eq!(resolve("KEN"), Some(404));
        assert_eq!(resolve("BRA"), Some(76));
        assert_eq!(resolve(" IND "), Some(356));
    }

    #[test]
    fn test_resolve_standard_name() {
        assert_eq!(resolve("Kenya"), Some(404));
        assert_eq!(resolve("Botswana"), Some(72));
        assert_eq!(resolve("New Zealand"), Some(554));
    }

    #[test]
    fn test_override_wins() {
        // Everyday names the ISO list doesn't use
        assert_eq!(resolve("Russia"), Some(643));
        assert_eq!(resolve("UK"), Some(826));
        assert_eq!(resolve("USA"), Some(840));
        assert_eq!(resolve("Ivory Coast"), Some(384));
        assert_eq!(resolve("Tanzania"), Some(834));
        assert_eq!(resolve("South Korea"), Some(410));
        // "Falkland Islands" maps to 238 even though the ISO short name differs
        assert_eq!(resolve("Falkland Islands"), Some(238));
    }

    #[test]
    fn test_unresolved_is_absent() {
        assert_eq!(resolve("Atlantis"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("ZZZ"), None);
    }
}
