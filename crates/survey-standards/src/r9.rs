//! Afrobarometer Round 9 defaults: country and Q45 codebooks, the chart
//! palette and the chart titles of the three problem responses.

use survey_model::{
    AnalysisVariable, Codebook, CodebookDomain, Color, ColorMap, DEFAULT_FALLBACK_COLOR,
};

use crate::error::Result;

pub const COUNTRY_COLUMN: &str = "COUNTRY";

/// Columns carried along without being charted.
pub const OPTIONAL_COLUMNS: [&str; 2] = ["REGION", "URBRUR"];

const COUNTRIES: &[(i64, &str)] = &[
    (2, "Angola"),
    (3, "Benin"),
    (4, "Botswana"),
    (5, "Burkina Faso"),
    (6, "Cabo Verde"),
    (7, "Cameroon"),
    (8, "Congo-Brazzaville"),
    (9, "Côte d'Ivoire"),
    (10, "Eswatini"),
    (11, "Ethiopia"),
    (12, "Gabon"),
    (13, "Gambia"),
    (14, "Ghana"),
    (15, "Guinea"),
    (16, "Kenya"),
    (17, "Lesotho"),
    (18, "Liberia"),
    (19, "Madagascar"),
    (20, "Malawi"),
    (21, "Mali"),
    (22, "Mauritania"),
    (23, "Mauritius"),
    (24, "Morocco"),
    (25, "Mozambique"),
    (26, "Namibia"),
    (27, "Niger"),
    (28, "Nigeria"),
    (29, "São Tomé and Príncipe"),
    (30, "Senegal"),
    (31, "Seychelles"),
    (32, "Sierra Leone"),
    (33, "South Africa"),
    (34, "Sudan"),
    (35, "Tanzania"),
    (36, "Togo"),
    (37, "Tunisia"),
    (38, "Uganda"),
    (39, "Zambia"),
    (40, "Zimbabwe"),
];

const PROBLEMS: &[(i64, &str)] = &[
    (0, "Nothing/no problems"),
    (1, "Management of the economy"),
    (2, "Wages, incomes, and salaries"),
    (3, "Unemployment"),
    (4, "Poverty/Destitution"),
    (5, "Rates and taxes"),
    (6, "Loans/Credit"),
    (7, "Farming/Agriculture"),
    (8, "Food shortage/Famine"),
    (9, "Drought"),
    (10, "Land"),
    (11, "Transportation"),
    (12, "Communications"),
    (13, "Infrastructure/Roads"),
    (14, "Education"),
    (15, "Housing"),
    (16, "Electricity"),
    (17, "Water supply"),
    (18, "Orphans/Homeless children"),
    (19, "Services (other)"),
    (20, "Health"),
    (21, "AIDS"),
    (22, "Sickness/Disease"),
    (23, "Crime and security"),
    (24, "Corruption"),
    (25, "Political violence"),
    (26, "Political instability/Divisions"),
    (27, "Discrimination/Inequality"),
    (28, "Gender issues/Women's rights"),
    (29, "Democracy/Political rights"),
    (30, "War (international)"),
    (31, "Civil war"),
    (32, "Agricultural marketing"),
    (33, "Climate change"),
    (34, "COVID-19"),
    (180, "Internally displaced"),
    (1500, "Pollution"),
    (1680, "Drug abuse"),
    (9995, "Other"),
    (9998, "Refused"),
    (9999, "Don't know"),
    (-1, "Missing"),
];

// Colors repeat on purpose: the palette cycles through ten hues.
const PALETTE: &[(&str, Color)] = &[
    ("Nothing/no problems", Color::rgb(0x1f, 0x77, 0xb4)),
    ("Management of the economy", Color::rgb(0xff, 0x7f, 0x0e)),
    ("Wages, incomes, and salaries", Color::rgb(0x2c, 0xa0, 0x2c)),
    ("Unemployment", Color::rgb(0xd6, 0x27, 0x28)),
    ("Poverty/Destitution", Color::rgb(0x94, 0x67, 0xbd)),
    ("Rates and taxes", Color::rgb(0x8c, 0x56, 0x4b)),
    ("Loans/Credit", Color::rgb(0xe3, 0x77, 0xc2)),
    ("Farming/Agriculture", Color::rgb(0x7f, 0x7f, 0x7f)),
    ("Food shortage/Famine", Color::rgb(0xbc, 0xbd, 0x22)),
    ("Drought", Color::rgb(0x17, 0xbe, 0xcf)),
    ("Land", Color::rgb(0x1f, 0x77, 0xb4)),
    ("Transportation", Color::rgb(0xff, 0x7f, 0x0e)),
    ("Communications", Color::rgb(0x2c, 0xa0, 0x2c)),
    ("Infrastructure/Roads", Color::rgb(0xd6, 0x27, 0x28)),
    ("Education", Color::rgb(0x94, 0x67, 0xbd)),
    ("Housing", Color::rgb(0x8c, 0x56, 0x4b)),
    ("Electricity", Color::rgb(0xe3, 0x77, 0xc2)),
    ("Water supply", Color::rgb(0x1e, 0x90, 0xff)),
    ("Orphans/Homeless children", Color::rgb(0xbc, 0xbd, 0x22)),
    ("Services (other)", Color::rgb(0x17, 0xbe, 0xcf)),
    ("Health", Color::rgb(0x1f, 0x77, 0xb4)),
    ("AIDS", Color::rgb(0xff, 0x7f, 0x0e)),
    ("Sickness/Disease", Color::rgb(0x2c, 0xa0, 0x2c)),
    ("Crime and security", Color::rgb(0xd6, 0x27, 0x28)),
    ("Corruption", Color::rgb(0x94, 0x67, 0xbd)),
    ("Political violence", Color::rgb(0x8c, 0x56, 0x4b)),
    ("Political instability/Divisions", Color::rgb(0xe3, 0x77, 0xc2)),
    ("Discrimination/Inequality", Color::rgb(0x7f, 0x7f, 0x7f)),
    ("Gender issues/Women's rights", Color::rgb(0xbc, 0xbd, 0x22)),
    ("Democracy/Political rights", Color::rgb(0x17, 0xbe, 0xcf)),
    ("War (international)", Color::rgb(0x1f, 0x77, 0xb4)),
    ("Civil war", Color::rgb(0xff, 0x7f, 0x0e)),
    ("Agricultural marketing", Color::rgb(0x2c, 0xa0, 0x2c)),
    ("Climate change", Color::rgb(0xd6, 0x27, 0x28)),
    ("COVID-19", Color::rgb(0x94, 0x67, 0xbd)),
    ("Internally displaced", Color::rgb(0x8c, 0x56, 0x4b)),
    ("Pollution", Color::rgb(0xe3, 0x77, 0xc2)),
    ("Drug abuse", Color::rgb(0x7f, 0x7f, 0x7f)),
    ("Other", Color::rgb(0xbc, 0xbd, 0x22)),
    ("Refused", Color::rgb(0x17, 0xbe, 0xcf)),
    ("Don't know", Color::rgb(0x1f, 0x77, 0xb4)),
    ("Missing", Color::rgb(0xff, 0x7f, 0x0e)),
];

const VARIABLES: &[(&str, &str)] = &[
    ("Q45PT1", "First Most Important Problem"),
    ("Q45PT2", "Second Most Important Problem"),
    ("Q45PT3", "Third Most Important Problem"),
];

pub fn country_codebook() -> Result<Codebook> {
    Ok(Codebook::from_entries(
        CodebookDomain::Country.as_str(),
        COUNTRIES.iter().copied(),
    )?)
}

pub fn problem_codebook() -> Result<Codebook> {
    Ok(Codebook::from_entries(
        CodebookDomain::Problem.as_str(),
        PROBLEMS.iter().copied(),
    )?)
}

pub fn color_map() -> ColorMap {
    ColorMap::with_colors(DEFAULT_FALLBACK_COLOR, PALETTE.iter().copied())
}

/// The three ranked problem responses, in chart order.
pub fn analysis_variables() -> Vec<AnalysisVariable> {
    VARIABLES
        .iter()
        .map(|(name, title)| AnalysisVariable::new(*name, *title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_covers_every_problem_label() {
        let problems = problem_codebook().unwrap();
        let colors = color_map();
        assert!(colors.uncovered_labels(&problems).is_empty());
        assert_eq!(colors.len(), problems.len());
    }

    #[test]
    fn codebooks_hold_expected_entries() {
        let countries = country_codebook().unwrap();
        assert_eq!(countries.len(), 39);
        assert_eq!(countries.label_for(9), Some("Côte d'Ivoire"));
        assert_eq!(countries.label_for(29), Some("São Tomé and Príncipe"));
        assert_eq!(countries.label_for(1), None);

        let problems = problem_codebook().unwrap();
        assert_eq!(problems.label_for(-1), Some("Missing"));
        assert_eq!(problems.label_for(9999), Some("Don't know"));
        assert_eq!(problems.label_for(35), None);
    }

    #[test]
    fn water_supply_keeps_its_distinct_blue() {
        assert_eq!(color_map().color_for("Water supply").to_hex(), "#1e90ff");
    }
}
