//! Country list handling: aggregate filtering and search.

use crate::data::worldbank::CountryRow;
use crate::domain::Country;

/// Region label the World Bank uses for groupings like "Euro area" or "World".
const AGGREGATE_REGION: &str = "Aggregates";

pub(crate) fn countries_from_rows(rows: Vec<CountryRow>) -> Vec<Country> {
    let mut out: Vec<Country> = rows
        .into_iter()
        .filter(|row| row.region.value.trim() != AGGREGATE_REGION && !row.iso2_code.trim().is_empty())
        .map(|row| Country {
            code: row.iso2_code.trim().to_ascii_uppercase(),
            code3: row.id.trim().to_ascii_uppercase(),
            name: row.name.trim().to_string(),
            region: row.region.value.trim().to_string(),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Case-insensitive match on either code or a substring of the name.
///
/// An exact code match is listed first; an empty query returns everything.
pub fn search_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return countries.iter().collect();
    }

    let is_code = |c: &Country| c.code.eq_ignore_ascii_case(&query) || c.code3.eq_ignore_ascii_case(&query);

    let mut exact: Vec<&Country> = countries.iter().filter(|c| is_code(*c)).collect();
    let partial = countries
        .iter()
        .filter(|c| !is_code(*c) && c.name.to_lowercase().contains(&query));
    exact.extend(partial);
    exact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::worldbank::parse_envelope;

    const COUNTRY_PAGE: &str = r#"[
        {"page":1,"pages":1,"per_page":"400","total":4},
        [
            {"id":"FRA","iso2Code":"FR","name":"France","region":{"id":"ECS","iso2code":"Z7","value":"Europe & Central Asia"}},
            {"id":"EMU","iso2Code":"XC","name":"Euro area","region":{"id":"NA","iso2code":"NA","value":"Aggregates"}},
            {"id":"USA","iso2Code":"US","name":"United States","region":{"id":"NAC","iso2code":"XU","value":"North America"}},
            {"id":"ARE","iso2Code":"AE","name":"United Arab Emirates","region":{"id":"MEA","iso2code":"ZQ","value":"Middle East & North Africa "}}
        ]
    ]"#;

    fn countries() -> Vec<Country> {
        let (_, rows) = parse_envelope::<CountryRow>(COUNTRY_PAGE).unwrap();
        countries_from_rows(rows)
    }

    #[test]
    fn aggregates_are_dropped_and_sorted() {
        let list = countries();
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["France", "United Arab Emirates", "United States"]);
        assert_eq!(list[1].region, "Middle East & North Africa");
    }

    #[test]
    fn search_by_code_and_name() {
        let list = countries();

        let hits = search_countries(&list, "usa");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "US");

        let hits = search_countries(&list, "united");
        assert_eq!(hits.len(), 2);

        let hits = search_countries(&list, "fr");
        assert_eq!(hits[0].code, "FR");

        assert_eq!(search_countries(&list, "  ").len(), 3);
        assert!(search_countries(&list, "atlantis").is_empty());
    }
}
