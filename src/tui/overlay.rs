//! Closable overlays (the country dropdown) and click-outside dismissal.

use ratatui::layout::{Position, Rect};

use crate::domain::Country;

/// Something drawn on top of the form that a click elsewhere closes.
pub trait Overlay {
    fn is_open(&self) -> bool;
    fn close(&mut self);
    /// Area the overlay occupied on the last frame.
    fn area(&self) -> Option<Rect>;
}

/// Close `overlay` if it is open and the click at `(column, row)` falls outside it.
///
/// Returns `true` when the overlay was dismissed.
pub fn dismiss_on_click(overlay: &mut impl Overlay, column: u16, row: u16) -> bool {
    if !overlay.is_open() {
        return false;
    }
    let inside = overlay
        .area()
        .is_some_and(|area| area.contains(Position::new(column, row)));
    if inside {
        return false;
    }
    overlay.close();
    true
}

/// Entry index under `(column, row)` for a list drawn inside a bordered block.
///
/// `None` on the border (including the title row) or outside `area`.
pub fn bordered_list_row(area: Rect, column: u16, row: u16) -> Option<usize> {
    let inside_x = column > area.x && column < (area.x + area.width).saturating_sub(1);
    let inside_y = row > area.y && row < (area.y + area.height).saturating_sub(1);
    (inside_x && inside_y).then(|| usize::from(row - area.y - 1))
}

/// Searchable country list attached to the country field.
#[derive(Debug, Default)]
pub struct CountryDropdown {
    countries: Vec<Country>,
    query: String,
    selected: usize,
    open: bool,
    area: Option<Rect>,
}

impl CountryDropdown {
    pub fn set_countries(&mut self, countries: Vec<Country>) {
        self.countries = countries;
        self.selected = 0;
    }

    pub fn has_countries(&self) -> bool {
        !self.countries.is_empty()
    }

    pub fn open(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
        self.open = true;
    }

    /// Current matches for the typed text.
    pub fn matches(&self) -> Vec<&Country> {
        crate::data::search_countries(&self.countries, &self.query)
    }

    /// Best match for `query`, regardless of what is open.
    pub fn first_match(&self, query: &str) -> Option<&Country> {
        crate::data::search_countries(&self.countries, query).into_iter().next()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_selection(&mut self, delta: isize) {
        let n = self.matches().len();
        if n == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as isize + delta).clamp(0, n as isize - 1) as usize;
    }

    /// Take the highlighted match and close.
    pub fn pick(&mut self) -> Option<Country> {
        let picked = self.matches().get(self.selected).map(|c| (*c).clone());
        self.close();
        picked
    }

    /// Take the match on list row `row` (0 = first visible entry) and close.
    pub fn pick_row(&mut self, row: usize) -> Option<Country> {
        self.selected = row;
        self.pick()
    }

    /// Name for a code, if the list knows it.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code) || c.code3.eq_ignore_ascii_case(code))
            .map(|c| c.name.as_str())
    }

    pub fn set_area(&mut self, area: Option<Rect>) {
        self.area = area;
    }
}

impl Overlay for CountryDropdown {
    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
        self.area = None;
    }

    fn area(&self) -> Option<Rect> {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, code3: &str, name: &str) -> Country {
        Country {
            code: code.to_string(),
            code3: code3.to_string(),
            name: name.to_string(),
            region: "Europe & Central Asia".to_string(),
        }
    }

    fn dropdown() -> CountryDropdown {
        let mut d = CountryDropdown::default();
        d.set_countries(vec![
            country("FR", "FRA", "France"),
            country("DE", "DEU", "Germany"),
            country("IE", "IRL", "Ireland"),
        ]);
        d
    }

    #[test]
    fn click_outside_closes_and_inside_keeps_open() {
        let mut d = dropdown();
        d.open("");
        d.set_area(Some(Rect::new(10, 5, 20, 6)));

        assert!(!dismiss_on_click(&mut d, 12, 7));
        assert!(d.is_open());

        assert!(dismiss_on_click(&mut d, 0, 0));
        assert!(!d.is_open());

        // Already closed: nothing to dismiss.
        assert!(!dismiss_on_click(&mut d, 0, 0));
    }

    #[test]
    fn open_without_area_closes_on_any_click() {
        let mut d = dropdown();
        d.open("fr");
        assert!(dismiss_on_click(&mut d, 12, 7));
    }

    #[test]
    fn border_rows_map_to_no_entry() {
        let area = Rect::new(1, 5, 44, 5);
        assert_eq!(bordered_list_row(area, 10, 5), None);
        assert_eq!(bordered_list_row(area, 10, 9), None);
        assert_eq!(bordered_list_row(area, 1, 7), None);
        assert_eq!(bordered_list_row(area, 10, 6), Some(0));
        assert_eq!(bordered_list_row(area, 10, 8), Some(2));
        assert_eq!(bordered_list_row(area, 10, 10), None);
    }

    #[test]
    fn selection_is_clamped_and_pick_closes() {
        let mut d = dropdown();
        d.open("an");
        let names: Vec<&str> = d.matches().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["France", "Germany", "Ireland"]);

        d.move_selection(5);
        assert_eq!(d.selected(), 2);
        d.move_selection(-1);
        let picked = d.pick().unwrap();
        assert_eq!(picked.code, "DE");
        assert!(!d.is_open());
    }

    #[test]
    fn name_lookup_accepts_both_code_lengths() {
        let d = dropdown();
        assert_eq!(d.name_of("fra"), Some("France"));
        assert_eq!(d.name_of("IE"), Some("Ireland"));
        assert_eq!(d.name_of("XX"), None);
    }
}
