//! Search-as-you-type for the interactive dashboard.

use std::sync::Arc;

use dashboard_core::{
    CitySearchResult, Location, WeatherState, WeatherStore, debounce::SearchDebouncer,
};
use inquire::{
    Autocomplete, CustomUserError, autocompletion::Replacement, list_option::ListOption,
};

/// Autocompleter that forwards every keystroke to the debounced search and
/// offers whatever results the store holds at that moment.
#[derive(Debug, Clone)]
pub struct CitySuggester {
    store: Arc<WeatherStore>,
    debouncer: Arc<SearchDebouncer>,
}

impl CitySuggester {
    pub fn new(store: Arc<WeatherStore>, debouncer: Arc<SearchDebouncer>) -> Self {
        Self { store, debouncer }
    }
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        self.debouncer.query_changed(input);
        Ok(suggestions(&self.store.snapshot()))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

pub fn suggestions(state: &WeatherState) -> Vec<String> {
    state.searched_cities.iter().map(|c| c.full_name.clone()).collect()
}

/// Location behind a picked list entry. Resolved by position, since several
/// results can share the same display name.
pub fn chosen_location(
    results: &[CitySearchResult],
    choice: &ListOption<String>,
) -> Option<Location> {
    results.get(choice.index).map(Location::from)
}
