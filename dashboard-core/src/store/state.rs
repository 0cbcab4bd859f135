use crate::model::{CitySearchResult, CurrentWeather, ForecastSeries, Location};

/// Pending flags of the two independent request flows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loading {
    pub weather: bool,
    pub search: bool,
}

/// Everything the dashboard views read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub selected_location: Option<Location>,
    pub current_weather: Option<CurrentWeather>,
    pub forecast: ForecastSeries,
    pub searched_cities: Vec<CitySearchResult>,
    pub loading: Loading,
    pub error: Option<String>,
}

impl WeatherState {
    /// Both halves of the weather data are present.
    pub fn has_weather(&self) -> bool {
        self.current_weather.is_some() && !self.forecast.is_empty()
    }

    /// Applies one state transition in place.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::LocationSelected(location) => {
                self.selected_location = Some(location);
                self.error = None;
            }
            Action::ErrorCleared => {
                self.error = None;
            }
            Action::WeatherDataCleared => {
                self.clear_weather_data();
            }
            Action::WeatherPending => {
                self.loading.weather = true;
                self.error = None;
            }
            Action::WeatherFulfilled { current, forecast } => {
                self.loading.weather = false;
                self.current_weather = Some(*current);
                self.forecast = forecast;
                self.error = None;
            }
            Action::WeatherRejected { message } => {
                self.loading.weather = false;
                self.clear_weather_data();
                self.error = Some(message);
            }
            Action::SearchPending => {
                self.loading.search = true;
            }
            Action::SearchFulfilled(cities) => {
                self.loading.search = false;
                self.searched_cities = cities;
            }
            Action::SearchRejected => {
                self.loading.search = false;
                self.searched_cities.clear();
            }
        }
    }

    fn clear_weather_data(&mut self) {
        self.current_weather = None;
        self.forecast = ForecastSeries::default();
    }
}

/// State transitions of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LocationSelected(Location),
    ErrorCleared,
    WeatherDataCleared,
    WeatherPending,
    WeatherFulfilled {
        current: Box<CurrentWeather>,
        forecast: ForecastSeries,
    },
    WeatherRejected {
        message: String,
    },
    SearchPending,
    SearchFulfilled(Vec<CitySearchResult>),
    SearchRejected,
}

/// `(state, action) -> state`.
pub fn reduce(mut state: WeatherState, action: Action) -> WeatherState {
    state.apply(action);
    state
}
