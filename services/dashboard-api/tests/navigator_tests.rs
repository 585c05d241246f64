//! Location drill-down transitions against a scripted geocoder.

use std::sync::Arc;

use dashboard_api::navigator::{Depth, NavigationError, Navigator, NavigatorAction, NavigatorState};
use era5_common::{Continent, DashboardError};
use geocoding::{FeatureType, Geocoder};
use test_utils::{egypt, france, lyon, springfields, united_states, FakeGeocoder};

fn navigator(geocoder: FakeGeocoder) -> (Navigator, Arc<FakeGeocoder>) {
    let geocoder = Arc::new(geocoder);
    let shared: Arc<dyn Geocoder> = geocoder.clone();
    (Navigator::new(shared, 5), geocoder)
}

fn continental(continent: Continent) -> NavigatorState {
    NavigatorState::at(Depth::Continental { continent })
}

fn search_country(query: &str) -> NavigatorAction {
    NavigatorAction::SearchCountry {
        query: query.to_string(),
    }
}

fn search_city(query: &str) -> NavigatorAction {
    NavigatorAction::SearchCity {
        query: query.to_string(),
    }
}

async fn in_france(navigator: &Navigator) -> NavigatorState {
    navigator
        .apply(&continental(Continent::Europe), search_country("France"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_country_outside_continent_is_rejected() {
    let (navigator, _) = navigator(FakeGeocoder::new().respond("Egypt", vec![egypt()]));
    let state = continental(Continent::Europe);

    let err = navigator
        .apply(&state, search_country("Egypt"))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::Mismatch { .. }));
    assert_eq!(err.to_string(), "Egypt is not in Europe");
    assert!(matches!(
        DashboardError::from(err),
        DashboardError::GeographicMismatch(_)
    ));
    // The caller keeps the state it had.
    assert_eq!(state, continental(Continent::Europe));
}

#[tokio::test]
async fn test_country_in_continent_moves_to_national() {
    let (navigator, geocoder) = navigator(FakeGeocoder::new().respond("france", vec![france()]));

    let next = in_france(&navigator).await;

    match &next.depth {
        Depth::National { continent, country } => {
            assert_eq!(*continent, Continent::Europe);
            assert_eq!(country.name, "France");
            assert_eq!(country.iso_code, "FR");
        }
        other => panic!("expected national depth, got {other:?}"),
    }

    let queries = geocoder.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].feature_type, Some(FeatureType::Country));
    assert_eq!(queries[0].limit, 1);
}

#[tokio::test]
async fn test_single_city_match_goes_straight_to_citywide() {
    let (navigator, geocoder) = navigator(
        FakeGeocoder::new()
            .respond("France", vec![france()])
            .respond("Lyon", vec![lyon()]),
    );
    let national = in_france(&navigator).await;

    let next = navigator.apply(&national, search_city("Lyon")).await.unwrap();

    match &next.depth {
        Depth::Citywide { city, country, .. } => {
            assert_eq!(city.name, "Lyon");
            assert_eq!(city.point.lat, 45.7578);
            assert_eq!(city.point.lon, 4.8320);
            assert_eq!(country.iso_code, "FR");
        }
        other => panic!("expected citywide depth, got {other:?}"),
    }
    assert!(next.pending_cities.is_empty());

    let city_query = &geocoder.queries()[1];
    assert_eq!(city_query.country_codes.as_deref(), Some("fr"));
    assert_eq!(city_query.limit, 5);
}

#[tokio::test]
async fn test_several_city_matches_wait_for_a_choice() {
    let (navigator, _) = navigator(
        FakeGeocoder::new()
            .respond("United States", vec![united_states()])
            .respond("Springfield", springfields()),
    );
    let national = navigator
        .apply(
            &continental(Continent::NorthAmerica),
            search_country("United States"),
        )
        .await
        .unwrap();

    let pending = navigator
        .apply(&national, search_city("Springfield"))
        .await
        .unwrap();
    assert!(matches!(pending.depth, Depth::National { .. }));
    assert_eq!(pending.pending_cities.len(), 2);

    let err = navigator
        .apply(&pending, NavigatorAction::ChooseCity { index: 2 })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NavigationError::InvalidChoice {
            index: 2,
            available: 2
        }
    ));

    let chosen = navigator
        .apply(&pending, NavigatorAction::ChooseCity { index: 1 })
        .await
        .unwrap();
    match &chosen.depth {
        Depth::Citywide { city, .. } => assert_eq!(city.point.lat, 37.2090),
        other => panic!("expected citywide depth, got {other:?}"),
    }
    assert!(chosen.pending_cities.is_empty());
}

#[tokio::test]
async fn test_other_transitions_drop_pending_choice() {
    let (navigator, _) = navigator(
        FakeGeocoder::new()
            .respond("United States", vec![united_states()])
            .respond("Springfield", springfields()),
    );
    let national = navigator
        .apply(
            &continental(Continent::NorthAmerica),
            search_country("United States"),
        )
        .await
        .unwrap();
    let pending = navigator
        .apply(&national, search_city("Springfield"))
        .await
        .unwrap();

    let cleared = navigator
        .apply(&pending, NavigatorAction::ClearCity)
        .await
        .unwrap();
    assert!(cleared.pending_cities.is_empty());
    assert_eq!(cleared.depth, national.depth);
}

#[tokio::test]
async fn test_empty_query_makes_no_call() {
    let (navigator, geocoder) = navigator(FakeGeocoder::new());

    let err = navigator
        .apply(&continental(Continent::Asia), search_country("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::EmptyQuery));
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn test_no_match_and_remote_failure() {
    let (navigator, _) = navigator(FakeGeocoder::new().fail("Atlantis", 503));
    let state = continental(Continent::Europe);

    let err = navigator
        .apply(&state, search_country("Narnia"))
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::NoMatch(ref q) if q == "Narnia"));

    let err = navigator
        .apply(&state, search_country("Atlantis"))
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::Remote(_)));
    assert_eq!(DashboardError::from(err).http_status_code(), 502);
}

#[tokio::test]
async fn test_transitions_out_of_wrong_depth_are_rejected() {
    let (navigator, geocoder) = navigator(FakeGeocoder::new());

    for action in [
        search_country("France"),
        search_city("Lyon"),
        NavigatorAction::ClearCountry,
        NavigatorAction::ClearCity,
        NavigatorAction::ChooseCity { index: 0 },
    ] {
        let err = navigator
            .apply(&NavigatorState::default(), action)
            .await
            .unwrap_err();
        assert!(
            matches!(err, NavigationError::InvalidTransition { depth: "global", .. }),
            "unexpected error {err:?}"
        );
    }
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn test_clearing_and_resetting() {
    let (navigator, _) = navigator(
        FakeGeocoder::new()
            .respond("France", vec![france()])
            .respond("Lyon", vec![lyon()]),
    );
    let national = in_france(&navigator).await;
    let citywide = navigator.apply(&national, search_city("Lyon")).await.unwrap();

    let back = navigator
        .apply(&citywide, NavigatorAction::ClearCity)
        .await
        .unwrap();
    assert_eq!(back, national);

    let continent = navigator
        .apply(&citywide, NavigatorAction::ClearCountry)
        .await
        .unwrap();
    assert_eq!(continent, continental(Continent::Europe));

    let switched = navigator
        .apply(
            &citywide,
            NavigatorAction::SelectContinent {
                continent: Continent::Africa,
            },
        )
        .await
        .unwrap();
    assert_eq!(switched, continental(Continent::Africa));
    assert!(switched.selection().country.is_none());

    let world = navigator
        .apply(&citywide, NavigatorAction::ResetWorld)
        .await
        .unwrap();
    assert_eq!(world, NavigatorState::default());
}

#[tokio::test]
async fn test_new_country_search_replaces_city() {
    let (navigator, _) = navigator(
        FakeGeocoder::new()
            .respond("France", vec![france()])
            .respond("Lyon", vec![lyon()])
            .respond("Germany", vec![test_utils::candidate("Germany", 51.1, 10.4, "DE")]),
    );
    let national = in_france(&navigator).await;
    let citywide = navigator.apply(&national, search_city("Lyon")).await.unwrap();

    let next = navigator
        .apply(&citywide, search_country("Germany"))
        .await
        .unwrap();
    let selection = next.selection();
    assert_eq!(selection.country.unwrap().iso_code, "DE");
    assert!(selection.city.is_none());
}
