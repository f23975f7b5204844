use voltflow::advisor::ChargingRecommendation;
use voltflow::features::TrafficStatus;
use voltflow::model::linear_v2::{LinearV2Model, LinearV2Params, TrafficFactors};
use voltflow::model::schema;
use voltflow::planner::{TripRequest, evaluate_trip};
use voltflow::trip::mock::{
    MockElevationService, MockGeocoder, MockRoutingService, MockStationLocator,
};
use voltflow::trip::{ChargingStation, GeoPoint, GeocodedPlace};

const STATION_RADIUS_M: u32 = 5000;

/// Weights mirroring the synthetic generating formula's linear terms.
fn formula_model() -> LinearV2Model {
    let mut weights = vec![0.0; schema::NUMERIC_COUNT];
    weights[0] = -0.5; // battery_temp
    weights[3] = 5.0; // battery_capacity
    weights[4] = -0.02; // elevation
    weights[5] = -0.06; // speed
    weights[6] = -0.5; // wind_speed
    weights[7] = -10.0; // ac_usage
    LinearV2Model::new(LinearV2Params {
        weights,
        intercept: 0.0,
        traffic_factors: TrafficFactors::default(),
    })
}

fn geocoder() -> MockGeocoder {
    MockGeocoder::with_places(vec![
        (
            "Lyon, France".to_string(),
            GeocodedPlace {
                display_name: "Lyon, Auvergne-Rhône-Alpes, France".to_string(),
                lat: 45.76,
                lon: 4.84,
            },
        ),
        (
            "Grenoble, France".to_string(),
            GeocodedPlace {
                display_name: "Grenoble, Auvergne-Rhône-Alpes, France".to_string(),
                lat: 45.19,
                lon: 5.72,
            },
        ),
        (
            "Paris, France".to_string(),
            GeocodedPlace {
                display_name: "Paris, Île-de-France, France".to_string(),
                lat: 48.8566,
                lon: 2.3522,
            },
        ),
        (
            "Marseille, France".to_string(),
            GeocodedPlace {
                display_name: "Marseille, Provence-Alpes-Côte d'Azur, France".to_string(),
                lat: 43.2965,
                lon: 5.3698,
            },
        ),
    ])
}

fn request(source: &str, destination: &str, soc: f64, capacity: f64) -> TripRequest {
    TripRequest {
        source: source.to_string(),
        destination: destination.to_string(),
        soc_percent: soc,
        battery_capacity_kwh: capacity,
        battery_temp_c: 25.0,
        wind_speed_kmh: 10.0,
        ac_usage: false,
    }
}

#[tokio::test]
async fn short_trip_with_ample_range_needs_no_charge() {
    let model = formula_model();
    let elevation = MockElevationService::with_elevations(vec![
        (GeoPoint { lat: 45.76, lon: 4.84 }, 170.0),
        (GeoPoint { lat: 45.19, lon: 5.72 }, 212.0),
    ]);
    let routing = MockRoutingService::with_segment_ratios(vec![1.3]);
    let stations = MockStationLocator::default();

    let mut trip = request("Lyon, France", "Grenoble, France", 80.0, 75.0);
    trip.ac_usage = true;

    let evaluation = evaluate_trip(
        &geocoder(),
        &elevation,
        &routing,
        &stations,
        &model,
        &trip,
        STATION_RADIUS_M,
    )
    .await
    .expect("evaluation succeeds");

    assert!(
        (90.0..97.0).contains(&evaluation.distance_km),
        "unexpected distance {}",
        evaluation.distance_km
    );
    assert_eq!(evaluation.elevation_change_m, 42.0);
    assert!((evaluation.average_speed_kmh - 60.0).abs() < 0.5);
    assert_eq!(evaluation.traffic.len(), 1);
    assert_eq!(evaluation.traffic[0].status, TrafficStatus::Moderate);
    // Moderate traffic scales the linear estimate by 0.9.
    assert!(
        (300.0..320.0).contains(&evaluation.predicted_range_km),
        "unexpected range {}",
        evaluation.predicted_range_km
    );
    assert_eq!(
        evaluation.recommendation,
        ChargingRecommendation::NoChargeNeeded
    );
}

#[tokio::test]
async fn long_trip_charges_to_capped_percent() {
    let model = formula_model();
    let elevation = MockElevationService::flat(100.0);
    let routing = MockRoutingService::default();
    let stations = MockStationLocator::default();

    let trip = request("Paris, France", "Marseille, France", 50.0, 50.0);

    let evaluation = evaluate_trip(
        &geocoder(),
        &elevation,
        &routing,
        &stations,
        &model,
        &trip,
        STATION_RADIUS_M,
    )
    .await
    .expect("evaluation succeeds");

    assert!(
        (640.0..680.0).contains(&evaluation.distance_km),
        "unexpected distance {}",
        evaluation.distance_km
    );
    assert_eq!(evaluation.elevation_change_m, 0.0);
    assert!(evaluation.predicted_range_km < evaluation.distance_km);
    assert_eq!(
        evaluation.recommendation,
        ChargingRecommendation::ChargeToPercent(80)
    );
}

#[tokio::test]
async fn long_trip_with_low_soc_charges_immediately() {
    let model = formula_model();
    let elevation = MockElevationService::flat(0.0);
    let routing = MockRoutingService::default();
    let stations = MockStationLocator::default();

    let trip = request("Paris, France", "Marseille, France", 10.0, 50.0);

    let evaluation = evaluate_trip(
        &geocoder(),
        &elevation,
        &routing,
        &stations,
        &model,
        &trip,
        STATION_RADIUS_M,
    )
    .await
    .expect("evaluation succeeds");

    assert_eq!(
        evaluation.recommendation,
        ChargingRecommendation::ChargeImmediately
    );
}

#[tokio::test]
async fn best_station_minimizes_detour() {
    let model = formula_model();
    let elevation = MockElevationService::flat(0.0);
    let routing = MockRoutingService::default();
    let stations = MockStationLocator::with_stations(vec![
        ChargingStation {
            name: "Midway Chargers".to_string(),
            vicinity: "A6, Burgundy".to_string(),
            lat: 46.08,
            lon: 3.86,
        },
        ChargingStation {
            name: "Northern Detour".to_string(),
            vicinity: "London".to_string(),
            lat: 51.5,
            lon: -0.12,
        },
    ]);

    let trip = request("Paris, France", "Marseille, France", 50.0, 50.0);

    let evaluation = evaluate_trip(
        &geocoder(),
        &elevation,
        &routing,
        &stations,
        &model,
        &trip,
        STATION_RADIUS_M,
    )
    .await
    .expect("evaluation succeeds");

    // The locator answers for both route waypoints; duplicates collapse.
    assert_eq!(evaluation.stations.len(), 2);
    let best = evaluation.best_station.expect("a best station is chosen");
    assert_eq!(best.name, "Midway Chargers");
}

#[tokio::test]
async fn unknown_place_fails_with_trip_error() {
    let model = formula_model();
    let elevation = MockElevationService::flat(0.0);
    let routing = MockRoutingService::default();
    let stations = MockStationLocator::default();

    let trip = request("Atlantis", "Marseille, France", 50.0, 50.0);

    let result = evaluate_trip(
        &geocoder(),
        &elevation,
        &routing,
        &stations,
        &model,
        &trip,
        STATION_RADIUS_M,
    )
    .await;

    assert!(matches!(
        result,
        Err(voltflow::error::AppError::Trip(_))
    ));
}
