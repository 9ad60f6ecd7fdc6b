//! Three-station epicenter location walk-through

use epicenter::{
    hypocentral_range, GeoPosition, SurveyConfig, SurveySession,
};

fn main() {
    println!("=== Epicenter Location Demo ===\n");

    demonstrate_range_derivation();
    demonstrate_session_location();
    demonstrate_config_serialization();
}

fn demonstrate_range_derivation() {
    println!("1. Range derivation:");
    let vp = 6.0;
    let vs = 3.5;
    for interval in [2.0, 5.0, 8.0] {
        let range = hypocentral_range(interval, vp, vs).expect("velocities differ");
        println!("   PS interval {:>4.1} s  ->  range {:>6.1} km", interval, range);
    }
    println!();
}

fn demonstrate_session_location() {
    println!("2. Locating a synthetic event:");
    let mut session = SurveySession::new();

    let stations = [(36.0, 127.0), (36.8, 128.2), (37.2, 126.8)];
    for &(lat, lon) in &stations {
        session.add_station(lat, lon).expect("station accepted");
    }

    // intervals consistent with a source at 36.5 N, 127.5 E
    let truth = GeoPosition { lat: 36.5, lon: 127.5 };
    let source = session.frame().to_planar(truth);
    let factor = session.model().conversion_factor();
    for (i, &(lat, lon)) in stations.iter().enumerate() {
        let site = session.frame().to_planar(GeoPosition { lat, lon });
        let interval = site.distance_to(&source) / factor;
        session.set_interval(i, interval).expect("index in range");
        println!(
            "   station {} at {:.1} N {:.1} E: PS {:.2} s, range {:.1} km",
            i + 1,
            lat,
            lon,
            interval,
            session.station_ranges()[i]
        );
    }

    match session.locate() {
        Ok(estimate) if estimate.converged => println!(
            "   estimated epicenter: {:.4} N, {:.4} E\n",
            estimate.position.lat, estimate.position.lon
        ),
        Ok(_) => println!("   solve did not converge\n"),
        Err(e) => println!("   location failed: {}\n", e),
    }
}

fn demonstrate_config_serialization() {
    println!("3. Survey configuration as JSON:");
    let config = SurveyConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("   serialization failed: {}", e),
    }
}
