//! Integration tests for the fusion engine
//!
//! Covers:
//! - Single and multi-source passes through the raw store
//! - Preference and validity interplay
//! - Degenerate (cancelling) contributions
//! - Notification ordering and suppression

mod common;

use fixfuse_core::{
    ChangeSet, FusionConfig, FusionEngine, GeoPoint, Location, PositionAttribute, Preference,
    RawLocationStore, Validity,
};

use common::{FixBuilder, T0};

#[test]
fn single_source_fuses_to_itself() {
    let engine = FusionEngine::default();
    let raw = FixBuilder::gps()
        .at(48.137, 11.575)
        .radius(4.0)
        .speed(72.0)
        .bearing(270.0)
        .altitude(520.0)
        .sats(12, 9)
        .build();

    let mut fused = Location::new();
    engine.fuse(&[raw], &mut fused);

    assert_eq!(fused.position(), raw.position());
    assert_eq!(fused.accuracy(), Some(4.0));
    assert_eq!(fused.speed(), Some(72.0));
    assert_eq!(fused.bearing(), Some(270.0));
    assert_eq!(fused.altitude(), Some(520.0));
    assert_eq!(fused.sat_data(), Some((12, 9)));
    assert_eq!(fused.validity(), Validity::Valid);
    assert_eq!(fused.preference(), Preference::High);
    assert_eq!(fused.fix_time(), T0);
}

#[test]
fn first_fix_over_zeroed_location() {
    let engine = FusionEngine::default();
    let raw = FixBuilder::gps().at(10.0, 20.0).radius(5.0).build();

    let mut fused = Location::new();
    let changes = engine.fuse(&[raw], &mut fused);

    assert_eq!(fused.validity(), Validity::Valid);
    assert_eq!(fused.position(), Some(GeoPoint::new(10.0, 20.0)));
    assert_eq!(fused.speed(), None);
    assert_eq!(
        &engine.notifications(&changes)[..],
        &[PositionAttribute::Validity, PositionAttribute::Position]
    );
}

#[test]
fn identical_passes_are_silent() {
    let engine = FusionEngine::default();
    let raw = [
        FixBuilder::gps().at(10.0, 20.0).radius(5.0).sats(8, 6).build(),
        FixBuilder::gps().at(10.0001, 20.0001).radius(8.0).build(),
        FixBuilder::network().at(10.01, 20.01).radius(300.0).build(),
    ];

    let mut fused = Location::new();
    let first = engine.fuse(&raw, &mut fused);
    assert!(!first.is_empty());

    let second = engine.fuse(&raw, &mut fused);
    assert!(second.is_empty(), "second pass reported {}", second);
    assert!(engine.notifications(&second).is_empty());
}

#[test]
fn two_fixes_fuse_towards_the_more_accurate() {
    let engine = FusionEngine::default();
    let precise = FixBuilder::gps().at(0.0, 0.0).radius(5.0).build();
    let coarse = FixBuilder::gps().at(0.0, 0.001).radius(20.0).build();

    let mut fused = Location::new();
    engine.fuse(&[precise, coarse], &mut fused);

    let p = fused.position().unwrap();
    assert!(p.lng > 0.0 && p.lng < 0.0005, "lng {} not biased to precise fix", p.lng);
    assert_within_tolerance!(p.lat, 0.0, 1e-9);
    // fused accuracy beats both inputs
    assert!(fused.accuracy().unwrap() < 5.0);

    // order of the raw set does not change the estimate
    let mut swapped = Location::new();
    engine.fuse(&[coarse, precise], &mut swapped);
    let q = swapped.position().unwrap();
    assert_within_tolerance!(q.lng, p.lng, 1e-9);
}

#[test]
fn fresh_network_beats_stale_gps() {
    let engine = FusionEngine::default();
    let raw = [
        FixBuilder::gps()
            .at(1.0, 1.0)
            .validity(Validity::ExtrapolatedTime)
            .build(),
        FixBuilder::network().at(2.0, 2.0).radius(100.0).build(),
    ];

    let mut fused = Location::new();
    engine.fuse(&raw, &mut fused);
    assert_eq!(fused.position(), Some(GeoPoint::new(2.0, 2.0)));
    assert_eq!(fused.preference(), Preference::Medium);
    assert_eq!(fused.validity(), Validity::Valid);
}

#[test]
fn satellites_from_speed_only_source() {
    let engine = FusionEngine::default();
    let raw = [
        FixBuilder::gps().at(48.0, 11.0).radius(5.0).build(),
        FixBuilder::network().speed(40.0).sats(9, 6).build(),
    ];

    let mut fused = Location::new();
    let changes = engine.fuse(&raw, &mut fused);
    assert_eq!(fused.speed(), Some(40.0));
    assert_eq!(fused.sat_data(), Some((9, 6)));
    assert_eq!(fused.preference(), Preference::High);
    assert!(engine
        .notifications(&changes)
        .contains(&PositionAttribute::SatelliteCount));
}

#[test]
fn outranked_source_keeps_its_metadata() {
    let engine = FusionEngine::default();
    let raw = [
        FixBuilder::gps().speed(50.0).fix_type(1).fix_time(1_000).build(),
        FixBuilder::new(Preference::Low)
            .speed(20.0)
            .fix_type(3)
            .fix_time(9_000)
            .build(),
    ];

    let mut fused = Location::new();
    engine.fuse(&raw, &mut fused);
    assert_eq!(fused.speed(), Some(50.0));
    assert_eq!(fused.fix_type(), 1);
    assert_eq!(fused.fix_time(), 1_000);
    assert_eq!(fused.preference(), Preference::High);
}

#[test]
fn antipodal_bearings_are_skipped() {
    let engine = FusionEngine::default();
    let mut fused = Location::new();
    engine.fuse(&[FixBuilder::gps().at(0.0, 0.0).bearing(45.0).build()], &mut fused);

    let raw = [
        FixBuilder::gps().at(0.0, 0.0).radius(5.0).bearing(90.0).build(),
        FixBuilder::gps().at(0.0, 0.0).radius(5.0).bearing(270.0).build(),
    ];
    let changes = engine.fuse(&raw, &mut fused);

    let bearing = fused.bearing().unwrap();
    assert!(!bearing.is_nan());
    assert_eq!(bearing, 45.0);
    assert!(!changes.contains(PositionAttribute::Bearing));
}

#[test]
fn antipodal_positions_keep_previous() {
    let engine = FusionEngine::default();
    let mut fused = Location::new();
    engine.fuse(&[FixBuilder::gps().at(5.0, 5.0).radius(5.0).build()], &mut fused);

    let raw = [
        FixBuilder::gps().at(10.0, 20.0).radius(5.0).build(),
        FixBuilder::gps().at(-10.0, -160.0).radius(5.0).build(),
    ];
    engine.fuse(&raw, &mut fused);
    assert_eq!(fused.position(), Some(GeoPoint::new(5.0, 5.0)));
    assert_eq!(fused.validity(), Validity::Valid);
}

#[test]
fn invalidation_announces_validity_only() {
    let engine = FusionEngine::new(FusionConfig {
        notify_motion: true,
        ..FusionConfig::default()
    })
    .unwrap();
    let mut fused = Location::new();
    engine.fuse(&[FixBuilder::gps().at(1.0, 1.0).speed(30.0).build()], &mut fused);

    let lost = FixBuilder::gps()
        .at(7.0, 7.0)
        .fix_time(T0 + 1_000)
        .validity(Validity::Invalid)
        .build();
    let changes = engine.fuse(&[lost], &mut fused);

    assert_eq!(fused.validity(), Validity::Invalid);
    assert_eq!(fused.position(), Some(GeoPoint::new(1.0, 1.0)));
    assert_eq!(
        &engine.notifications(&changes)[..],
        &[PositionAttribute::Validity]
    );

    // staying invalid is not a change
    let again = engine.fuse(&[lost], &mut fused);
    assert!(engine.notifications(&again).is_empty());
}

#[test]
fn motion_notifications_follow_core_order() {
    let engine = FusionEngine::new(FusionConfig {
        notify_motion: true,
        ..FusionConfig::default()
    })
    .unwrap();
    let raw = FixBuilder::gps()
        .at(1.0, 1.0)
        .speed(30.0)
        .bearing(10.0)
        .altitude(100.0)
        .build();

    let mut fused = Location::new();
    let changes = engine.fuse(&[raw], &mut fused);
    assert_eq!(
        &engine.notifications(&changes)[..],
        &[
            PositionAttribute::Validity,
            PositionAttribute::Position,
            PositionAttribute::Speed,
            PositionAttribute::Bearing,
            PositionAttribute::Altitude,
        ]
    );

    // the default engine records but does not announce them
    let mut fused = Location::new();
    let changes = FusionEngine::default().fuse(&[raw], &mut fused);
    assert!(changes.contains(PositionAttribute::Speed));
    assert_eq!(FusionEngine::default().notifications(&changes).len(), 2);
}

#[test]
fn store_driven_passes() {
    let engine = FusionEngine::default();
    let mut store = RawLocationStore::new();
    let gps = store.register(Preference::High).unwrap();
    let net = store.register(Preference::Medium).unwrap();

    let mut fused = Location::new();
    // empty slots are invalid and never contribute
    let changes = engine.fuse(store.as_slice(), &mut fused);
    assert!(changes.is_empty());

    store
        .update(net, FixBuilder::new(Preference::High).at(3.0, 3.0).radius(0.0).build())
        .unwrap();
    engine.fuse(store.as_slice(), &mut fused);
    assert_eq!(fused.preference(), Preference::Medium);
    assert_eq!(fused.accuracy(), Some(1.0));

    store
        .update(gps, FixBuilder::gps().at(4.0, 4.0).radius(10.0).sats(7, 5).build())
        .unwrap();
    let changes = engine.fuse(store.as_slice(), &mut fused);
    assert_eq!(fused.position(), Some(GeoPoint::new(4.0, 4.0)));
    assert_eq!(fused.sat_data(), Some((7, 5)));
    assert_eq!(
        &changes.notifications(false)[..],
        &[
            PositionAttribute::SatelliteCount,
            PositionAttribute::SatellitesUsed,
            PositionAttribute::Position,
        ]
    );
    assert!(changes.bits() & ChangeSet::ACCURACY != 0);
}
