//! End-to-end settlement scenarios for both index realizations

mod common;

use common::{calendar_service, cl_index, date, flat_prices, wav_index};
use pretty_assertions::assert_eq;
use rolling_index::{IndexError, SettlementEngine, StaticPriceService};

fn lookup(series: &[(chrono::NaiveDate, f64)], d: chrono::NaiveDate) -> f64 {
    series
        .iter()
        .find(|(day, _)| *day == d)
        .map(|(_, level)| *level)
        .unwrap_or_else(|| panic!("no published level on {d}"))
}

#[test]
fn single_asset_level_is_continuous_through_a_flat_roll() {
    // Near and far both flat: rolling out of CLK25 into CLN25 must not
    // move the level at all
    let calendars = calendar_service();
    let prices = flat_prices(
        &[
            ("CLK25 Comdty", 50.0),
            ("CLN25 Comdty", 40.0),
            ("CLU25 Comdty", 45.0),
        ],
        date(2025, 4, 1),
        120,
    );
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = cl_index(date(2025, 4, 1), None);

    let series = engine
        .settlement_series(&definition, date(2025, 5, 30))
        .unwrap();
    assert!(!series.is_empty());
    for (day, level) in &series {
        assert_eq!(*level, 100.0, "level moved on {day}");
    }
}

#[test]
fn single_asset_level_tracks_far_contract_after_roll() {
    // The April roll converts 2 CLK25 units (at 50) into 2.5 CLN25 units
    // (at 40). A 4-point move in CLN25 after the roll is worth 10 points
    // of level.
    let calendars = calendar_service();
    let mut prices = StaticPriceService::new();
    prices.insert_series(
        "CLK25 Comdty",
        date(2025, 4, 1).iter_days().take(60).map(|d| (d, 50.0)),
    );
    prices.insert_series(
        "CLN25 Comdty",
        date(2025, 4, 1)
            .iter_days()
            .take(60)
            .map(|d| (d, if d < date(2025, 4, 21) { 40.0 } else { 44.0 })),
    );
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = cl_index(date(2025, 4, 1), None);

    let series = engine
        .settlement_series(&definition, date(2025, 4, 30))
        .unwrap();
    // Before the price move the level is flat through the entire roll
    assert_eq!(lookup(&series, date(2025, 4, 14)), 100.0);
    assert_eq!(lookup(&series, date(2025, 4, 15)), 100.0);
    // After the move the index holds 2.5 far units
    assert_eq!(lookup(&series, date(2025, 4, 21)), 110.0);
    assert_eq!(lookup(&series, date(2025, 4, 30)), 110.0);
}

#[test_log::test]
fn halt_spanning_the_window_defers_and_then_snaps() {
    // Trading is halted for every day of the April window (publishing
    // days 5 through 10 are April 7-14). The index keeps its stale CLK25
    // exposure, marks against CLK25 moves, and converts in full the day
    // the halt clears.
    let calendars = {
        let mut calendars = calendar_service();
        calendars.insert_weekdays(
            "CLHalt",
            [
                date(2025, 4, 7),
                date(2025, 4, 8),
                date(2025, 4, 9),
                date(2025, 4, 10),
                date(2025, 4, 11),
                date(2025, 4, 14),
            ],
        );
        calendars
    };
    let mut prices = StaticPriceService::new();
    prices.insert_series(
        "CLK25 Comdty",
        date(2025, 4, 1)
            .iter_days()
            .take(60)
            .map(|d| (d, if d < date(2025, 4, 10) { 50.0 } else { 52.0 })),
    );
    prices.insert_series(
        "CLN25 Comdty",
        date(2025, 4, 1)
            .iter_days()
            .take(60)
            .map(|d| (d, if d < date(2025, 4, 21) { 40.0 } else { 44.0 })),
    );
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = cl_index(date(2025, 4, 1), Some("CLHalt"));

    let series = engine
        .settlement_series(&definition, date(2025, 4, 30))
        .unwrap();

    // Still holding 2 CLK25 units mid-halt: the 2-point CLK25 move marks
    // the level up even though the nominal blend weight is long past
    assert_eq!(lookup(&series, date(2025, 4, 10)), 104.0);
    // Halt suppresses completion at the window end
    assert_eq!(lookup(&series, date(2025, 4, 14)), 104.0);
    // The day the halt clears, units snap to the 2.5-unit CLN25 target
    // captured at the window open; the level re-bases at the conversion
    assert_eq!(lookup(&series, date(2025, 4, 15)), 100.0);
    // From then on the index is fully on the far contract
    assert_eq!(lookup(&series, date(2025, 4, 21)), 110.0);
}

#[test_log::test]
fn negative_window_rolls_across_the_month_boundary() {
    // A [-2,3] window: the April-opened cycle finishes on May's third
    // publishing day. April 2025 has 22 publishing days, so the roll runs
    // April 29-30 then May 1-2, snapping complete on May 5.
    let calendars = calendar_service();
    let mut prices = StaticPriceService::new();
    prices.insert_series(
        "CLK25 Comdty",
        date(2025, 4, 1).iter_days().take(120).map(|d| (d, 50.0)),
    );
    prices.insert_series(
        "CLN25 Comdty",
        date(2025, 4, 1)
            .iter_days()
            .take(120)
            .map(|d| (d, if d < date(2025, 5, 12) { 40.0 } else { 44.0 })),
    );
    prices.insert_series(
        "CLU25 Comdty",
        date(2025, 4, 1).iter_days().take(120).map(|d| (d, 45.0)),
    );
    let mut definition = cl_index(date(2025, 4, 1), None);
    if let rolling_index::IndexDefinition::SingleAsset(config) = &mut definition {
        config.roll_period = (-2, 3);
    }
    let engine = SettlementEngine::new(&prices, &calendars);

    let series = engine
        .settlement_series(&definition, date(2025, 6, 20))
        .unwrap();
    // Flat through the whole month-crossing roll
    assert_eq!(lookup(&series, date(2025, 4, 28)), 100.0);
    assert_eq!(lookup(&series, date(2025, 4, 30)), 100.0);
    assert_eq!(lookup(&series, date(2025, 5, 2)), 100.0);
    assert_eq!(lookup(&series, date(2025, 5, 5)), 100.0);
    // After completion the index holds 2.5 CLN25 units; the 4-point move
    // from May 12 is worth 10 points of level
    assert_eq!(lookup(&series, date(2025, 5, 9)), 100.0);
    assert_eq!(lookup(&series, date(2025, 5, 12)), 110.0);
    assert_eq!(lookup(&series, date(2025, 6, 20)), 110.0);
}

#[test]
fn missing_price_withholds_publication_mid_series() {
    let calendars = calendar_service();
    // Prices stop on April 10
    let prices = flat_prices(
        &[("CLK25 Comdty", 50.0), ("CLN25 Comdty", 40.0)],
        date(2025, 4, 1),
        10,
    );
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = cl_index(date(2025, 4, 1), None);

    // Up to the data horizon the index prices fine
    assert_eq!(
        engine
            .settlement_level(&definition, date(2025, 4, 10))
            .unwrap(),
        100.0
    );
    // Beyond it, the missing price is an error, not a defaulted level
    let err = engine
        .settlement_series(&definition, date(2025, 4, 30))
        .unwrap_err();
    assert!(matches!(err, IndexError::MissingPrice { .. }));
}

#[test]
fn as_of_before_start_date_is_a_configuration_error() {
    let calendars = calendar_service();
    let prices = StaticPriceService::new();
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = cl_index(date(2025, 4, 1), None);
    assert!(matches!(
        engine.settlement_level(&definition, date(2025, 3, 1)),
        Err(IndexError::Configuration(_))
    ));
}

#[test]
fn wav_index_is_flat_when_every_price_is_flat() {
    // Flat prices make today's blended WAV equal yesterday's on every
    // day, including across the roll and the month boundary, so the
    // ratio recurrence publishes the initial level forever
    let calendars = calendar_service();
    let prices = flat_prices(
        &[
            ("CLH25 Comdty", 70.0),
            ("CLK25 Comdty", 68.0),
            ("GCG25 Comdty", 2650.0),
            ("GCJ25 Comdty", 2700.0),
        ],
        date(2025, 1, 2),
        90,
    );
    let engine = SettlementEngine::new(&prices, &calendars);
    let definition = wav_index(date(2025, 1, 2));

    let series = engine
        .settlement_series(&definition, date(2025, 2, 28))
        .unwrap();
    assert!(series.len() > 30);
    for (day, level) in &series {
        assert_eq!(*level, 100.0, "level moved on {day}");
    }
}

#[test]
fn wav_index_rebases_on_the_new_roll_period() {
    // A single-asset composition makes the ratio arithmetic visible:
    // after January's roll the index tracks the far contract, and the
    // February re-basing divides by the prior far WAV
    let calendars = calendar_service();
    let mut prices = StaticPriceService::new();
    prices.insert_series(
        "GCG25 Comdty",
        date(2025, 1, 1).iter_days().take(90).map(|d| (d, 2600.0)),
    );
    prices.insert_series(
        "GCJ25 Comdty",
        date(2025, 1, 1)
            .iter_days()
            .take(90)
            .map(|d| (d, if d < date(2025, 2, 3) { 2700.0 } else { 2754.0 })),
    );
    // GCJ25 carries the index from the end of the January roll; February
    // 3 is the first publishing day of the new period
    let mut definition = wav_index(date(2025, 1, 2));
    if let rolling_index::IndexDefinition::WavRatio(config) = &mut definition {
        config.weights = [("GC".to_string(), 1.0)].into();
        config.roll_schedules.remove("CL");
    }
    let engine = SettlementEngine::new(&prices, &calendars);

    let series = engine
        .settlement_series(&definition, date(2025, 2, 14))
        .unwrap();
    // Flat through January: the roll blends two flat contracts
    assert_eq!(lookup(&series, date(2025, 1, 31)), 100.0);
    // 2754/2700 = 1.02: the new period re-bases against the prior far WAV
    assert_eq!(lookup(&series, date(2025, 2, 3)), 102.0);
    assert_eq!(lookup(&series, date(2025, 2, 14)), 102.0);
}

#[test]
fn wav_index_with_negative_window_fails_fast() {
    let calendars = calendar_service();
    let prices = StaticPriceService::new();
    let engine = SettlementEngine::new(&prices, &calendars);
    let mut definition = wav_index(date(2025, 1, 2));
    if let rolling_index::IndexDefinition::WavRatio(config) = &mut definition {
        config.roll_period = (-2, 3);
    }
    assert!(matches!(
        engine.settlement_level(&definition, date(2025, 1, 31)),
        Err(IndexError::Configuration(_))
    ));
}
