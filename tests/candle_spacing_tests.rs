use candle_chart::core::{ONE_DAY_SECONDS, Sample, SampleSet, candle_spacing};
use candle_chart::error::ChartError;

fn sample_at(time: f64) -> Sample {
    Sample::new(time, 10.0, 12.0, 9.0, 11.0).expect("valid sample")
}

#[test]
fn spacing_is_minimum_adjacent_gap() {
    let day = ONE_DAY_SECONDS;
    let samples = vec![
        sample_at(0.0),
        sample_at(3.0 * day),
        sample_at(4.0 * day),
        sample_at(10.0 * day),
    ];

    let spacing = candle_spacing(&samples).expect("spacing");
    assert_eq!(spacing, day);
}

#[test]
fn spacing_handles_unsorted_input() {
    let samples = vec![sample_at(500.0), sample_at(0.0), sample_at(400.0)];

    let spacing = candle_spacing(&samples).expect("spacing");
    assert_eq!(spacing, 100.0);
}

#[test]
fn three_samples_on_days_one_two_four_yield_one_day() {
    let day = ONE_DAY_SECONDS;
    let samples = vec![sample_at(1.0 * day), sample_at(2.0 * day), sample_at(4.0 * day)];

    let spacing = candle_spacing(&samples).expect("spacing");
    assert_eq!(spacing, day);
}

#[test]
fn tied_minimum_gaps_return_the_shared_value() {
    let samples = vec![
        sample_at(0.0),
        sample_at(60.0),
        sample_at(300.0),
        sample_at(360.0),
    ];

    let spacing = candle_spacing(&samples).expect("spacing");
    assert_eq!(spacing, 60.0);
}

#[test]
fn fewer_than_two_samples_is_an_error() {
    let err = candle_spacing(&[]).expect_err("empty should fail");
    assert!(matches!(err, ChartError::EmptyDataset));

    let err = candle_spacing(&[sample_at(0.0)]).expect_err("single should fail");
    assert!(matches!(err, ChartError::EmptyDataset));
}

#[test]
fn sample_set_falls_back_to_one_day_sentinel() {
    let set = SampleSet::new(vec![sample_at(42.0)]);
    assert_eq!(set.spacing(), ONE_DAY_SECONDS);

    let empty = SampleSet::new(Vec::new());
    assert_eq!(empty.spacing(), ONE_DAY_SECONDS);
}

#[test]
fn sample_set_sorts_by_time_and_keeps_extent() {
    let set = SampleSet::new(vec![sample_at(900.0), sample_at(100.0), sample_at(500.0)]);

    let times: Vec<f64> = set.samples().iter().map(|s| s.time).collect();
    assert_eq!(times, vec![100.0, 500.0, 900.0]);
    assert_eq!(set.extent(), Some((100.0, 900.0)));
    assert_eq!(set.spacing(), 400.0);
}
