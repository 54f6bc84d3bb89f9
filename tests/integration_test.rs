//! Integration tests for the CSV-to-signal pipeline.
//!
//! Tests cover:
//! - Full scan pipeline from a CSV feed on disk
//! - KDJ computation through a mock data port
//! - Determinism across repeated reads of the same feed
//! - Warm-up boundary behavior (exactly one window of bars)
//! - Export roundtrip and filename format
//! - Chart rendering from fetched bars

mod common;

use common::*;
use kdjtrader::adapters::csv_adapter::CsvAdapter;
use kdjtrader::adapters::svg_chart_adapter::render_candle_chart;
use kdjtrader::domain::error::KdjTraderError;
use kdjtrader::domain::kdj::{compute_kdj, KdjParams};
use kdjtrader::domain::scan::scan_signals;
use kdjtrader::domain::signal::Signal;
use kdjtrader::ports::data_port::DataPort;
use std::fs;
use tempfile::TempDir;

fn write_feed(dir: &TempDir, ticker: &str, closes: &[f64]) -> std::path::PathBuf {
    let bars = make_bars(ticker, closes);
    let path = dir.path().join(format!("{}.csv", ticker));
    fs::write(&path, bars_to_csv(&bars)).unwrap();
    dir.path().to_path_buf()
}

mod full_scan_pipeline {
    use super::*;

    #[test]
    fn csv_feed_to_signals() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);

        let adapter = CsvAdapter::new(root);
        let bars = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        assert_eq!(bars.len(), 15);

        let events = scan_signals(&bars, &KdjParams::default()).unwrap();

        let buys: Vec<_> = events.iter().filter(|e| e.signal == Signal::Buy).collect();
        let sells: Vec<_> = events.iter().filter(|e| e.signal == Signal::Sell).collect();

        assert_eq!(buys.len(), 1);
        assert_eq!(sells.len(), 1);
        // Buy on the rally bar, sell on the next.
        assert_eq!(buys[0].date, date(2024, 1, 13));
        assert_eq!(sells[0].date, date(2024, 1, 14));
        assert!(buys[0].date < sells[0].date);
    }

    #[test]
    fn date_range_narrows_the_scan() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);

        let adapter = CsvAdapter::new(root);
        // Cut the rally off: only the first 11 bars remain.
        let bars = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 1, 11))
            .unwrap();
        assert_eq!(bars.len(), 11);

        let events = scan_signals(&bars, &KdjParams::default()).unwrap();
        assert!(events.iter().all(|e| e.signal == Signal::Hold));
    }

    #[test]
    fn missing_ticker_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);

        let adapter = CsvAdapter::new(root);
        let result = adapter.fetch_ohlcv("MISSING", date(2024, 1, 1), date(2024, 12, 31));
        assert!(matches!(result, Err(KdjTraderError::Data { .. })));
    }
}

mod mock_data_port_pipeline {
    use super::*;

    #[test]
    fn kdj_through_mock_port() {
        let bars = make_bars("TENB", &DECLINE_THEN_RALLY);
        let port = MockDataPort::new().with_bars("TENB", bars);

        let fetched = port
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        let series = compute_kdj(&fetched, &KdjParams::default()).unwrap();

        assert_eq!(series.points.len(), 15);
        assert_eq!(series.first_valid(), Some(9));
        assert_eq!(series.valid_points().count(), 6);
    }

    #[test]
    fn port_error_propagates() {
        let port = MockDataPort::new().with_error("TENB", "backend unavailable");
        let err = port
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, KdjTraderError::Data { .. }));
    }

    #[test]
    fn data_range_from_port() {
        let bars = make_bars("TENB", &DECLINE_THEN_RALLY);
        let port = MockDataPort::new().with_bars("TENB", bars);

        let (min, max, count) = port.get_data_range("TENB").unwrap().unwrap();
        assert_eq!(min, date(2024, 1, 1));
        assert_eq!(max, date(2024, 1, 15));
        assert_eq!(count, 15);
    }
}

mod determinism {
    use super::*;

    #[test]
    fn repeated_reads_are_bit_identical() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);
        let adapter = CsvAdapter::new(root);

        let bars_a = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        let bars_b = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();

        let series_a = compute_kdj(&bars_a, &KdjParams::default()).unwrap();
        let series_b = compute_kdj(&bars_b, &KdjParams::default()).unwrap();

        for (pa, pb) in series_a.points.iter().zip(&series_b.points) {
            assert_eq!(pa.valid, pb.valid);
            assert_eq!(pa.rsv.to_bits(), pb.rsv.to_bits());
            assert_eq!(pa.k.to_bits(), pb.k.to_bits());
            assert_eq!(pa.d.to_bits(), pb.d.to_bits());
            assert_eq!(pa.j.to_bits(), pb.j.to_bits());
        }
    }
}

mod warmup_boundary {
    use super::*;

    #[test]
    fn one_window_of_bars_computes_without_valid_points() {
        let bars = make_bars("TENB", &DECLINE_THEN_RALLY[..9]);
        let series = compute_kdj(&bars, &KdjParams::default()).unwrap();

        assert_eq!(series.points.len(), 9);
        assert_eq!(series.valid_points().count(), 0);
        // The rolling pair exists on the final bar.
        assert!(series.points[8].high_n > series.points[8].low_n);
    }

    #[test]
    fn scanner_rejects_one_window_of_bars() {
        let bars = make_bars("TENB", &DECLINE_THEN_RALLY[..9]);
        let err = scan_signals(&bars, &KdjParams::default()).unwrap_err();
        assert!(matches!(err, KdjTraderError::InsufficientHistory { .. }));
    }

    #[test]
    fn eight_bars_fail_computation_outright() {
        let bars = make_bars("TENB", &DECLINE_THEN_RALLY[..8]);
        let err = compute_kdj(&bars, &KdjParams::default()).unwrap_err();
        assert!(matches!(
            err,
            KdjTraderError::InsufficientHistory { bars: 8, minimum: 9 }
        ));
    }
}

mod export_roundtrip {
    use super::*;

    #[test]
    fn export_writes_named_file_with_all_rows() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);
        let adapter = CsvAdapter::new(root);

        let bars = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        let path = adapter.write_ohlcv(&bars, "1d").unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "tenb_20240101_20240115_1d.csv"
        );

        let content = fs::read_to_string(&path).unwrap();
        // Header plus one row per bar.
        assert_eq!(content.lines().count(), 16);
    }

    #[test]
    fn export_files_do_not_pollute_ticker_listing() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);
        let adapter = CsvAdapter::new(root);

        let bars = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        adapter.write_ohlcv(&bars, "1d").unwrap();

        assert_eq!(adapter.list_tickers().unwrap(), vec!["TENB"]);
    }
}

mod chart_rendering {
    use super::*;

    #[test]
    fn chart_from_fetched_bars() {
        let dir = TempDir::new().unwrap();
        let root = write_feed(&dir, "TENB", &DECLINE_THEN_RALLY);
        let adapter = CsvAdapter::new(root);

        let bars = adapter
            .fetch_ohlcv("TENB", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        let svg = render_candle_chart(&bars, "TENB Prices");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("TENB Prices"));
        // One wick per bar.
        assert_eq!(svg.matches("<line").count(), 15);
    }
}
