//! Reader and evaluator tests over synthetic in-memory kernels, in both byte orders.

mod common;

use approx::assert_abs_diff_eq;
use rstest::rstest;

use common::{
    chebyshev_derivative, chebyshev_direct, chebyshev_segment_data, mda_record,
    mda_segment_data, SegmentDef, SpkBuilder,
};
use helios::naif::daf::datatypes::{ModifiedDiffType1, Type2ChebyshevSet, Type3ChebyshevSet};
use helios::naif::daf::file_record::FileRecordError;
use helios::naif::daf::{DAFError, DafDataSet, DafDataType};
use helios::naif::SPK;

fn position_coeffs() -> [Vec<f64>; 3] {
    [
        vec![7.5e4, 1.2e3, -4.5e1, 8.0e-1, 2.5e-2],
        vec![-1.1e5, 9.8e2, 6.1e1, -5.0e-1, 1.0e-2],
        vec![3.3e4, -7.7e2, 2.2e1, 3.0e-1, -4.0e-2],
    ]
}

/// One Type 2 record: midpoint, radius, then the three coefficient runs.
fn type2_record(mid: f64, radius: f64) -> Vec<f64> {
    let mut rec = vec![mid, radius];
    for block in position_coeffs() {
        rec.extend_from_slice(&block);
    }
    rec
}

/// One Type 3 record: position runs plus their analytic derivative as velocity runs.
fn type3_record(mid: f64, radius: f64) -> Vec<f64> {
    let mut rec = vec![mid, radius];
    for block in &position_coeffs() {
        rec.extend_from_slice(block);
    }
    for block in &position_coeffs() {
        rec.extend_from_slice(&chebyshev_derivative(block, radius));
    }
    rec
}

fn two_interval_type2(big_endian: bool) -> Vec<u8> {
    let intlen = 86_400.0;
    let radius = intlen / 2.0;
    let records = vec![type2_record(radius, radius), type2_record(intlen + radius, radius)];
    let (data, end_et) = chebyshev_segment_data(0.0, intlen, &records);
    SpkBuilder::new(big_endian)
        .segment(SegmentDef {
            name: "TEST SEGMENT",
            target: 399,
            center: 3,
            frame: 1,
            data_type: 2,
            start_et_s: 0.0,
            end_et_s: end_et,
            data,
        })
        .build()
}

#[rstest]
#[case(false)]
#[case(true)]
fn catalog_reflects_the_summaries(#[case] big_endian: bool) {
    let image = two_interval_type2(big_endian);
    let spk = SPK::parse(image.as_slice()).unwrap();

    assert_eq!(spk.summaries().len(), 1);
    let summary = &spk.summaries()[0];
    assert_eq!(summary.target_id, 399);
    assert_eq!(summary.center_id, 3);
    assert_eq!(summary.frame_id, 1);
    assert_eq!(summary.data_type().unwrap(), DafDataType::Type2ChebyshevTriplet);
    assert_eq!(summary.name, "TEST SEGMENT");
    assert_eq!(summary.start_epoch_et_s, 0.0);
    assert_eq!(summary.end_epoch_et_s, 172_800.0);

    // Lookup honors target, observer and the time window
    assert!(spk.segment_for(399, 3, 86_400.0).is_some());
    assert!(spk.segment_for(399, 3, -1.0).is_none());
    assert!(spk.segment_for(399, 0, 86_400.0).is_none());
    assert!(spk.segment_for(301, 3, 86_400.0).is_none());

    // The catalog table renders one row per segment
    assert!(spk.describe().contains("TEST SEGMENT"));
}

#[rstest]
#[case(false)]
#[case(true)]
fn type2_evaluation_matches_direct_polynomial(#[case] big_endian: bool) {
    let image = two_interval_type2(big_endian);
    let spk = SPK::parse(image.as_slice()).unwrap();
    let summary = &spk.summaries()[0];
    let set = Type2ChebyshevSet::from_segment(spk.segment_view(summary)).unwrap();
    assert_eq!(set.degree(), 4);
    assert_eq!(set.num_records, 2);

    let radius = 43_200.0;
    // Sample both intervals, including the shared boundary
    for et in [0.0, 10_000.0, 43_200.0, 86_400.0, 100_000.0, 172_800.0] {
        let (pos, _) = set.evaluate(et).unwrap();
        // The evaluator clamps the interval index to the final record.
        let rcrd = ((et / 86_400.0) as usize).min(1);
        let mid = rcrd as f64 * 86_400.0 + radius;
        let tau = (et - mid) / radius;
        let coeffs = position_coeffs();
        for i in 0..3 {
            assert_abs_diff_eq!(pos[i], chebyshev_direct(&coeffs[i], tau), epsilon = 1e-6);
        }
    }
}

#[rstest]
#[case(false)]
#[case(true)]
fn type2_velocity_is_consistent_with_position(#[case] big_endian: bool) {
    let image = two_interval_type2(big_endian);
    let spk = SPK::parse(image.as_slice()).unwrap();
    let summary = &spk.summaries()[0];
    let set = Type2ChebyshevSet::from_segment(spk.segment_view(summary)).unwrap();

    let delta_s = 60.0;
    for et in [20_000.0, 50_000.0, 120_000.0] {
        let (_, vel) = set.evaluate(et).unwrap();
        let (above, _) = set.evaluate(et + delta_s).unwrap();
        let (below, _) = set.evaluate(et - delta_s).unwrap();
        let fd = (above - below) / (2.0 * delta_s);
        assert!(
            (fd - vel).norm() / vel.norm() < 1e-4,
            "velocity drifts from finite differences by {:.3e}",
            (fd - vel).norm() / vel.norm()
        );
    }
}

#[test]
fn chebyshev_midpoint_returns_the_constant_coefficient() {
    // All coefficients but c_0 zero: the evaluation at the record midpoint is c_0.
    let mut rec = vec![43_200.0, 43_200.0];
    rec.extend_from_slice(&[9.25, 0.0, 0.0, 0.0]);
    rec.extend_from_slice(&[-3.5, 0.0, 0.0, 0.0]);
    rec.extend_from_slice(&[0.125, 0.0, 0.0, 0.0]);
    let (data, end_et) = chebyshev_segment_data(0.0, 86_400.0, &[rec]);
    let image = SpkBuilder::new(false)
        .segment(SegmentDef {
            name: "C0",
            target: 5,
            center: 0,
            frame: 1,
            data_type: 2,
            start_et_s: 0.0,
            end_et_s: end_et,
            data,
        })
        .build();
    let spk = SPK::parse(image.as_slice()).unwrap();
    let set = Type2ChebyshevSet::from_segment(spk.segment_view(&spk.summaries()[0])).unwrap();
    let (pos, vel) = set.evaluate(43_200.0).unwrap();
    assert_eq!(pos[0], 9.25);
    assert_eq!(pos[1], -3.5);
    assert_eq!(pos[2], 0.125);
    assert_eq!(vel.norm(), 0.0);
}

#[rstest]
#[case(false)]
#[case(true)]
fn type3_velocity_blocks_are_their_own_series(#[case] big_endian: bool) {
    let intlen = 86_400.0;
    let radius = intlen / 2.0;
    let records = vec![type3_record(radius, radius)];
    let (data, end_et) = chebyshev_segment_data(0.0, intlen, &records);
    let image = SpkBuilder::new(big_endian)
        .segment(SegmentDef {
            name: "TYPE3",
            target: 301,
            center: 3,
            frame: 1,
            data_type: 3,
            start_et_s: 0.0,
            end_et_s: end_et,
            data,
        })
        .build();
    let spk = SPK::parse(image.as_slice()).unwrap();
    let summary = &spk.summaries()[0];
    assert_eq!(summary.data_type().unwrap(), DafDataType::Type3ChebyshevSextuplet);
    let set = Type3ChebyshevSet::from_segment(spk.segment_view(summary)).unwrap();
    assert_eq!(set.degree(), 4);

    // The velocity blocks encode the analytic derivative, so the central-difference
    // consistency property holds for Type 3 exactly as for Type 2.
    let delta_s = 60.0;
    for et in [10_000.0, 43_200.0, 80_000.0] {
        let (_, vel) = set.evaluate(et).unwrap();
        let (above, _) = set.evaluate(et + delta_s).unwrap();
        let (below, _) = set.evaluate(et - delta_s).unwrap();
        let fd = (above - below) / (2.0 * delta_s);
        assert!((fd - vel).norm() / vel.norm() < 1e-4);
    }
}

#[rstest]
#[case(false)]
#[case(true)]
fn type1_records_select_by_epoch(#[case] big_endian: bool) {
    // Two records: the first covers up to ET 1000, the second up to ET 2000.
    let rec_a = mda_record(1_000.0, [7.0e3, -4.0e3, 1.0e2], [1.0, -2.5, 0.25]);
    let rec_b = mda_record(2_000.0, [8.0e3, -3.0e3, 2.0e2], [0.9, -2.4, 0.20]);
    let data = mda_segment_data(&[rec_a, rec_b], &[1_000.0, 2_000.0]);
    let image = SpkBuilder::new(big_endian)
        .segment(SegmentDef {
            name: "MDA",
            target: -77,
            center: 5,
            frame: 1,
            data_type: 1,
            start_et_s: 0.0,
            end_et_s: 2_000.0,
            data,
        })
        .build();
    let spk = SPK::parse(image.as_slice()).unwrap();
    let summary = &spk.summaries()[0];
    let set = ModifiedDiffType1::from_segment(spk.segment_view(summary)).unwrap();
    assert_eq!(set.num_records, 2);

    // At ET 500 the first epoch strictly greater is record A; its extrapolation from
    // the reference state dominates over the tiny differences.
    let (pos, vel) = set.evaluate(500.0).unwrap();
    let dt = 500.0 - 1_000.0;
    assert_abs_diff_eq!(pos[0], 7.0e3 + dt * 1.0, epsilon = 2.0);
    assert_abs_diff_eq!(vel[1], -2.5, epsilon = 1e-2);

    // At ET 1500 the lookup must land on record B.
    let (pos_b, _) = set.evaluate(1_500.0).unwrap();
    let dt_b = 1_500.0 - 2_000.0;
    assert_abs_diff_eq!(pos_b[0], 8.0e3 + dt_b * 0.9, epsilon = 2.0);

    // Velocity stays the derivative of position across the record boundary.
    let delta_s = 60.0;
    for et in [400.0, 1_500.0] {
        let (_, vel) = set.evaluate(et).unwrap();
        let (above, _) = set.evaluate(et + delta_s).unwrap();
        let (below, _) = set.evaluate(et - delta_s).unwrap();
        let fd = (above - below) / (2.0 * delta_s);
        assert!((fd - vel).norm() / vel.norm() < 1e-4);
    }

    // Far outside the epoch table the evaluation refuses.
    assert!(set.evaluate(5_000.0).is_err());
}

#[test]
fn segment_coverage_is_first_match() {
    // Two segments for the same (target, observer) with overlapping windows: every
    // query inside the overlap must resolve to the earlier catalog entry.
    let (data_a, _) = chebyshev_segment_data(0.0, 86_400.0, &[type2_record(43_200.0, 43_200.0)]);
    let (data_b, _) =
        chebyshev_segment_data(43_200.0, 86_400.0, &[type2_record(86_400.0, 43_200.0)]);
    let image = SpkBuilder::new(false)
        .segment(SegmentDef {
            name: "FIRST",
            target: 4,
            center: 0,
            frame: 1,
            data_type: 2,
            start_et_s: 0.0,
            end_et_s: 86_400.0,
            data: data_a,
        })
        .segment(SegmentDef {
            name: "SECOND",
            target: 4,
            center: 0,
            frame: 1,
            data_type: 2,
            start_et_s: 43_200.0,
            end_et_s: 129_600.0,
            data: data_b,
        })
        .build();
    let spk = SPK::parse(image.as_slice()).unwrap();
    assert_eq!(spk.summaries().len(), 2);

    for et in [50_000.0, 60_000.0, 86_400.0] {
        assert_eq!(spk.segment_for(4, 0, et).unwrap().name, "FIRST");
    }
    assert_eq!(spk.segment_for(4, 0, 100_000.0).unwrap().name, "SECOND");
}

#[test]
fn malformed_files_are_rejected() {
    // Wrong magic
    let mut image = two_interval_type2(false);
    image[..8].copy_from_slice(b"DAF/PCK ");
    assert!(matches!(
        SPK::parse(image.as_slice()),
        Err(DAFError::FileRecord {
            source: FileRecordError::NotSPK { .. }
        })
    ));

    // Unknown endian flag
    let mut image = two_interval_type2(false);
    image[88..96].copy_from_slice(b"VAX-GFLT");
    assert!(matches!(
        SPK::parse(image.as_slice()),
        Err(DAFError::FileRecord {
            source: FileRecordError::UnsupportedEndian { .. }
        })
    ));

    // Truncation ahead of the summary record
    let image = two_interval_type2(false);
    assert!(matches!(
        SPK::parse(&image.as_slice()[..1100]),
        Err(DAFError::TruncatedFile { .. })
    ));

    // An unsupported segment type parses but refuses evaluation
    let mut image = two_interval_type2(false);
    // data type lives in the 4th integer of the summary: 24 bytes header + 16 bytes
    // of doubles + 3 * 4 bytes of ints into record 2
    let off = 1024 + 24 + 16 + 12;
    image[off..off + 4].copy_from_slice(&17_i32.to_le_bytes());
    let spk = SPK::parse(image.as_slice()).unwrap();
    assert_eq!(
        spk.summaries()[0].data_type(),
        Err(DAFError::UnsupportedDatatype { id: 17 })
    );
}

#[test]
fn checksums_guard_the_image() {
    let image = two_interval_type2(false);
    let spk = SPK::parse(image.as_slice()).unwrap();
    assert_eq!(spk.crc32(), spk.crc32_checksum);
    spk.scrub().unwrap();

    assert!(SPK::check_then_parse(image.as_slice(), spk.crc32_checksum).is_ok());
    assert!(matches!(
        SPK::check_then_parse(image.as_slice(), spk.crc32_checksum + 1),
        Err(DAFError::DAFIntegrity { .. })
    ));
}

#[test]
fn both_byte_orders_evaluate_identically() {
    let little = SPK::parse(two_interval_type2(false).as_slice()).unwrap();
    let big = SPK::parse(two_interval_type2(true).as_slice()).unwrap();

    let set_l = Type2ChebyshevSet::from_segment(little.segment_view(&little.summaries()[0])).unwrap();
    let set_b = Type2ChebyshevSet::from_segment(big.segment_view(&big.summaries()[0])).unwrap();

    for et in [0.0, 12_345.6, 86_400.0, 170_000.0] {
        let (pos_l, vel_l) = set_l.evaluate(et).unwrap();
        let (pos_b, vel_b) = set_b.evaluate(et).unwrap();
        assert_eq!(pos_l, pos_b);
        assert_eq!(vel_l, vel_b);
    }
}
