use hexslicelib::{
    AssembleOptions, DecodeError, HexFileError, RecordType, SyntaxErrorKind, assemble_from_path,
    assemble_from_path_with, build_linear_view, build_segmented_view,
};

#[test]
fn test_assemble_linear_fixture() {
    // Act
    let seq = assemble_from_path("tests/fixtures/linear.hex").unwrap();

    // Assert: three data records plus the terminator, in file order
    assert_eq!(seq.len(), 4);
    assert_eq!(seq.records()[3].rtype, RecordType::EndOfFile);
}

#[test]
fn test_assemble_segmented_fixture_skips_comments() {
    let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();

    // Comment lines never reach the decoder
    assert_eq!(seq.len(), 5);
    assert_eq!(seq.records()[0].rtype, RecordType::ExtendedLinearAddress);
}

#[test]
fn test_linear_view_over_fixture() {
    let seq = assemble_from_path("tests/fixtures/linear.hex").unwrap();

    let view = build_linear_view(&seq, None).unwrap();

    let addresses: Vec<u16> = view.iter().map(|r| r.address).collect();
    assert_eq!(addresses, vec![0x0030, 0x0100, 0x0110]);

    let ranged = build_linear_view(&seq, Some((0x0100, 0x01FF))).unwrap();
    assert_eq!(ranged.len(), 2);
}

#[test]
fn test_linear_view_rejects_segmented_fixture() {
    let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();

    let err = build_linear_view(&seq, None).unwrap_err();

    assert_eq!(err, HexFileError::ExtendedAddressPresent(1));
}

#[test]
fn test_segmented_view_over_fixture() {
    let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();

    let view = build_segmented_view(&seq);

    // Segment 0 exists even though the file opens with an extended address
    assert_eq!(
        view.segment_bases().collect::<Vec<_>>(),
        vec![0x0000_0000, 0x0001_0000, 0x0012_0000]
    );
    assert!(view.segment(0).unwrap().is_empty());
    assert_eq!(view.segment(0x0001_0000).unwrap()[0].data, vec![
        0xDE, 0xAD, 0xBE, 0xEF
    ]);
}

#[test]
fn test_full_space_query_reproduces_input_data() {
    // Arrange
    let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();
    let view = build_segmented_view(&seq);

    // Act
    let slice = view.query(0x0000_0000, u32::MAX).unwrap();

    // Assert: every data record of the input, partitioned and ordered
    let input_data_count = seq
        .iter()
        .filter(|r| matches!(r.rtype, RecordType::Data))
        .count();
    assert_eq!(slice.record_count(), input_data_count);
    assert!(slice.records().zip(view.records()).all(|(a, b)| a == b));
}

#[test]
fn test_range_slice_over_fixture() {
    let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();
    let view = build_segmented_view(&seq);

    // Single-address query hits exactly one record
    let slice = view.query(0x0012_0010, 0x0012_0010).unwrap();
    assert_eq!(slice.record_count(), 1);
    assert_eq!(slice.segment(0x0012_0000).unwrap()[0].data, vec![0xAB]);

    // Populated view, but nothing inside these bounds
    let slice = view.query(0x0000_0000, 0x0000_0010).unwrap();
    assert!(slice.is_empty());
}

#[test]
fn test_truncated_payload_reported_with_position() {
    let err = assemble_from_path("tests/fixtures/bad_payload.hex").unwrap_err();

    let err = err
        .downcast_ref::<HexFileError>()
        .expect("Error was not a HexFileError");
    assert_eq!(
        *err,
        HexFileError::Syntax(
            SyntaxErrorKind::Decode(DecodeError::PayloadPastLineEnd {
                declared: 5,
                available: 8,
            }),
            2
        )
    );
}

#[test]
fn test_missing_terminator_fixture() {
    let err = assemble_from_path("tests/fixtures/no_terminator.hex").unwrap_err();

    let err = err
        .downcast_ref::<HexFileError>()
        .expect("Error was not a HexFileError");
    assert_eq!(*err, HexFileError::MissingTerminator);
}

#[test]
fn test_checksum_verification_against_fixture() {
    // Default options accept the corrupted checksum
    assert!(assemble_from_path("tests/fixtures/bad_checksum.hex").is_ok());

    // Opt-in verification rejects it
    let options = AssembleOptions {
        verify_checksums: true,
    };
    let err = assemble_from_path_with("tests/fixtures/bad_checksum.hex", options).unwrap_err();

    let err = err
        .downcast_ref::<HexFileError>()
        .expect("Error was not a HexFileError");
    assert_eq!(
        *err,
        HexFileError::Syntax(SyntaxErrorKind::ChecksumMismatch(0x1E, 0xFF), 1)
    );
}
